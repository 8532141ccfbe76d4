// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by UI and workflow logic.

pub mod format;
pub mod hash;

/// Format a duration for progress and status text.
pub use format::format_duration;
/// Compute the SHA-256 hash of a file or reader.
pub use hash::{hash_file, hash_reader};
