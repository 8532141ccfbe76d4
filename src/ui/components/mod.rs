// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reusable egui components for the archive form.

pub mod format_picker;
pub mod progress;
