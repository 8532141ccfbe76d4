// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types shared between the UI and the archive workflow.

pub mod progress;
pub mod request;
pub mod settings;
pub mod source_set;

pub use progress::ProgressEvent;
pub use request::{CompressionFormat, RunRequest, SelectionPolicy};
pub use settings::Settings;
pub use source_set::{ArchiveEntry, SourceSet};
