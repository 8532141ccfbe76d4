// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Error taxonomy for the archive-and-verify workflow.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("cannot list source directory {path:?}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("only {found} eligible files found, at least {required} required")]
    Policy { found: usize, required: usize },

    #[error("duplicate archive entry name: {name}")]
    DuplicateEntry { name: String },

    #[error("{context}: {source}")]
    Write {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("compression cancelled after {written} of {total} entries")]
    Cancelled { written: usize, total: usize },

    #[error("external archiver {program:?} was not found on the execution path")]
    ToolNotFound { program: PathBuf },

    #[error("external archiver failed ({status}): {stderr}")]
    Conversion { status: String, stderr: String },

    #[error("unexpected archive entry: {name}")]
    NameMismatch { name: String },

    #[error("archive is missing entry: {name}")]
    MissingEntry { name: String },

    #[error("content hash mismatch for entry: {name}")]
    ContentMismatch { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PackError {
    /// Wrap an I/O failure hit while writing the archive.
    pub fn write(context: impl Into<String>, source: io::Error) -> Self {
        Self::Write {
            context: context.into(),
            source,
        }
    }

    /// Cancellation ends a run early but is not a failure of the tool itself.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Operator-facing text for the notification shown at the end of a run.
    pub fn user_message(&self) -> String {
        match self {
            Self::Enumeration { path, .. } => {
                format!("The source folder {} could not be read.", path.display())
            }
            Self::Policy { found, required } => format!(
                "Fewer than {required} eligible files were found ({found} found). Nothing was written."
            ),
            Self::DuplicateEntry { name } => {
                format!("Two source files map to the same archive name: {name}")
            }
            Self::Write { .. } | Self::Archive(_) | Self::Io(_) => {
                format!("Writing the archive failed:\n\n{self}")
            }
            Self::Cancelled { written, total } => format!(
                "Compression was cancelled after {written} of {total} files. The partial archive was left on disk."
            ),
            Self::ToolNotFound { program } => format!(
                "The external archiver \"{}\" is not installed or not on PATH. The ZIP archive was kept.",
                program.display()
            ),
            Self::Conversion { .. } => {
                "The external archiver failed while converting the archive. The ZIP archive was kept; see the log for details.".into()
            }
            Self::NameMismatch { name } => {
                format!("Verification failed: unexpected entry \"{name}\" in the archive.")
            }
            Self::MissingEntry { name } => {
                format!("Verification failed: \"{name}\" is missing from the archive.")
            }
            Self::ContentMismatch { name } => {
                format!("Verification failed: \"{name}\" differs from the source file.")
            }
        }
    }
}
