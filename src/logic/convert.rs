// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Secondary compression through an external archiver.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::logic::error::PackError;

/// Capability to turn a finished archive into another container format.
pub trait ArchiveConverter {
    /// Convert `input` into `target_format`, returning the path of the new file.
    ///
    /// Implementations must leave `input` in place.
    fn convert(&self, input: &Path, target_format: &str) -> Result<PathBuf, PackError>;
}

/// Path the converted archive is written to: `input` plus `.target_format`.
pub fn converted_path(input: &Path, target_format: &str) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(target_format);
    PathBuf::from(name)
}

/// [`ArchiveConverter`] that shells out to a 7-Zip compatible binary.
///
/// Runs `<program> a -t<format> -mx9 <output> <input>` and blocks until the
/// process exits. There is no timeout.
#[derive(Clone, Debug)]
pub struct SevenZip {
    program: PathBuf,
}

impl SevenZip {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ArchiveConverter for SevenZip {
    fn convert(&self, input: &Path, target_format: &str) -> Result<PathBuf, PackError> {
        let output = converted_path(input, target_format);
        // `a` appends to an existing archive, so clear leftovers from earlier runs.
        match fs::remove_file(&output) {
            Ok(()) => tracing::debug!(path = %output.display(), "removed stale converter output"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        tracing::info!(
            program = %self.program.display(),
            input = %input.display(),
            output = %output.display(),
            "running external archiver"
        );
        let result = Command::new(&self.program)
            .arg("a")
            .arg(format!("-t{target_format}"))
            .arg("-mx9")
            .arg(&output)
            .arg(input)
            .output();

        let result = match result {
            Ok(result) => result,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::error!(program = %self.program.display(), "external archiver not found");
                return Err(PackError::ToolNotFound {
                    program: self.program.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            tracing::error!(status = %result.status, stderr = %stderr, "external archiver failed");
            return Err(PackError::Conversion {
                status: result.status.to_string(),
                stderr,
            });
        }
        Ok(output)
    }
}

/// Re-wrap `archive` with `converter` and move the result over `archive`.
///
/// On converter failure the original archive is left untouched. On success
/// the intermediate archive is deleted and the converted file takes its path.
pub fn secondary_compress(
    converter: &dyn ArchiveConverter,
    archive: &Path,
    target_format: &str,
) -> Result<PathBuf, PackError> {
    let converted = converter.convert(archive, target_format)?;

    fs::remove_file(archive)?;
    fs::rename(&converted, archive)?;
    tracing::info!(archive = %archive.display(), format = target_format, "archive converted");
    Ok(archive.to_path_buf())
}
