// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Read-only archive verification against the source files.

use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::Path;

use zip::ZipArchive;

use crate::logic::error::PackError;
use crate::models::SourceSet;
use crate::utils::{hash_file, hash_reader};

/// Outcome of checking one archive entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryCheck {
    pub name: String,
    /// The entry name belongs to the source set.
    pub name_ok: bool,
    /// Decompressed bytes hash to the same digest as the source file.
    pub content_ok: bool,
}

/// Per-entry verification results plus expected names absent from the archive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerificationResult {
    pub checks: Vec<EntryCheck>,
    pub missing: Vec<String>,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.checks.iter().all(|c| c.name_ok && c.content_ok)
    }

    /// Every failure, in archive order followed by missing names.
    pub fn failures(&self) -> Vec<PackError> {
        let mut out: Vec<PackError> = self
            .checks
            .iter()
            .filter_map(|c| {
                if !c.name_ok {
                    Some(PackError::NameMismatch {
                        name: c.name.clone(),
                    })
                } else if !c.content_ok {
                    Some(PackError::ContentMismatch {
                        name: c.name.clone(),
                    })
                } else {
                    None
                }
            })
            .collect();
        out.extend(
            self.missing
                .iter()
                .map(|name| PackError::MissingEntry { name: name.clone() }),
        );
        out
    }

    /// Collapse into the first failure, if any.
    pub fn into_result(self) -> Result<(), PackError> {
        match self.failures().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Check `archive` against `expected` in both directions.
///
/// Every archive entry must be named after a file of `expected`, and its
/// decompressed content must hash to the same SHA-256 digest as that file
/// does now. Every expected file must also appear in the archive. Source
/// files that vanished or became unreadable since enumeration, and entries
/// whose data fails to decompress or fails its CRC check, count as content
/// mismatches.
///
/// # Errors
///
/// Returns an error only when the archive itself cannot be opened or its
/// central directory cannot be read; mismatches are reported through
/// [`VerificationResult`].
pub fn verify_archive(archive: &Path, expected: &SourceSet) -> Result<VerificationResult, PackError> {
    let mut zip = ZipArchive::new(File::open(archive)?)?;
    let mut seen = BTreeSet::new();
    let mut checks = Vec::with_capacity(zip.len());

    for idx in 0..zip.len() {
        let entry = zip.by_index(idx)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();

        let Some(source_path) = expected.path_for(&name) else {
            tracing::error!(entry = %name, "archive entry is not part of the source set");
            checks.push(EntryCheck {
                name,
                name_ok: false,
                content_ok: false,
            });
            continue;
        };
        let first_occurrence = seen.insert(name.clone());

        let archived = match hash_reader(entry) {
            Ok(digest) => Some(digest),
            Err(err) => {
                tracing::error!(entry = %name, error = %err, "archive entry could not be read back");
                None
            }
        };
        let original = match hash_file(source_path) {
            Ok(digest) => Some(digest),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::error!(entry = %name, error = %err, "source file could not be read");
                None
            }
        };
        let content_ok = archived.is_some() && original == archived;
        if !content_ok {
            tracing::error!(entry = %name, "archive entry differs from source file");
        }
        checks.push(EntryCheck {
            name,
            name_ok: first_occurrence,
            content_ok,
        });
    }

    let missing: Vec<String> = expected
        .expected_names()
        .into_iter()
        .filter(|name| !seen.contains(name))
        .collect();
    for name in &missing {
        tracing::error!(entry = %name, "source file missing from archive");
    }

    Ok(VerificationResult { checks, missing })
}
