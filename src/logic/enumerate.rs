// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Source directory listing.

use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::logic::error::PackError;
use crate::models::{ArchiveEntry, SelectionPolicy, SourceSet};

/// List the files of `root` selected by `policy`, sorted by name.
///
/// Directories are never returned. Extension filters only look at the top
/// level of `root`; [`SelectionPolicy::AllFiles`] descends recursively.
/// Symlinks are followed, so a linked video is archived under the link's name.
///
/// # Errors
///
/// Returns [`PackError::Enumeration`] when `root` is missing, is not a
/// directory, or any directory below it cannot be listed.
pub fn enumerate_files(root: &Path, policy: &SelectionPolicy) -> Result<SourceSet, PackError> {
    let meta = root.metadata().map_err(|source| PackError::Enumeration {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(PackError::Enumeration {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    let max_depth = match policy {
        SelectionPolicy::Extensions { .. } => 1,
        SelectionPolicy::AllFiles => usize::MAX,
    };

    let mut entries = Vec::new();
    for item in WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
    {
        let item = item.map_err(|err| PackError::Enumeration {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source: err.into(),
        })?;
        if !item.file_type().is_file() || !policy_accepts(policy, item.path()) {
            continue;
        }

        let name = entry_name(root, item.path());
        entries.push(ArchiveEntry::new(name, item.into_path()));
    }

    tracing::debug!(root = %root.display(), count = entries.len(), "enumerated source files");
    SourceSet::new(root.to_path_buf(), entries)
}

fn policy_accepts(policy: &SelectionPolicy, path: &Path) -> bool {
    match policy {
        SelectionPolicy::AllFiles => true,
        SelectionPolicy::Extensions { extensions } => path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want))),
    }
}

/// Archive name for `path`: its components below `root`, joined with `/`.
fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
