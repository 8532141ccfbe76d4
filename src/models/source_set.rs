// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Source set domain model: the files selected for one archive run.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::logic::error::PackError;

/// One file scheduled for the archive, keyed by its name inside the archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path relative to the source root, `/`-separated.
    pub name: String,
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
}

impl ArchiveEntry {
    pub fn new(name: String, path: PathBuf) -> Self {
        Self { name, path }
    }
}

/// Ordered, immutable list of entries resolved from a source directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSet {
    root: PathBuf,
    entries: Vec<ArchiveEntry>,
}

impl SourceSet {
    /// Build a source set, rejecting duplicate archive names.
    pub fn new(root: PathBuf, entries: Vec<ArchiveEntry>) -> Result<Self, PackError> {
        assert_unique_names(&entries)?;
        Ok(Self { root, entries })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries in enumeration order, which is also archive write order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names every archive entry is expected to carry.
    pub fn expected_names(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Drop every entry matching `skip`, keeping the order of the rest.
    pub fn excluding(mut self, mut skip: impl FnMut(&ArchiveEntry) -> bool) -> Self {
        self.entries.retain(|e| !skip(e));
        self
    }

    /// Look up the on-disk path for an archive entry name.
    pub fn path_for(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.path.as_path())
    }
}

/// Ensure no two entries map to the same archive name.
fn assert_unique_names(entries: &[ArchiveEntry]) -> Result<(), PackError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.name.as_str()) {
            return Err(PackError::DuplicateEntry {
                name: entry.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ArchiveEntry {
        ArchiveEntry::new(name.into(), PathBuf::from("/src").join(name))
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = SourceSet::new(PathBuf::from("/src"), vec![entry("a.mp4"), entry("a.mp4")])
            .unwrap_err();

        assert!(matches!(err, PackError::DuplicateEntry { name } if name == "a.mp4"));
    }

    #[test]
    fn expected_names_and_lookup_follow_entries() {
        let set = SourceSet::new(
            PathBuf::from("/src"),
            vec![entry("b.mp4"), entry("clips/a.mov")],
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.expected_names().contains("clips/a.mov"));
        assert_eq!(
            set.path_for("b.mp4"),
            Some(Path::new("/src/b.mp4"))
        );
        assert!(set.path_for("missing.mp4").is_none());
    }

    #[test]
    fn excluding_keeps_remaining_order() {
        let set = SourceSet::new(
            PathBuf::from("/src"),
            vec![entry("a.mp4"), entry("b.zip"), entry("c.mp4")],
        )
        .unwrap()
        .excluding(|e| e.name.ends_with(".zip"));

        assert_eq!(
            set.entries().iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec!["a.mp4", "c.mp4"]
        );
    }
}
