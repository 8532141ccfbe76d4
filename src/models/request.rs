// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Per-run configuration supplied by a front end.

use std::path::PathBuf;

use zip::CompressionMethod;

/// Deflate level used for compressed entries.
pub const DEFLATE_LEVEL: i64 = 9;

/// Per-entry compression method for the first-stage archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CompressionFormat {
    /// Standard deflate at a fixed high level.
    #[default]
    Deflate,
    /// No compression.
    Store,
}

impl CompressionFormat {
    /// Parse a user-provided format name (`zip`/`deflate` or `store`/`stored`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zip" | "deflate" | "deflated" => Some(Self::Deflate),
            "store" | "stored" => Some(Self::Store),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Deflate => "Deflate",
            Self::Store => "Store",
        }
    }

    pub fn method(&self) -> CompressionMethod {
        match self {
            Self::Deflate => CompressionMethod::Deflated,
            Self::Store => CompressionMethod::Stored,
        }
    }

    /// Compression level passed to the codec; stored entries take none.
    pub fn level(&self) -> Option<i64> {
        match self {
            Self::Deflate => Some(DEFLATE_LEVEL),
            Self::Store => None,
        }
    }
}

/// Which files of the source directory end up in the archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Files directly inside the source directory whose extension is in the set.
    Extensions { extensions: Vec<String> },
    /// Every regular file below the source directory, recursively.
    AllFiles,
}

impl SelectionPolicy {
    /// Build an extension filter, normalizing case and leading dots.
    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self::Extensions { extensions }
    }
}

/// Everything one workflow run needs from the operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRequest {
    pub source_dir: PathBuf,
    /// Final archive path; replaced by the converted archive when `convert` is set.
    pub dest_path: PathBuf,
    pub format: CompressionFormat,
    pub selection: SelectionPolicy,
    /// Re-wrap the archive with the external converter.
    pub convert: bool,
}

/// Force a specific extension onto a path when it is missing or different.
///
/// Keeps an existing matching extension (case-insensitive); otherwise replaces it.
pub fn ensure_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    let replace = !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case(extension)
    );

    if replace {
        path.set_extension(extension);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_script_vocabulary() {
        assert_eq!(CompressionFormat::parse("zip"), Some(CompressionFormat::Deflate));
        assert_eq!(CompressionFormat::parse(" Stored "), Some(CompressionFormat::Store));
        assert_eq!(CompressionFormat::parse("gzip"), None);
    }

    #[test]
    fn store_has_no_level() {
        assert_eq!(CompressionFormat::Store.level(), None);
        assert_eq!(CompressionFormat::Deflate.level(), Some(9));
        assert_eq!(CompressionFormat::Store.method(), CompressionMethod::Stored);
    }

    #[test]
    fn extension_policy_normalizes_entries() {
        let policy = SelectionPolicy::extensions([".MP4", "avi", " ", "mov"]);
        assert_eq!(
            policy,
            SelectionPolicy::Extensions {
                extensions: vec!["mp4".into(), "avi".into(), "mov".into()]
            }
        );
    }

    // Should leave an existing matching extension untouched, ignoring case.
    #[test]
    fn ensure_extension_preserves_matching_extension_case_insensitive() {
        let path = PathBuf::from("/tmp/clips.ZIPX");
        let result = ensure_extension(path.clone(), "zipx");

        assert_eq!(result, path);
    }

    #[test]
    fn ensure_extension_replaces_when_different() {
        let path = PathBuf::from("clips.zip");
        let result = ensure_extension(path, "zipx");

        assert_eq!(result.extension().and_then(|e| e.to_str()), Some("zipx"));
    }
}
