// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Process-wide settings, read once at startup.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::CompressionFormat;

/// Default minimum number of eligible files before a run is allowed.
pub const DEFAULT_MIN_FILES: usize = 30;

/// Ambient settings shared by every workflow run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Runs with fewer eligible files are rejected before anything is written.
    pub min_files: usize,
    /// Extensions (lowercase, no dot) selected in video mode.
    pub video_extensions: Vec<String>,
    /// Append-only event log.
    pub log_path: PathBuf,
    /// External archiver used for secondary compression.
    pub converter_program: PathBuf,
    /// Container type requested from the external archiver.
    pub target_format: String,
    /// Compression preselected in the form; the operator must choose when unset.
    pub default_format: Option<CompressionFormat>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_files: DEFAULT_MIN_FILES,
            video_extensions: vec!["mp4".into(), "avi".into(), "mov".into()],
            log_path: PathBuf::from("compression.log"),
            converter_program: PathBuf::from("7z"),
            target_format: "zipx".into(),
            default_format: None,
        }
    }
}

impl Settings {
    /// Load settings from `VIDPACK_*` environment variables on top of the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(raw) = lookup("VIDPACK_MIN_FILES") {
            settings.min_files = raw
                .trim()
                .parse()
                .with_context(|| format!("VIDPACK_MIN_FILES must be a whole number, got {raw:?}"))?;
        }
        if let Some(raw) = lookup("VIDPACK_EXTENSIONS") {
            let extensions: Vec<String> = raw
                .split(',')
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            if extensions.is_empty() {
                anyhow::bail!("VIDPACK_EXTENSIONS must list at least one extension");
            }
            settings.video_extensions = extensions;
        }
        if let Some(raw) = lookup("VIDPACK_LOG") {
            settings.log_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("VIDPACK_7Z") {
            settings.converter_program = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("VIDPACK_FORMAT") {
            let format = CompressionFormat::parse(&raw).with_context(|| {
                format!("VIDPACK_FORMAT must be zip, deflate, or store, got {raw:?}")
            })?;
            settings.default_format = Some(format);
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_video_workflow() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.min_files, 30);
        assert_eq!(settings.video_extensions, vec!["mp4", "avi", "mov"]);
        assert_eq!(settings.converter_program, PathBuf::from("7z"));
        assert_eq!(settings.target_format, "zipx");
        assert_eq!(settings.default_format, None);
    }

    #[test]
    fn env_overrides_are_applied() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("VIDPACK_MIN_FILES", "5"),
            ("VIDPACK_EXTENSIONS", ".MKV, webm"),
            ("VIDPACK_LOG", "/tmp/pack.log"),
            ("VIDPACK_7Z", "/opt/7zz"),
            ("VIDPACK_FORMAT", "store"),
        ]))
        .unwrap();

        assert_eq!(settings.min_files, 5);
        assert_eq!(settings.video_extensions, vec!["mkv", "webm"]);
        assert_eq!(settings.log_path, PathBuf::from("/tmp/pack.log"));
        assert_eq!(settings.converter_program, PathBuf::from("/opt/7zz"));
        assert_eq!(settings.default_format, Some(CompressionFormat::Store));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = Settings::from_lookup(lookup_from(&[("VIDPACK_FORMAT", "gzip")])).unwrap_err();
        assert!(err.to_string().contains("VIDPACK_FORMAT"));
    }

    #[test]
    fn invalid_min_files_is_reported() {
        let err = Settings::from_lookup(lookup_from(&[("VIDPACK_MIN_FILES", "thirty")]))
            .unwrap_err();
        assert!(err.to_string().contains("VIDPACK_MIN_FILES"));
    }

    #[test]
    fn empty_extension_list_is_rejected() {
        assert!(Settings::from_lookup(lookup_from(&[("VIDPACK_EXTENSIONS", " , ")])).is_err());
    }
}
