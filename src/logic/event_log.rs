// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Append-only, timestamped event log scoped to a single workflow run.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use time::macros::format_description;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Open log sink. Events go to the log file (info and above) and to stderr
/// (filtered by `RUST_LOG`) while a closure runs inside [`EventLog::in_scope`].
pub struct EventLog {
    path: PathBuf,
    dispatch: Dispatch,
}

impl EventLog {
    /// Open `path` for appending, creating it and its parent directory if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {:?}", parent))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;

        let timer = UtcTime::new(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ));
        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_timer(timer)
            .with_filter(LevelFilter::INFO);
        let console_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_filter(console_filter());

        let subscriber = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer);

        Ok(Self {
            path: path.to_path_buf(),
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// Run `f` with this log as the current thread's event sink.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Record the end of the run and release the file.
    pub fn close(self) {
        self.in_scope(|| tracing::debug!(path = %self.path.display(), "event log closed"));
    }
}

/// `RUST_LOG` filter for console output, defaulting to `info`.
pub fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
