// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Orchestrator for the archive-and-verify workflow.
//!
//! Stages run strictly in order and the first error ends the run:
//!
//! `Idle → Enumerated → PolicyChecked → Archived → Verified → (Converted) → Reported`
//!
//! Verification reads the first-stage ZIP before the optional conversion
//! replaces it, since the converted container holds that ZIP as a single
//! member rather than the individual source entries.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::logic::convert::{ArchiveConverter, converted_path, secondary_compress};
use crate::logic::enumerate::enumerate_files;
use crate::logic::error::PackError;
use crate::logic::eta::CpuSampler;
use crate::logic::event_log::EventLog;
use crate::logic::verify::verify_archive;
use crate::logic::writer::{CancelFlag, write_archive};
use crate::models::{ProgressEvent, RunRequest, Settings};
use crate::utils::format_duration;

/// Position of a run in the linear workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Enumerated,
    PolicyChecked,
    Archived,
    Verified,
    Converted,
    Reported,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Idle => "Idle",
            Stage::Enumerated => "Source files listed",
            Stage::PolicyChecked => "File count accepted",
            Stage::Archived => "Archive written",
            Stage::Verified => "Archive verified",
            Stage::Converted => "Archive converted",
            Stage::Reported => "Done",
        }
    }
}

/// Notifications published while a run is in progress.
#[derive(Clone, Debug, PartialEq)]
pub enum WorkflowEvent {
    Stage(Stage),
    Progress(ProgressEvent),
}

/// Summary of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub archive: PathBuf,
    pub entries: usize,
    /// Uncompressed bytes read from the sources.
    pub bytes: u64,
    pub converted: bool,
    pub elapsed: Duration,
}

/// Single user-facing message describing how a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

impl Notification {
    fn success(report: &RunReport) -> Self {
        let converted = if report.converted {
            " and converted"
        } else {
            ""
        };
        Self {
            title: "Done".into(),
            message: format!(
                "Compressed{converted} {} files ({} bytes) into {} in {}. Verification passed.",
                report.entries,
                report.bytes,
                report.archive.display(),
                format_duration(report.elapsed)
            ),
            is_error: false,
        }
    }

    fn failure(err: &PackError) -> Self {
        let title = if err.is_cancellation() {
            "Cancelled"
        } else {
            "Error"
        };
        Self {
            title: title.into(),
            message: err.user_message(),
            is_error: !err.is_cancellation(),
        }
    }
}

/// One workflow run with its injected collaborators.
pub struct Workflow<'a> {
    settings: &'a Settings,
    converter: &'a dyn ArchiveConverter,
    cpu: &'a mut dyn CpuSampler,
    cancel: &'a CancelFlag,
    stage: Stage,
}

impl<'a> Workflow<'a> {
    pub fn new(
        settings: &'a Settings,
        converter: &'a dyn ArchiveConverter,
        cpu: &'a mut dyn CpuSampler,
        cancel: &'a CancelFlag,
    ) -> Self {
        Self {
            settings,
            converter,
            cpu,
            cancel,
            stage: Stage::Idle,
        }
    }

    /// Last stage reached.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run every stage for `request`, stopping at the first error.
    pub fn run(
        &mut self,
        request: &RunRequest,
        on_event: &mut dyn FnMut(WorkflowEvent),
    ) -> Result<RunReport, PackError> {
        let start = Instant::now();
        tracing::info!(
            source = %request.source_dir.display(),
            dest = %request.dest_path.display(),
            convert = request.convert,
            "workflow started"
        );

        let outputs = [
            resolved(&request.dest_path),
            resolved(&converted_path(
                &request.dest_path,
                &self.settings.target_format,
            )),
        ];
        let source = enumerate_files(&request.source_dir, &request.selection)?.excluding(|entry| {
            let skip = outputs.contains(&resolved(&entry.path));
            if skip {
                tracing::warn!(entry = %entry.name, "skipping the run's own output file");
            }
            skip
        });
        tracing::info!(root = %source.root().display(), files = source.len(), "source enumerated");
        self.advance(Stage::Enumerated, on_event);

        if source.len() < self.settings.min_files {
            return Err(PackError::Policy {
                found: source.len(),
                required: self.settings.min_files,
            });
        }
        self.advance(Stage::PolicyChecked, on_event);

        let summary = write_archive(
            &source,
            &request.dest_path,
            request.format,
            self.cancel,
            &mut *self.cpu,
            &mut |event| on_event(WorkflowEvent::Progress(event.clone())),
        )?;
        tracing::info!(
            entries = summary.entries,
            bytes = summary.bytes_read,
            elapsed = %format_duration(summary.elapsed),
            "archive written"
        );
        self.advance(Stage::Archived, on_event);

        let verification = verify_archive(&request.dest_path, &source)?;
        if !verification.passed() {
            tracing::error!(
                failures = verification.failures().len(),
                "archive verification failed"
            );
        }
        verification.into_result()?;
        self.advance(Stage::Verified, on_event);

        if request.convert {
            secondary_compress(
                self.converter,
                &request.dest_path,
                &self.settings.target_format,
            )?;
            self.advance(Stage::Converted, on_event);
        }

        self.advance(Stage::Reported, on_event);
        Ok(RunReport {
            archive: request.dest_path.clone(),
            entries: summary.entries,
            bytes: summary.bytes_read,
            converted: request.convert,
            elapsed: start.elapsed(),
        })
    }

    fn advance(&mut self, stage: Stage, on_event: &mut dyn FnMut(WorkflowEvent)) {
        tracing::info!(from = ?self.stage, to = ?stage, "stage reached");
        self.stage = stage;
        on_event(WorkflowEvent::Stage(stage));
    }
}

/// Absolute form of `path` for identity checks. The file itself need not exist yet.
fn resolved(path: &Path) -> PathBuf {
    if let Ok(path) = path.canonicalize() {
        return path;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|parent| parent.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// Run a workflow inside a freshly opened event log and turn the outcome into a notification.
///
/// Every error is logged with its technical detail and surfaced as exactly
/// one operator-facing message. Nothing is retried.
pub fn execute(
    request: &RunRequest,
    settings: &Settings,
    converter: &dyn ArchiveConverter,
    cpu: &mut dyn CpuSampler,
    cancel: &CancelFlag,
    on_event: &mut dyn FnMut(WorkflowEvent),
) -> Notification {
    let log = match EventLog::open(&settings.log_path) {
        Ok(log) => log,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "event log unavailable");
            return Notification {
                title: "Error".into(),
                message: format!("Could not open the log file:\n\n{err:#}"),
                is_error: true,
            };
        }
    };

    let notification = log.in_scope(|| {
        let mut workflow = Workflow::new(settings, converter, cpu, cancel);
        match workflow.run(request, on_event) {
            Ok(report) => {
                tracing::info!(
                    archive = %report.archive.display(),
                    entries = report.entries,
                    "workflow finished"
                );
                Notification::success(&report)
            }
            Err(err) if err.is_cancellation() => {
                tracing::warn!(stage = ?workflow.stage(), "{err}");
                Notification::failure(&err)
            }
            Err(err) => {
                tracing::error!(stage = ?workflow.stage(), error = %err, "workflow failed");
                Notification::failure(&err)
            }
        }
    });
    log.close();
    notification
}
