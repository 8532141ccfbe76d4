// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring form state, messages, and commands.

use std::path::PathBuf;

use crossbeam_channel::Sender;

use crate::logic::{
    CancelFlag, Notification, SevenZip, Stage, SystemCpu, WorkflowEvent, execute,
};
use crate::models::request::ensure_extension;
use crate::models::{CompressionFormat, ProgressEvent, RunRequest, SelectionPolicy, Settings};

/// Which files of the chosen folder are archived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Top-level files with a configured video extension.
    #[default]
    Videos,
    /// Every file, recursively.
    AllFiles,
}

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Folder whose files are archived.
    pub source_dir: Option<PathBuf>,
    /// Requested archive path.
    pub dest_path: Option<PathBuf>,
    /// Per-entry compression; `None` until the operator picks one.
    pub compression: Option<CompressionFormat>,
    pub selection: SelectionMode,
    /// Re-wrap the archive with the external archiver after verification.
    pub convert: bool,
    /// Last workflow stage reported by the running job.
    pub stage: Stage,
    /// Latest progress snapshot of the running job.
    pub progress: Option<ProgressEvent>,
    /// Whether a workflow run is in flight.
    pub running: bool,
    /// Cancellation flag shared with the running job.
    pub cancel: CancelFlag,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Successful outcome to display in modal.
    pub notice: Option<Notification>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    /// Fresh form state, preselecting the configured compression if any.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            compression: settings.default_format,
            ..Default::default()
        }
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    PickSourceRequested,
    SourcePicked(Option<PathBuf>),
    PickDestinationRequested,
    DestinationPicked(Option<PathBuf>),
    SetCompression(CompressionFormat),
    SetSelection(SelectionMode),
    SetConvert(bool),
    StartRequested,
    CancelRequested,
    StageReached(Stage),
    Progress(ProgressEvent),
    RunFinished(Notification),
    DismissError,
    DismissNotice,
}

impl Msg {
    /// Whether this message is the final reply to a queued [`Command`].
    pub fn completes_command(&self) -> bool {
        !matches!(self, Msg::StageReached(_) | Msg::Progress(_))
    }
}

/// Commands represent side-effects executed between frames.
pub enum Command {
    PickSource,
    PickDestination { default_name: String, extension: &'static str },
    Run(RunPayload),
}

/// Validated form data for one workflow run.
pub struct RunPayload {
    pub source_dir: PathBuf,
    /// Destination with the archive extension enforced.
    pub dest_path: PathBuf,
    pub format: CompressionFormat,
    pub selection: SelectionMode,
    pub convert: bool,
    pub cancel: CancelFlag,
}

impl RunPayload {
    /// Resolve the selection mode against `settings` into a workflow request.
    pub fn to_request(&self, settings: &Settings) -> RunRequest {
        let selection = match self.selection {
            SelectionMode::Videos => SelectionPolicy::extensions(&settings.video_extensions),
            SelectionMode::AllFiles => SelectionPolicy::AllFiles,
        };
        RunRequest {
            source_dir: self.source_dir.clone(),
            dest_path: self.dest_path.clone(),
            format: self.format,
            selection,
            convert: self.convert,
        }
    }
}

/// Archive extension for the destination path.
pub fn archive_extension(convert: bool) -> &'static str {
    if convert { "zipx" } else { "zip" }
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::PickSourceRequested => cmds.push(Command::PickSource),
        Msg::SourcePicked(Some(dir)) => {
            surface_event(model, format!("Source folder: {}", dir.display()), false);
            model.source_dir = Some(dir);
        }
        Msg::SourcePicked(None) => {
            surface_event(model, "Folder selection cancelled.".into(), false)
        }
        Msg::PickDestinationRequested => {
            let default_name = model
                .source_dir
                .as_deref()
                .and_then(|d| d.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "videos".into());
            let extension = archive_extension(model.convert);
            cmds.push(Command::PickDestination {
                default_name: format!("{default_name}.{extension}"),
                extension,
            });
        }
        Msg::DestinationPicked(Some(path)) => {
            surface_event(model, format!("Archive: {}", path.display()), false);
            model.dest_path = Some(path);
        }
        Msg::DestinationPicked(None) => {
            surface_event(model, "Destination selection cancelled.".into(), false)
        }
        Msg::SetCompression(format) => model.compression = Some(format),
        Msg::SetSelection(selection) => model.selection = selection,
        Msg::SetConvert(convert) => model.convert = convert,
        Msg::StartRequested => {
            if model.running {
                surface_event(model, "A run is already in progress.".into(), false);
                return;
            }
            match validate_for_run(model) {
                Ok(payload) => {
                    model.cancel.reset();
                    model.running = true;
                    model.stage = Stage::Idle;
                    model.progress = None;
                    model.notice = None;
                    surface_event(model, "Compressing…".into(), false);
                    cmds.push(Command::Run(payload));
                }
                Err(err) => surface_event(model, err, true),
            }
        }
        Msg::CancelRequested => {
            if model.running {
                model.cancel.cancel();
                surface_event(model, "Cancelling…".into(), false);
            }
        }
        Msg::StageReached(stage) => {
            model.stage = stage;
            model.status = Some(stage.label().to_string());
        }
        Msg::Progress(event) => model.progress = Some(event),
        Msg::RunFinished(notification) => {
            model.running = false;
            if notification.is_error {
                surface_event(model, notification.message, true);
            } else {
                model.status = Some(notification.message.clone());
                model.notice = Some(notification);
            }
        }
        Msg::DismissError => model.error = None,
        Msg::DismissNotice => model.notice = None,
    }
}

/// Execute a command and return the resulting message.
///
/// Intermediate workflow events are sent through `events` while a run is in flight.
pub fn run_command(cmd: Command, settings: &Settings, events: &Sender<Msg>) -> Msg {
    match cmd {
        Command::PickSource => {
            let dir = rfd::FileDialog::new()
                .set_title("Select folder to compress")
                .pick_folder();
            Msg::SourcePicked(dir)
        }
        Command::PickDestination {
            default_name,
            extension,
        } => {
            let file = rfd::FileDialog::new()
                .set_title("Save archive as")
                .add_filter("Archive", &[extension])
                .set_file_name(&default_name)
                .save_file();
            Msg::DestinationPicked(file.map(|p| ensure_extension(p, extension)))
        }
        Command::Run(payload) => {
            let request = payload.to_request(settings);
            let converter = SevenZip::new(&settings.converter_program);
            let mut cpu = SystemCpu::new();
            let notification = execute(
                &request,
                settings,
                &converter,
                &mut cpu,
                &payload.cancel,
                &mut |event| {
                    let msg = match event {
                        WorkflowEvent::Stage(stage) => Msg::StageReached(stage),
                        WorkflowEvent::Progress(progress) => Msg::Progress(progress),
                    };
                    let _ = events.send(msg);
                },
            );
            Msg::RunFinished(notification)
        }
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

/// Validate model state and build the payload required to start a run.
fn validate_for_run(model: &AppModel) -> Result<RunPayload, String> {
    let source_dir = model
        .source_dir
        .clone()
        .ok_or_else(|| "No source folder selected.".to_string())?;
    let dest_path = model
        .dest_path
        .clone()
        .filter(|p| p.file_name().is_some())
        .ok_or_else(|| "No output file name entered.".to_string())?;
    let format = model
        .compression
        .ok_or_else(|| "No compression format selected.".to_string())?;

    Ok(RunPayload {
        source_dir,
        dest_path: ensure_extension(dest_path, archive_extension(model.convert)),
        format,
        selection: model.selection,
        convert: model.convert,
        cancel: model.cancel.clone(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use std::fs;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;

    fn ready_model(src: &std::path::Path, dest: PathBuf) -> AppModel {
        let mut model = AppModel::default();
        model.source_dir = Some(src.to_path_buf());
        model.dest_path = Some(dest);
        model.compression = Some(CompressionFormat::Deflate);
        model
    }

    fn start(model: &mut AppModel) -> Vec<Command> {
        let mut cmds = Vec::new();
        update(model, Msg::StartRequested, &mut cmds);
        cmds
    }

    #[test]
    fn start_without_source_sets_error() {
        let mut model = AppModel::default();
        model.dest_path = Some(PathBuf::from("/tmp/out.zip"));
        model.compression = Some(CompressionFormat::Store);

        let cmds = start(&mut model);

        assert!(cmds.is_empty());
        assert_eq!(model.error.as_deref(), Some("No source folder selected."));
        assert!(!model.running);
    }

    #[test]
    fn start_without_destination_sets_error() {
        let mut model = AppModel::default();
        model.source_dir = Some(PathBuf::from("/tmp/videos"));
        model.compression = Some(CompressionFormat::Deflate);

        assert!(start(&mut model).is_empty());
        assert_eq!(model.error.as_deref(), Some("No output file name entered."));
    }

    #[test]
    fn start_without_format_sets_error() {
        let mut model = AppModel::default();
        model.source_dir = Some(PathBuf::from("/tmp/videos"));
        model.dest_path = Some(PathBuf::from("/tmp/out.zip"));

        assert!(start(&mut model).is_empty());
        assert_eq!(model.error.as_deref(), Some("No compression format selected."));
    }

    #[test]
    fn default_settings_leave_format_unselected() {
        let mut model = AppModel::from_settings(&Settings::default());
        assert_eq!(model.compression, None);
        model.source_dir = Some(PathBuf::from("/tmp/videos"));
        model.dest_path = Some(PathBuf::from("/tmp/out.zip"));

        assert!(start(&mut model).is_empty());
        assert_eq!(model.error.as_deref(), Some("No compression format selected."));

        let preset = Settings {
            default_format: Some(CompressionFormat::Store),
            ..Settings::default()
        };
        assert_eq!(
            AppModel::from_settings(&preset).compression,
            Some(CompressionFormat::Store)
        );
    }

    #[test]
    fn start_enqueues_single_run_with_enforced_extension() {
        let mut model = ready_model(
            std::path::Path::new("/tmp/videos"),
            PathBuf::from("/tmp/out.zip"),
        );
        model.convert = true;

        let mut cmds = start(&mut model);
        assert_eq!(cmds.len(), 1);
        assert!(model.running);
        match cmds.pop().unwrap() {
            Command::Run(payload) => {
                assert_eq!(payload.dest_path, PathBuf::from("/tmp/out.zipx"));
                assert!(payload.convert);
            }
            _ => panic!("unexpected command"),
        }

        // A second start while running is ignored.
        assert!(start(&mut model).is_empty());
        assert!(model.error.is_none());
    }

    #[test]
    fn payload_resolves_selection_against_settings() {
        let model = ready_model(
            std::path::Path::new("/tmp/videos"),
            PathBuf::from("/tmp/out.zip"),
        );
        let payload = validate_for_run(&model).unwrap();
        let request = payload.to_request(&Settings::default());

        assert_eq!(
            request.selection,
            SelectionPolicy::extensions(["mp4", "avi", "mov"])
        );
        assert_eq!(request.format, CompressionFormat::Deflate);
    }

    #[test]
    fn cancel_request_raises_shared_flag() {
        let mut model = ready_model(
            std::path::Path::new("/tmp/videos"),
            PathBuf::from("/tmp/out.zip"),
        );
        let mut cmds = start(&mut model);
        let Some(Command::Run(payload)) = cmds.pop() else {
            panic!("run not enqueued");
        };

        update(&mut model, Msg::CancelRequested, &mut Vec::new());

        assert!(payload.cancel.is_cancelled());
        assert_eq!(model.status.as_deref(), Some("Cancelling…"));
    }

    #[test]
    fn progress_and_stage_messages_update_model() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        let event = ProgressEvent {
            processed: 3,
            remaining: 7,
            elapsed: Duration::from_secs(3),
            cpu_percent: 0.0,
            eta: Duration::from_secs(7),
            current: "clip02.mp4".into(),
        };

        update(&mut model, Msg::StageReached(Stage::PolicyChecked), &mut cmds);
        update(&mut model, Msg::Progress(event.clone()), &mut cmds);

        assert!(cmds.is_empty());
        assert_eq!(model.stage, Stage::PolicyChecked);
        assert_eq!(model.progress, Some(event));
        assert!(!Msg::StageReached(Stage::Archived).completes_command());
        assert!(Msg::DismissError.completes_command());
    }

    #[test]
    fn run_command_archives_and_reports_success() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        for i in 0..30 {
            fs::write(src.path().join(format!("v{i:02}.mov")), format!("mov {i}")).unwrap();
        }
        let settings = Settings {
            log_path: out.path().join("compression.log"),
            ..Settings::default()
        };
        let dest = out.path().join("clips.zip");
        let mut model = ready_model(src.path(), dest.clone());

        let mut cmds = start(&mut model);
        let (tx, rx) = crossbeam_channel::unbounded();
        let msg = run_command(cmds.pop().unwrap(), &settings, &tx);
        for m in rx.try_iter() {
            update(&mut model, m, &mut Vec::new());
        }
        update(&mut model, msg, &mut Vec::new());

        assert!(!model.running);
        assert!(model.error.is_none(), "{:?}", model.error);
        assert!(model.notice.is_some());
        assert_eq!(model.stage, Stage::Reported);
        assert_eq!(model.progress.as_ref().map(|p| p.processed), Some(30));
        assert!(dest.exists());
    }

    #[test]
    fn run_command_reports_policy_error() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(src.path().join("only.mp4"), b"1").unwrap();
        let settings = Settings {
            log_path: out.path().join("compression.log"),
            ..Settings::default()
        };
        let dest = out.path().join("clips.zip");
        let mut model = ready_model(src.path(), dest.clone());

        let mut cmds = start(&mut model);
        let (tx, _rx) = crossbeam_channel::unbounded();
        let msg = run_command(cmds.pop().unwrap(), &settings, &tx);
        update(&mut model, msg, &mut Vec::new());

        assert!(!model.running);
        assert!(
            model
                .error
                .as_deref()
                .is_some_and(|e| e.contains("Fewer than 30"))
        );
        assert!(!dest.exists());
    }
}
