// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for packing a video folder.
//! Handles layout, form controls, and wiring to the background workflow.

pub mod components;

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::models::Settings;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::{format_picker, progress};

/// Stateful egui application for running archive jobs.
pub struct VidPackApp {
    model: AppModel,
    settings: Arc<Settings>,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl VidPackApp {
    pub fn new(settings: Settings) -> Self {
        let settings = Arc::new(settings);
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        // Two workers keep dialogs responsive while a run occupies the other.
        for _ in 0..2 {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let settings = Arc::clone(&settings);
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, &settings, &msg_tx);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        Self {
            model: AppModel::from_settings(&settings),
            settings,
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        }
    }
}

impl eframe::App for VidPackApp {
    /// Required by eframe 0.34; all rendering happens in `update`, which the
    /// runner still invokes right before this method each frame.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame: drains worker replies, applies messages to
    /// the MVU model, dispatches resulting commands, and renders the form,
    /// progress panel, modals, and status bar.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            if msg.completes_command() {
                self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            }
            self.inbox.push(msg);
        }

        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Video Archiver");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.separator();
                    self.render_run_controls(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);
        self.render_notice_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            self.render_form(ui);
            ui.add_space(12.0);
            progress::view(
                ui,
                self.model.progress.as_ref(),
                self.model.stage,
                self.model.running,
            );
        });

        // Worker messages do not wake the UI on their own.
        if self.model.running || self.model.pending_commands > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl VidPackApp {
    /// Start and cancel buttons; start is disabled while a run is in flight.
    fn render_run_controls(&mut self, ui: &mut egui::Ui) {
        let cancel = egui::Button::new(format!("{} Cancel", egui_phosphor::regular::STOP));
        if ui.add_enabled(self.model.running, cancel).clicked() {
            self.inbox.push(Msg::CancelRequested);
        }

        let start = egui::Button::new(format!("{} Compress", egui_phosphor::regular::PLAY));
        if ui
            .add_enabled(!self.model.running, start)
            .on_disabled_hover_text("A run is in progress")
            .clicked()
        {
            self.inbox.push(Msg::StartRequested);
        }
    }

    /// Grouped inputs: source, destination, format, selection, conversion.
    fn render_form(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.model.running;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.add_enabled_ui(enabled, |ui| {
                egui::Grid::new("form_grid")
                    .num_columns(2)
                    .spacing(egui::vec2(8.0, 10.0))
                    .min_col_width(140.0)
                    .show(ui, |ui| {
                        ui.label("Source folder");
                        ui.horizontal(|ui| {
                            let browse = format!("{} Browse…", egui_phosphor::regular::FOLDER_OPEN);
                            if ui.button(browse).clicked() {
                                self.inbox.push(Msg::PickSourceRequested);
                            }
                            ui.label(path_label(self.model.source_dir.as_deref()));
                        });
                        ui.end_row();

                        ui.label("Save as");
                        ui.horizontal(|ui| {
                            let save = format!("{} Choose…", egui_phosphor::regular::FLOPPY_DISK);
                            if ui.button(save).clicked() {
                                self.inbox.push(Msg::PickDestinationRequested);
                            }
                            ui.label(path_label(self.model.dest_path.as_deref()));
                        });
                        ui.end_row();

                        ui.label("Compression");
                        if let Some(format) =
                            format_picker::compression_view(ui, self.model.compression)
                        {
                            self.inbox.push(Msg::SetCompression(format));
                        }
                        ui.end_row();

                        ui.label("Files");
                        if let Some(mode) = format_picker::selection_view(
                            ui,
                            self.model.selection,
                            &self.settings.video_extensions,
                        ) {
                            self.inbox.push(Msg::SetSelection(mode));
                        }
                        ui.end_row();

                        ui.label("Convert");
                        let mut convert = self.model.convert;
                        let label = format!(
                            "Re-pack as .{} with {}",
                            self.settings.target_format,
                            self.settings.converter_program.display()
                        );
                        if ui.checkbox(&mut convert, label).changed() {
                            self.inbox.push(Msg::SetConvert(convert));
                        }
                        ui.end_row();
                    });
            });

            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(format!(
                    "At least {} files are required. Events are appended to {}.",
                    self.settings.min_files,
                    self.settings.log_path.display()
                ))
                .small()
                .color(egui::Color32::from_gray(110)),
            );
        });
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    fn render_notice_modal(&mut self, ctx: &egui::Context) {
        if let Some(notice) = self.model.notice.clone() {
            egui::Window::new(notice.title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(notice.message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissNotice);
                    }
                });
        }
    }

    /// Render latest status message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0)).on_hover_text(format!(
                        "{} task(s) running in background",
                        self.model.pending_commands
                    ));
                }
            });
        }
    }
}

fn path_label(path: Option<&std::path::Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".into())
}
