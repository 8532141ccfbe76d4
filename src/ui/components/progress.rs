// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Progress panel for a running archive job.

use eframe::egui;

use crate::logic::Stage;
use crate::models::ProgressEvent;
use crate::utils::format_duration;

/// One-line summary shown under the progress bar.
pub fn progress_caption(event: &ProgressEvent) -> String {
    format!(
        "{} of {} files · elapsed {} · about {} left (CPU {:.0}%)",
        event.processed,
        event.total(),
        format_duration(event.elapsed),
        format_duration(event.eta),
        event.cpu_percent
    )
}

/// Render the progress bar, counters, and current stage.
///
/// Shows nothing until the job publishes its first progress snapshot.
pub fn view(ui: &mut egui::Ui, progress: Option<&ProgressEvent>, stage: Stage, running: bool) {
    let Some(event) = progress else {
        if running {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new().size(14.0));
                ui.label(stage.label());
            });
        }
        return;
    };

    ui.add(
        egui::ProgressBar::new(event.fraction())
            .show_percentage()
            .animate(running),
    );
    ui.label(progress_caption(event));
    ui.label(
        egui::RichText::new(format!("{} · last file: {}", stage.label(), event.current))
            .small()
            .color(egui::Color32::from_gray(110)),
    );
}
