// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Segmented controls for compression format and file selection.

use eframe::egui;

use crate::models::CompressionFormat;
use crate::mvu::SelectionMode;

/// Render the compression choice. Returns the newly chosen format, if any.
pub fn compression_view(
    ui: &mut egui::Ui,
    current: Option<CompressionFormat>,
) -> Option<CompressionFormat> {
    let mut picked = None;
    ui.horizontal(|ui| {
        for format in [CompressionFormat::Deflate, CompressionFormat::Store] {
            let button = egui::Button::new(format.label()).selected(current == Some(format));
            let hover = match format {
                CompressionFormat::Deflate => "Deflate at level 9",
                CompressionFormat::Store => "No compression, fastest",
            };
            if ui.add(button).on_hover_text(hover).clicked() {
                picked = Some(format);
            }
        }
    });
    picked.filter(|f| current != Some(*f))
}

/// Render the file selection choice. Returns the newly chosen mode, if any.
pub fn selection_view(
    ui: &mut egui::Ui,
    current: SelectionMode,
    extensions: &[String],
) -> Option<SelectionMode> {
    let mut choice = current;
    ui.horizontal(|ui| {
        ui.selectable_value(&mut choice, SelectionMode::Videos, "Videos only")
            .on_hover_text(format!("Top-level .{} files", extensions.join(", .")));
        ui.selectable_value(&mut choice, SelectionMode::AllFiles, "All files")
            .on_hover_text("Every file, including subfolders");
    });
    (choice != current).then_some(choice)
}
