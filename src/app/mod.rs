//! Application entry point wiring egui/eframe to launch the archiver UI.

use eframe::egui;
use egui_phosphor::Variant;

use crate::models::Settings;
use crate::ui::VidPackApp;

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(settings: Settings) -> eframe::Result<()> {
    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 420.0])
            .with_min_inner_size([560.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Video Archiver",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(VidPackApp::new(settings)))
        }),
    )
}
