//! slowSnow - decorative snowfall for the slow computer
//!
//! A quiet window of falling snow, with the overlay painted behind the
//! content. Space or the view menu toggles it; the choice is remembered
//! per viewer.

mod app;

use app::SlowSnowApp;
use eframe::NativeOptions;

fn main() -> eframe::Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title("slowsnow"),
        ..Default::default()
    };

    eframe::run_native(
        "slowsnow",
        options,
        Box::new(|cc| Box::new(SlowSnowApp::new(cc))),
    )
}
