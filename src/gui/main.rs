// GUI entry point for lossy-compressor
// Interactive preview of palette reduction and JPEG quality, with JPEG/ICO export

use eframe::egui;

mod app;
use app::CompressorApp;

fn main() -> Result<(), eframe::Error> {
    lossy_compressor::utils::init_logging(false);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([860.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Lossy Image Compressor + ICO",
        options,
        Box::new(|cc| Ok(Box::new(CompressorApp::new(cc)))),
    )
}
