mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::SalesDashboardApp;
use eframe::egui;

/// Data file loaded automatically at startup when present in the working
/// directory.  The `generate_sample` binary writes one.
const DEFAULT_DATA_FILE: &str = "sales_data.xlsx";

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Salesdash – Sales Analytics",
        options,
        Box::new(|_cc| {
            let mut app = SalesDashboardApp::default();

            let path = Path::new(DEFAULT_DATA_FILE);
            if path.exists() {
                match data::loader::load_file(path) {
                    Ok(dataset) => {
                        log::info!("Loaded {} records from {DEFAULT_DATA_FILE}", dataset.len());
                        app.state.set_dataset(dataset);
                    }
                    Err(e) => {
                        log::error!("Failed to load {DEFAULT_DATA_FILE}: {e}");
                        app.state.status_message = Some(format!("Error: {e}"));
                    }
                }
            }

            Ok(Box::new(app))
        }),
    )
}
