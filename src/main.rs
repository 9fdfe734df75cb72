mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use app::WastewatchApp;
use data::filter::init_criteria;
use data::geo::{self, CoordinateTable};
use data::loader;
use eframe::egui;
use state::AppState;

const DEFAULT_DATA_PATH: &str = "data/wastewater_impact.csv";

fn main() -> eframe::Result {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    let state = load_state(&path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wastewatch – Wastewater Impact Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(WastewatchApp::new(state)))),
    )
}

/// Run the startup pipeline: load the file, attach coordinates, derive the
/// filter controls. Failures become a red status message instead of an exit
/// so the window still opens.
fn load_state(path: &Path) -> AppState {
    let dataset = match loader::load_file(path) {
        Ok(dataset) => geo::enrich(dataset, CoordinateTable::builtin()),
        Err(e) => {
            let err = anyhow::Error::from(e);
            log::error!("failed to load {}: {err:#}", path.display());
            return AppState::failed(format!(
                "Failed to load data from {}: {err:#}",
                path.display()
            ));
        }
    };

    log::info!(
        "loaded {} records from {} ({} countries, {} impact categories)",
        dataset.len(),
        path.display(),
        dataset.entities.len(),
        dataset.categories.len()
    );

    match init_criteria(&dataset) {
        Ok(criteria) => AppState::with_dataset(dataset, criteria),
        Err(e) => {
            log::error!("failed to initialise filters: {e}");
            AppState::failed(format!("Error loading filters: {e}"))
        }
    }
}
