mod app;
mod config;
mod data;
mod error;
mod prefs;
mod state;
mod ui;

use std::path::PathBuf;

use app::CourseFilterApp;
use config::Config;
use eframe::egui;
use prefs::JsonFilePreferenceStore;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::load().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {e:#}");
        Config::default()
    });
    let store = JsonFilePreferenceStore::open(&config.preferences_path());
    log::debug!("preferences at {}", store.path().display());

    let mut state = AppState::new(config, Box::new(store));

    // Optional page to open on startup.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        ui::panels::open_page(&mut state, path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Course Module Filter",
        options,
        Box::new(|_cc| Ok(Box::new(CourseFilterApp { state }))),
    )
}
