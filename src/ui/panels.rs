use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::language::{detect_language, selector_label, LANGUAGES};
use crate::data::loader;
use crate::data::model::ModuleCode;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – module selector
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Module");
    ui.separator();

    let profile = state.profile();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Module selector ----
            let current = state.selection;
            egui::ComboBox::from_id_salt("module_selector")
                .selected_text(selector_label(current, profile))
                .show_ui(ui, |ui: &mut Ui| {
                    for code in ModuleCode::ALL_CODES {
                        if ui
                            .selectable_label(current == code, selector_label(code, profile))
                            .clicked()
                        {
                            state.select(code);
                        }
                    }
                });
            ui.separator();

            // ---- Display language ----
            ui.strong("Language");
            let detected = match &state.page {
                Some(page) => detect_language(page, &state.config.default_language),
                None => state.config.default_language.clone(),
            };
            let auto_text = format!("Auto ({detected})");
            let selected_text = state
                .language_override
                .clone()
                .unwrap_or_else(|| auto_text.clone());
            egui::ComboBox::from_id_salt("language")
                .selected_text(selected_text)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(state.language_override.is_none(), auto_text.as_str())
                        .clicked()
                    {
                        state.set_language_override(None);
                    }
                    for lang in LANGUAGES.iter() {
                        let chosen = state.language_override.as_deref() == Some(lang.code);
                        if ui.selectable_label(chosen, lang.code).clicked() {
                            state.set_language_override(Some(lang.code.to_string()));
                        }
                    }
                });
            ui.separator();

            // ---- Last pass ----
            if let Some(summary) = &state.summary {
                ui.label(format!("Layout: {}", summary.layout));
                ui.label(format!("Hidden: {}", summary.hidden()));
                if summary.forced > 0 {
                    ui.label(format!("Unrecognized schedules kept: {}", summary.forced));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_save = state.page.is_some();
            if ui.add_enabled(can_save, egui::Button::new("Save filtered page…")).clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(summary) = &state.summary {
            ui.label(format!(
                "{} courses, {} visible",
                summary.total, summary.visible
            ));
        }

        if let Some(path) = &state.page_path {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open course page")
        .add_filter("Supported files", &["html", "htm", "json"])
        .add_filter("HTML", &["html", "htm"])
        .add_filter("JSON snapshot", &["json"])
        .pick_file();

    if let Some(path) = file {
        open_page(state, path);
    }
}

/// Load `path` and run the current selection over it.
pub fn open_page(state: &mut AppState, path: PathBuf) {
    match loader::load_file(&path) {
        Ok(page) => {
            log::info!("Loaded {} ({} nodes)", path.display(), page.len());
            state.set_page(page, Some(path));
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn save_file_dialog(state: &mut AppState) {
    let Some(page) = &state.page else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Save filtered page")
        .set_file_name("filtered.html")
        .add_filter("HTML", &["html"])
        .save_file();

    if let Some(path) = file {
        match loader::save_html(page, &path) {
            Ok(()) => log::info!("Saved filtered page to {}", path.display()),
            Err(e) => {
                log::error!("Failed to save page: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
