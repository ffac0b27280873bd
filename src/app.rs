use eframe::egui;

use crate::state::AppState;
use crate::ui::{entries, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CourseFilterApp {
    pub state: AppState,
}

impl eframe::App for CourseFilterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: module selector ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: course entries ----
        egui::CentralPanel::default().show(ctx, |ui| {
            entries::course_entries(ui, &self.state);
        });
    }
}
