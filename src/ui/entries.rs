use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::language::LanguageProfile;
use crate::data::model::{CourseInfo, LayoutKind, SeasonCode, Stripe};
use crate::state::AppState;

const ODD_ROW: Color32 = Color32::from_rgb(0xee, 0xf3, 0xfb);
const EVEN_ROW: Color32 = Color32::from_rgb(0xff, 0xff, 0xff);
const CARD_WIDTH: f32 = 200.0;

// ---------------------------------------------------------------------------
// Course entries (central panel)
// ---------------------------------------------------------------------------

/// Render the visible entries of the loaded page.
pub fn course_entries(ui: &mut Ui, state: &AppState) {
    if state.page.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a course page to filter  (File → Open…)");
        });
        return;
    }

    match state.view.layout {
        Some(LayoutKind::List) => list_table(ui, state),
        Some(LayoutKind::Thumbnail) => thumbnail_cards(ui, state),
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("No course list found on this page.");
            });
        }
    }
}

/// List layout: the rows that remain visible, coloured by their row class.
fn list_table(ui: &mut Ui, state: &AppState) {
    let view = &state.view;
    let profile = state.profile();
    let n_cols = view
        .entries
        .iter()
        .map(|e| e.cells.len())
        .chain(std::iter::once(view.header.len()))
        .max()
        .unwrap_or(0)
        .max(1);

    TableBuilder::new(ui)
        .striped(false)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), n_cols - 1)
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for i in 0..n_cols {
                header.col(|ui| {
                    ui.strong(view.header.get(i).map(String::as_str).unwrap_or(""));
                });
            }
        })
        .body(|mut body| {
            for entry in view.visible_entries() {
                let fill = match entry.stripe {
                    Some(Stripe::Odd) => ODD_ROW,
                    Some(Stripe::Even) | None => EVEN_ROW,
                };
                let hover = describe(entry.info.as_ref(), profile);
                body.row(20.0, |mut row| {
                    for i in 0..n_cols {
                        row.col(|ui| {
                            ui.painter().rect_filled(ui.max_rect(), 0.0, fill);
                            let text = entry.cells.get(i).map(String::as_str).unwrap_or("");
                            ui.label(RichText::new(text).color(Color32::BLACK))
                                .on_hover_text(hover.as_str());
                        });
                    }
                });
            }
        });
}

/// Thumbnail layout: visible cards in a wrapping grid.
fn thumbnail_cards(ui: &mut Ui, state: &AppState) {
    let profile = state.profile();
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for entry in state.view.visible_entries() {
                    ui.push_id(entry.node, |ui: &mut Ui| {
                        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                            ui.set_width(CARD_WIDTH);
                            ui.vertical(|ui: &mut Ui| {
                                let title = entry.cells.first().map(String::as_str).unwrap_or("");
                                ui.label(RichText::new(title).strong());
                                if !entry.label.is_empty() {
                                    ui.small(entry.label.as_str())
                                        .on_hover_text(describe(entry.info.as_ref(), profile));
                                }
                            });
                        });
                    });
                }
            });
        });
}

/// Hover text summarizing what the schedule parsed to, with season names
/// taken from the display language.
fn describe(info: Option<&CourseInfo>, profile: &LanguageProfile) -> String {
    let Some(info) = info else {
        return "Schedule not recognized; always shown".to_string();
    };
    let seasons: Vec<&str> = [SeasonCode::Spring, SeasonCode::Autumn]
        .into_iter()
        .filter(|&season| info.has_season(season))
        .map(|season| profile.season_name(season))
        .collect();
    let segments: String = info.segments.iter().map(|s| s.display_letter()).collect();
    format!("{} {segments}", seasons.join("+"))
}
