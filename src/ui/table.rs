use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::severity_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Filtered records table
// ---------------------------------------------------------------------------

/// Render the current view as a striped, virtualised table.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(280.0)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Country");
            });
            header.col(|ui| {
                ui.strong("Year");
            });
            header.col(|ui| {
                ui.strong("Impact");
            });
            header.col(|ui| {
                ui.strong("Premature deaths");
            });
            header.col(|ui| {
                ui.strong("Discharges (million m³)");
            });
            header.col(|ui| {
                ui.strong("Lat / Lon");
            });
        })
        .body(|body| {
            body.rows(18.0, state.view.len(), |mut row| {
                let rec = &dataset.records[state.view[row.index()]];
                row.col(|ui| {
                    ui.label(&rec.entity);
                });
                row.col(|ui| {
                    ui.label(rec.year.to_string());
                });
                row.col(|ui| {
                    ui.label(
                        RichText::new(&rec.health_impact)
                            .color(severity_color(&rec.health_impact)),
                    );
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", rec.premature_deaths));
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", rec.discharge_volume));
                });
                row.col(|ui| {
                    match rec.coords() {
                        Some((lat, lon)) => ui.label(format!("{lat:.2}, {lon:.2}")),
                        None => ui.label("–"),
                    };
                });
            });
        });
}
