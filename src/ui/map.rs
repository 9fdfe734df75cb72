use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::color::severity_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Discharge map (scatter of record coordinates)
// ---------------------------------------------------------------------------

/// Half-width in degrees of the viewport kept around the view's mean
/// coordinate.
const CENTER_SPAN: f64 = 30.0;

/// Render the map: one marker per mappable filtered record, grouped into a
/// legend series per health-impact category. Rows without coordinates are
/// left off the map.
pub fn discharge_map(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    let mut plot = Plot::new("discharge_map")
        .height(320.0)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .legend(Legend::default())
        .allow_scroll(false);

    if let Some((lat, lon)) = state.map_center {
        plot = plot
            .include_x(lon - CENTER_SPAN)
            .include_x(lon + CENTER_SPAN)
            .include_y(lat - CENTER_SPAN)
            .include_y(lat + CENTER_SPAN);
    }

    plot.show(ui, |plot_ui| {
        let mut by_category: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
        for &i in &state.view {
            let rec = &dataset.records[i];
            if let Some((lat, lon)) = rec.coords() {
                by_category
                    .entry(rec.health_impact.as_str())
                    .or_default()
                    .push([lon, lat]);
            }
        }

        for (category, coords) in by_category {
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .radius(4.0)
                    .color(severity_color(category))
                    .name(category),
            );
        }
    });
}
