use eframe::egui::{self, Color32, CornerRadius, Pos2, Sense, Stroke, Ui, Vec2};
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Per-year time series
// ---------------------------------------------------------------------------

/// Render one per-year series as a line with point markers.
pub fn year_series(ui: &mut Ui, id: &str, series: &[(i32, f64)], y_label: &str, color: Color32) {
    let points: Vec<[f64; 2]> = series
        .iter()
        .map(|&(year, v)| [f64::from(year), v])
        .collect();

    Plot::new(id)
        .height(220.0)
        .x_axis_label("Year")
        .y_axis_label(y_label)
        .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .color(color)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(3.0)
                    .color(color),
            );
        });
}

// ---------------------------------------------------------------------------
// Health-impact distribution (pie)
// ---------------------------------------------------------------------------

/// Render the category distribution as a pie with a swatch legend showing
/// the count and share of each slice.
pub fn category_pie(ui: &mut Ui, state: &AppState) {
    let total: usize = state.category_counts.values().sum();
    if total == 0 {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(220.0), Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;

        // Slices as triangle fans: egui fills convex polygons only, so each
        // slice is approximated by short arc segments.
        let mut angle = -std::f64::consts::FRAC_PI_2;
        for (category, &count) in &state.category_counts {
            let sweep = std::f64::consts::TAU * count as f64 / total as f64;
            let color = state.category_colors.color_for(category);

            let steps = (sweep / 0.05).ceil().max(1.0) as usize;
            let mut prev = arc_point(center, radius, angle);
            for step in 1..=steps {
                let next = arc_point(center, radius, angle + sweep * step as f64 / steps as f64);
                painter.add(egui::Shape::convex_polygon(
                    vec![center, prev, next],
                    color,
                    Stroke::NONE,
                ));
                prev = next;
            }
            angle += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for (category, &count) in &state.category_counts {
                let color = state.category_colors.color_for(category);
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, painter) = ui.allocate_painter(Vec2::splat(12.0), Sense::hover());
                    painter.rect_filled(swatch.rect, CornerRadius::same(2), color);
                    let share = 100.0 * count as f64 / total as f64;
                    ui.label(format!("{category}: {count} ({share:.1}%)"));
                });
            }
        });
    });
}

fn arc_point(center: Pos2, radius: f32, angle: f64) -> Pos2 {
    center + radius * Vec2::new(angle.cos() as f32, angle.sin() as f32)
}
