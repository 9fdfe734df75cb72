use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// The two filterable columns of the dataset.
#[derive(Clone, Copy, PartialEq, Eq)]
enum FilterColumn {
    Country,
    HealthImpact,
}

impl FilterColumn {
    fn title(self) -> &'static str {
        match self {
            FilterColumn::Country => "Country",
            FilterColumn::HealthImpact => "Health Impact",
        }
    }
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some((min_year, max_year)) = dataset.year_bounds else {
        ui.label("Dataset has no rows.");
        return;
    };

    // Clone what we need so we can mutate state inside the widgets.
    let entities: Vec<String> = dataset.entities.iter().cloned().collect();
    let categories: Vec<String> = dataset.categories.iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year range ----
            ui.strong("Select Year Range");
            let (mut from, mut to) = state.criteria.years;
            let mut edited = false;
            edited |= ui
                .add(Slider::new(&mut from, min_year..=max_year).text("from"))
                .changed();
            edited |= ui
                .add(Slider::new(&mut to, min_year..=max_year).text("to"))
                .changed();
            if edited {
                state.set_year_range(from, to);
            }
            ui.separator();

            // ---- Country / health-impact multiselects ----
            checkbox_filter(ui, state, FilterColumn::Country, &entities);
            checkbox_filter(ui, state, FilterColumn::HealthImpact, &categories);
        });
}

/// One collapsible checkbox list with All/None buttons and a selected/total
/// count in the header.
fn checkbox_filter(ui: &mut Ui, state: &mut AppState, column: FilterColumn, values: &[String]) {
    let selected = match column {
        FilterColumn::Country => &state.criteria.entities,
        FilterColumn::HealthImpact => &state.criteria.categories,
    };
    let header_text = format!("{}  ({}/{})", column.title(), selected.len(), values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column.title())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    match column {
                        FilterColumn::Country => state.select_all_entities(),
                        FilterColumn::HealthImpact => state.select_all_categories(),
                    }
                }
                if ui.small_button("None").clicked() {
                    match column {
                        FilterColumn::Country => state.clear_entities(),
                        FilterColumn::HealthImpact => state.clear_categories(),
                    }
                }
            });

            for value in values {
                let is_selected = match column {
                    FilterColumn::Country => state.criteria.entities.contains(value),
                    FilterColumn::HealthImpact => state.criteria.categories.contains(value),
                };

                // Tint category labels with their distribution-chart colour.
                let mut text = RichText::new(value);
                if column == FilterColumn::HealthImpact {
                    text = text.color(state.category_colors.color_for(value));
                }

                let mut checked = is_selected;
                if ui.checkbox(&mut checked, text).changed() {
                    match column {
                        FilterColumn::Country => state.toggle_entity(value),
                        FilterColumn::HealthImpact => state.toggle_category(value),
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar: title, row counts, refresh, status.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Wastewatch");
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} in view",
                ds.len(),
                state.view.len()
            ));
            ui.separator();

            if ui.button("Refresh Dashboard").clicked() {
                state.refresh();
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
