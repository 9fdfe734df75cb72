use eframe::egui::{self, Color32, RichText};

use crate::data::aggregate::Metric;
use crate::state::AppState;
use crate::ui::{charts, map, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

const DEATHS_COLOR: Color32 = Color32::from_rgb(231, 76, 60);
const DISCHARGE_COLOR: Color32 = Color32::from_rgb(52, 152, 219);

pub struct WastewatchApp {
    pub state: AppState,
}

impl WastewatchApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for WastewatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: toolbar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard sections ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut egui::Ui| {
                    ui.heading("No dataset loaded – see the toolbar for details.");
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut egui::Ui| {
                    ui.heading("Wastewater Impact Dashboard");
                    ui.label(
                        "This dashboard visualizes the impacts of wastewater discharges on \
                         both the environment and public health. It explores correlations \
                         and provides interactive data insights.",
                    );
                    ui.add_space(8.0);

                    if self.state.view.is_empty() {
                        ui.label(
                            RichText::new(
                                "No data available for the selected year range and filters.",
                            )
                            .color(Color32::RED),
                        );
                        return;
                    }

                    ui.separator();
                    map::discharge_map(ui, &self.state);

                    ui.separator();
                    ui.heading("Detailed Impact Analysis");
                    ui.columns(2, |cols: &mut [egui::Ui]| {
                        cols[0].strong("Health Impact Over Time");
                        charts::year_series(
                            &mut cols[0],
                            "deaths_by_year",
                            &self.state.deaths_by_year,
                            Metric::PrematureDeaths.label(),
                            DEATHS_COLOR,
                        );
                        cols[0].weak(
                            "This graph demonstrates the trend of premature death counts \
                             over time, providing insights into the health impact of unsafe \
                             water sources.",
                        );

                        cols[1].strong("Environmental Impact Over Time");
                        charts::year_series(
                            &mut cols[1],
                            "discharge_by_year",
                            &self.state.discharge_by_year,
                            Metric::DischargeVolume.label(),
                            DISCHARGE_COLOR,
                        );
                        cols[1].weak(
                            "This graph shows the trend of discharges to inland waters over \
                             time, indicating the volume of wastewater released into natural \
                             water bodies.",
                        );
                    });

                    ui.separator();
                    ui.heading("Health Impact Distribution");
                    charts::category_pie(ui, &self.state);
                    ui.weak(
                        "This pie chart displays the distribution of health impacts, \
                         categorizing them by severity to aid in prioritizing health \
                         interventions.",
                    );

                    ui.separator();
                    ui.heading("Filtered records");
                    table::records_table(ui, &self.state);
                });
        });
    }
}
