//! Chart Viewer Widget
//! Central scrollable panel rendering the data of the current view.

use crate::charts::{ChartPlotter, ACCENT_COLOR};
use crate::report::EmbeddedReport;
use crate::stats::{JoinDiagnostics, KeyMetrics};
use crate::views::{InteractiveView, KeyInsights, Selection, View, ViewData};
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::path::PathBuf;

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const CARD_WIDTH: f32 = 260.0;

/// Displays view data; owns the dropdown choices of the interactive view.
pub struct ChartViewer {
    regions: Vec<String>,
    years: Vec<i64>,
}

impl ChartViewer {
    pub fn new(regions: Vec<String>, years: Vec<i64>) -> Self {
        Self { regions, years }
    }

    /// Draw the current view and report what the user asked for.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        view: View,
        data: &Result<ViewData, String>,
    ) -> ViewerAction {
        let mut action = ViewerAction::None;

        ui.label(RichText::new(view.title()).size(26.0).strong().color(ACCENT_COLOR));
        ui.add_space(8.0);

        let data = match data {
            Ok(data) => data,
            Err(error) => {
                ui.label(RichText::new(format!("Error: {}", error)).color(ERROR_COLOR));
                return action;
            }
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match data {
                ViewData::PowerBi { url } => action = Self::show_powerbi(ui, url),
                ViewData::Interactive(view) => action = self.show_interactive(ui, view),
                ViewData::EdaSummary(report) => action = Self::show_eda(ui, report),
                ViewData::KeyInsights(insights) => Self::show_insights(ui, insights),
            });

        action
    }

    fn show_powerbi(ui: &mut egui::Ui, url: &str) -> ViewerAction {
        let mut action = ViewerAction::None;

        ui.label("Explore real-time analytics of Tesla EV trends and charging station load.");
        ui.add_space(12.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new("Power BI report").size(16.0).strong());
                ui.add_space(4.0);
                ui.hyperlink_to("Open the hosted report", url);
                ui.add_space(8.0);
                if ui.button("🌐 Open in browser").clicked() {
                    action = ViewerAction::OpenUrl(url.to_string());
                }
            });

        action
    }

    fn show_interactive(&self, ui: &mut egui::Ui, view: &InteractiveView) -> ViewerAction {
        let mut action = ViewerAction::None;
        let selection = view.selection.as_ref();
        let region = selection.map_or("", |s| s.region.as_str());
        let year = selection.map(|s| s.year);

        ui.horizontal(|ui| {
            ui.label("Select Region");
            ComboBox::from_id_salt("select_region")
                .width(180.0)
                .selected_text(region)
                .show_ui(ui, |ui| {
                    for choice in &self.regions {
                        if ui.selectable_label(region == choice.as_str(), choice).clicked() {
                            if let Some(year) = year {
                                action = ViewerAction::Select(Selection {
                                    region: choice.clone(),
                                    year,
                                });
                            }
                        }
                    }
                });

            ui.add_space(20.0);

            ui.label("Select Year");
            ComboBox::from_id_salt("select_year")
                .width(100.0)
                .selected_text(year.map(|y| y.to_string()).unwrap_or_default())
                .show_ui(ui, |ui| {
                    for &choice in &self.years {
                        if ui
                            .selectable_label(year == Some(choice), choice.to_string())
                            .clicked()
                        {
                            if let Some(selection) = selection {
                                action = ViewerAction::Select(Selection {
                                    region: selection.region.clone(),
                                    year: choice,
                                });
                            }
                        }
                    }
                });
        });

        ui.add_space(12.0);
        Self::section(ui, "🔹 Key Metrics");
        Self::metric_cards(ui, &view.metrics);

        ui.add_space(12.0);
        Self::section(ui, "📊 EV Sales Over Time");
        ChartPlotter::draw_year_lines(
            ui,
            "sales_trend",
            &ChartPlotter::trend_series(&view.trend),
            "value",
        );

        ui.add_space(12.0);
        Self::section(ui, "⚡ Station Load by Location");
        ChartPlotter::draw_station_load(ui, &view.station_load);

        action
    }

    fn metric_cards(ui: &mut egui::Ui, metrics: &KeyMetrics) {
        let wait = metrics
            .avg_wait_minutes
            .map_or_else(|| "n/a".to_string(), |w| format!("{:.1}", w));
        let cards = [
            ("Total EV Sales", format_thousands(metrics.total_sales)),
            ("Avg Wait Time (min)", wait),
            ("Charging Sessions", format_thousands(metrics.total_sessions as f64)),
        ];

        ui.horizontal(|ui| {
            for (label, value) in cards {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(8.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(CARD_WIDTH);
                        ui.label(RichText::new(label).size(13.0).color(Color32::GRAY));
                        ui.label(RichText::new(value).size(28.0).strong());
                    });
                ui.add_space(10.0);
            }
        });
    }

    fn show_eda(ui: &mut egui::Ui, report: &EmbeddedReport) -> ViewerAction {
        let mut action = ViewerAction::None;

        ui.horizontal(|ui| {
            let name = report
                .title()
                .unwrap_or_else(|| report.path.display().to_string());
            ui.label(RichText::new(name).size(16.0).strong());
            if ui.button("📂 Open full report").clicked() {
                action = ViewerAction::OpenFile(report.path.clone());
            }
        });
        ui.add_space(8.0);

        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(5.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("eda_preview")
                    .max_height(800.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(report.text_preview()).monospace());
                    });
            });

        action
    }

    fn show_insights(ui: &mut egui::Ui, insights: &KeyInsights) {
        Self::section(ui, "📍 Which regions have high EV sales but fewer stations?");
        ChartPlotter::draw_sales_vs_stations(ui, &insights.sales_vs_stations.rows);
        Self::excluded_caption(ui, &insights.sales_vs_stations.diagnostics, "sales", "regional");

        ui.add_space(12.0);
        Self::section(ui, "⚠️ Are there stations with long wait times but low sessions?");
        ChartPlotter::draw_sessions_vs_wait(ui, &insights.station_waits);

        ui.add_space(12.0);
        Self::section(ui, "📈 What modes (cars, buses, bikes) are trending across regions?");
        ChartPlotter::draw_mode_totals(ui, &insights.mode_totals);

        ui.add_space(12.0);
        Self::section(ui, "🧭 How does average wait time relate to EV adoption rate?");
        ChartPlotter::draw_adoption_vs_wait(ui, &insights.adoption_vs_wait);
        if let Some(fit) = insights.adoption_vs_wait.fit {
            let p = fit
                .p_value
                .map_or_else(|| "n/a".to_string(), |p| format!("{:.4}", p));
            ui.label(
                RichText::new(format!(
                    "AvgWaitTime = {:.3} + {:.3} × EV_AdoptionRate   R² = {:.3}   p = {}   n = {}",
                    fit.intercept, fit.slope, fit.r_squared, p, fit.n
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }
        Self::excluded_caption(
            ui,
            &insights.adoption_vs_wait.joined.diagnostics,
            "station",
            "regional",
        );

        ui.add_space(12.0);
        Self::section(ui, "💡 Which years saw the most EV growth by region?");
        ChartPlotter::draw_year_lines(
            ui,
            "yearly_growth",
            &ChartPlotter::growth_series(&insights.yearly_growth),
            "value",
        );
    }

    fn section(ui: &mut egui::Ui, heading: &str) {
        ui.label(RichText::new(heading).size(18.0).strong().color(ACCENT_COLOR));
        ui.add_space(4.0);
    }

    fn excluded_caption(ui: &mut egui::Ui, diagnostics: &JoinDiagnostics, left: &str, right: &str) {
        if let Some(caption) = excluded_caption_text(diagnostics, left, right) {
            ui.label(RichText::new(caption).size(11.0).color(Color32::GRAY));
        }
    }
}

/// Actions requested from the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    None,
    Select(Selection),
    OpenUrl(String),
    OpenFile(PathBuf),
}

/// Integer part with thousands separators, e.g. `1234567.9` as `1,234,567`.
pub fn format_thousands(value: f64) -> String {
    let n = value.trunc() as i64;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Caption listing regions an inner join left out, if any.
pub fn excluded_caption_text(diagnostics: &JoinDiagnostics, left: &str, right: &str) -> Option<String> {
    if diagnostics.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    if !diagnostics.left_only.is_empty() {
        parts.push(format!(
            "only in {} data: {}",
            left,
            diagnostics.left_only.join(", ")
        ));
    }
    if !diagnostics.right_only.is_empty() {
        parts.push(format!(
            "only in {} data: {}",
            right,
            diagnostics.right_only.join(", ")
        ));
    }
    Some(format!(
        "{} excluded regions ({})",
        diagnostics.excluded_count(),
        parts.join("; ")
    ))
}
