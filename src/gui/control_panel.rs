//! Control Panel Widget
//! Left side navigation between the dashboard views, plus a data-quality summary.

use crate::charts::ACCENT_COLOR;
use crate::data::CleaningReport;
use crate::views::View;
use egui::{Color32, RichText};

const NAV_BACKGROUND: Color32 = Color32::from_rgb(14, 17, 23);
const NAV_TEXT: Color32 = Color32::from_rgb(194, 194, 194);

/// Left side panel selecting the current view.
#[derive(Default)]
pub struct ControlPanel {
    pub current: View,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, report: &CleaningReport) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(RichText::new("🔍 Navigation").size(22.0).color(ACCENT_COLOR));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        ui.label(RichText::new("⚡ Project Sections").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(NAV_BACKGROUND)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                for view in View::ALL {
                    let selected = self.current == view;
                    let text = if selected {
                        RichText::new(view.label()).size(16.0).color(Color32::BLACK)
                    } else {
                        RichText::new(view.label()).size(16.0).color(NAV_TEXT)
                    };
                    let button = egui::Button::new(text)
                        .fill(if selected { ACCENT_COLOR } else { NAV_BACKGROUND })
                        .min_size(egui::vec2(ui.available_width(), 30.0));
                    if ui.add(button).clicked() && !selected {
                        action = ControlPanelAction::Navigate(view);
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Quality Section =====
        ui.label(RichText::new("🧹 Data Quality").size(14.0).strong());
        ui.add_space(5.0);

        egui::Grid::new("cleaning_report")
            .striped(true)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                let rows = [
                    ("Sales rows loaded", report.raw_sales_rows),
                    ("EV Sales rows kept", report.kept_sales_rows),
                    ("Other parameters", report.other_parameter_rows),
                    ("Missing values", report.missing_value_rows),
                    ("Unparsed wait times", report.unparsed_wait_times),
                ];
                for (label, count) in rows {
                    ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                    ui.label(RichText::new(count.to_string()).size(11.0));
                    ui.end_row();
                }
            });

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Navigate(View),
}
