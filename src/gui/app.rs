//! Dashboard Main Application
//! Main window with navigation panel and chart viewer.

use crate::charts::ACCENT_COLOR;
use crate::config::DashboardConfig;
use crate::data::Dataset;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, ViewerAction};
use crate::views::{Selection, View, ViewData};
use egui::{Color32, SidePanel};
use tracing::{debug, warn};

const BACKGROUND: Color32 = Color32::from_rgb(17, 17, 17);
const TEXT_COLOR: Color32 = Color32::from_rgb(224, 224, 224);

/// View data together with the inputs it was computed from.
struct ComputedView {
    view: View,
    selection: Option<Selection>,
    data: Result<ViewData, String>,
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    dataset: Dataset,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    selection: Option<Selection>,
    computed: Option<ComputedView>,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig, dataset: Dataset) -> Self {
        Self::apply_theme(&cc.egui_ctx);
        Self::with_data(config, dataset)
    }

    fn with_data(config: DashboardConfig, dataset: Dataset) -> Self {
        let chart_viewer = ChartViewer::new(dataset.sales_regions(), dataset.sales_years());
        let selection = Selection::initial(&dataset);

        Self {
            config,
            dataset,
            control_panel: ControlPanel::new(),
            chart_viewer,
            selection,
            computed: None,
        }
    }

    fn apply_theme(ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = BACKGROUND;
        visuals.window_fill = BACKGROUND;
        visuals.override_text_color = Some(TEXT_COLOR);
        visuals.hyperlink_color = ACCENT_COLOR;
        visuals.selection.bg_fill = ACCENT_COLOR.gamma_multiply(0.5);
        ctx.set_visuals(visuals);
    }

    /// Recompute the current view when the view or the selection changed.
    fn refresh_view(&mut self) {
        let view = self.control_panel.current;
        if let Some(computed) = &self.computed {
            if computed.view == view && computed.selection == self.selection {
                return;
            }
        }

        debug!(?view, selection = ?self.selection, "View inputs changed");
        let data = ViewData::compute(view, &self.dataset, self.selection.as_ref(), &self.config)
            .map_err(|e| {
                warn!(?view, error = %e, "Failed to compute view");
                e.to_string()
            });

        self.computed = Some(ComputedView {
            view,
            selection: self.selection.clone(),
            data,
        });
    }

    fn handle_viewer_action(&mut self, action: ViewerAction) {
        match action {
            ViewerAction::None => {}
            ViewerAction::Select(selection) => self.selection = Some(selection),
            ViewerAction::OpenUrl(url) => {
                if let Err(e) = open::that(&url) {
                    warn!(%url, error = %e, "Failed to open report link");
                }
            }
            ViewerAction::OpenFile(path) => {
                if let Err(e) = open::that(&path) {
                    warn!(path = %path.display(), error = %e, "Failed to open report file");
                }
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Navigation
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.dataset.report());
                    if let ControlPanelAction::Navigate(view) = action {
                        self.control_panel.current = view;
                    }
                });
            });

        self.refresh_view();

        // Central panel - Chart Viewer
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| match &self.computed {
                Some(computed) => self.chart_viewer.show(ui, computed.view, &computed.data),
                None => ViewerAction::None,
            })
            .inner;

        if action != ViewerAction::None {
            self.handle_viewer_action(action);
            ctx.request_repaint();
        }
    }
}
