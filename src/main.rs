//! EV Dashboard - EV Demand vs Charging Supply
//!
//! Desktop dashboard for EV sales, charging station load and regional adoption.

use anyhow::{Context, Result};
use eframe::egui;
use ev_dashboard::config::DashboardConfig;
use ev_dashboard::data::DataLoader;
use ev_dashboard::gui::DashboardApp;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ev_dashboard=info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = DashboardConfig::load()?;

    // Missing input tables are fatal
    let dataset = DataLoader::load(&config.data_paths()).context("Failed to load dashboard data")?;
    info!(report = ?dataset.report(), "Dashboard data ready");

    let title = config.window.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([1000.0, 600.0])
            .with_title(title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {e}"))
}
