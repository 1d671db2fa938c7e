//! Dashboard Views
//! The four navigation targets and the data each one displays.

use thiserror::Error;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::data::Dataset;
use crate::report::{EmbeddedReport, ReportError};
use crate::stats::{
    AdoptionTrend, AggregateError, Aggregator, Joined, KeyMetrics, ModeTotal,
    RegionSalesVsStations, StationLoad, TrendSeries, YearlyTotal,
};

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Navigation targets, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    PowerBiDashboard,
    InteractiveVisuals,
    EdaSummary,
    KeyInsights,
}

impl View {
    pub const ALL: [View; 4] = [
        View::PowerBiDashboard,
        View::InteractiveVisuals,
        View::EdaSummary,
        View::KeyInsights,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::PowerBiDashboard => "📊 Power BI Dashboard",
            View::InteractiveVisuals => "📈 Interactive Visuals",
            View::EdaSummary => "📘 EDA Summary",
            View::KeyInsights => "❓ Key Insights",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::PowerBiDashboard => "Tesla EV Demand vs Charging Supply Dashboard",
            View::InteractiveVisuals => "Interactive Dashboard",
            View::EdaSummary => "EDA Notebook Preview",
            View::KeyInsights => "Data Exploration Analysis Questions",
        }
    }
}

/// Region and year chosen in the interactive view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub region: String,
    pub year: i64,
}

impl Selection {
    /// First region and first year of the cleaned sales table.
    pub fn initial(ds: &Dataset) -> Option<Self> {
        Some(Self {
            region: ds.sales_regions().into_iter().next()?,
            year: ds.sales_years().into_iter().next()?,
        })
    }
}

/// Metrics and charts of the interactive view.
///
/// Without a selection (no cleaned sales rows) the metrics are zero and the
/// charts empty.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveView {
    pub selection: Option<Selection>,
    pub metrics: KeyMetrics,
    pub trend: Vec<TrendSeries>,
    pub station_load: Vec<StationLoad>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyInsights {
    pub sales_vs_stations: Joined<RegionSalesVsStations>,
    pub station_waits: Vec<StationLoad>,
    pub mode_totals: Vec<ModeTotal>,
    pub adoption_vs_wait: AdoptionTrend,
    pub yearly_growth: Vec<YearlyTotal>,
}

/// Everything one view displays.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
    PowerBi { url: String },
    Interactive(InteractiveView),
    EdaSummary(EmbeddedReport),
    KeyInsights(Box<KeyInsights>),
}

impl ViewData {
    /// Recompute a view from the loaded tables.
    pub fn compute(
        view: View,
        ds: &Dataset,
        selection: Option<&Selection>,
        config: &DashboardConfig,
    ) -> Result<Self, ViewError> {
        debug!(?view, ?selection, "Computing view");

        let data = match view {
            View::PowerBiDashboard => ViewData::PowerBi {
                url: config.powerbi_url.clone(),
            },
            View::InteractiveVisuals => ViewData::Interactive(match selection {
                Some(selection) => InteractiveView {
                    metrics: Aggregator::key_metrics(ds, &selection.region, selection.year)?,
                    trend: Aggregator::sales_trend(ds, &selection.region)?,
                    station_load: Aggregator::station_load(ds, &selection.region)?,
                    selection: Some(selection.clone()),
                },
                None => InteractiveView {
                    selection: None,
                    metrics: KeyMetrics::default(),
                    trend: Vec::new(),
                    station_load: Vec::new(),
                },
            }),
            View::EdaSummary => {
                ViewData::EdaSummary(EmbeddedReport::load(&config.eda_report_path())?)
            }
            View::KeyInsights => ViewData::KeyInsights(Box::new(KeyInsights {
                sales_vs_stations: Aggregator::sales_vs_stations(ds)?,
                station_waits: Aggregator::station_waits(ds)?,
                mode_totals: Aggregator::mode_totals(ds)?,
                adoption_vs_wait: Aggregator::adoption_vs_wait(ds)?,
                yearly_growth: Aggregator::yearly_growth(ds)?,
            })),
        };

        Ok(data)
    }
}
