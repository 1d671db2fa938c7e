//! Stats module - View aggregations and trend fitting

mod aggregator;
mod regression;

pub use aggregator::{
    AdoptionTrend, AdoptionVsWait, AggregateError, Aggregator, JoinDiagnostics, Joined,
    KeyMetrics, ModeTotal, RegionSalesVsStations, StationLoad, TrendSeries, YearlyTotal,
};
pub use regression::OlsFit;
