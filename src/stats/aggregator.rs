//! View Aggregator Module
//! Group-by, sum, mean and inner-join computations behind every chart.
//!
//! All functions read from an immutable `Dataset` and return plain rows for
//! the presentation layer. Grouped outputs are sorted by their keys.

use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, info};

use super::regression::OlsFit;
use crate::data::columns::*;
use crate::data::{DataProcessor, Dataset};

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Headline numbers for one region and year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMetrics {
    pub total_sales: f64,
    /// Undefined when the region has no station with a parsed wait time.
    pub avg_wait_minutes: Option<f64>,
    pub total_sessions: i64,
}

/// Sales of one mode over the years, one point per row.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub mode: String,
    pub points: Vec<(i64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationLoad {
    pub station_id: String,
    pub region: String,
    pub total_sessions: i64,
    pub wait_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSalesVsStations {
    pub region: String,
    pub ev_sales: f64,
    pub existing_stations: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModeTotal {
    pub region: String,
    pub mode: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdoptionVsWait {
    pub region: String,
    pub adoption_rate: f64,
    pub avg_wait_minutes: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearlyTotal {
    pub region: String,
    pub year: i64,
    pub value: f64,
}

/// Join keys found on one side of an inner join only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinDiagnostics {
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
}

impl JoinDiagnostics {
    pub fn between(left: &BTreeSet<String>, right: &BTreeSet<String>) -> Self {
        Self {
            left_only: left.difference(right).cloned().collect(),
            right_only: right.difference(left).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty()
    }

    pub fn excluded_count(&self) -> usize {
        self.left_only.len() + self.right_only.len()
    }

    fn log(&self, view: &str) {
        if !self.is_empty() {
            info!(
                view,
                excluded = self.excluded_count(),
                left_only = ?self.left_only,
                right_only = ?self.right_only,
                "Inner join excluded unmatched regions"
            );
        }
    }
}

/// Rows of an inner join plus the keys it dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<T> {
    pub rows: Vec<T>,
    pub diagnostics: JoinDiagnostics,
}

/// Adoption-vs-wait points with their trend line.
#[derive(Debug, Clone, PartialEq)]
pub struct AdoptionTrend {
    pub joined: Joined<AdoptionVsWait>,
    pub fit: Option<OlsFit>,
}

/// Computes the per-view aggregations.
pub struct Aggregator;

impl Aggregator {
    /// Sales for (region, year), plus wait time and sessions for the region.
    pub fn key_metrics(
        ds: &Dataset,
        region: &str,
        year: i64,
    ) -> Result<KeyMetrics, AggregateError> {
        debug!(region, year, "Computing key metrics");

        let sales = ds
            .sales()
            .clone()
            .lazy()
            .filter(col(REGION).eq(lit(region)).and(col(YEAR).eq(lit(year))))
            .select([col(VALUE).sum()])
            .collect()?;

        let stations = ds
            .stations()
            .clone()
            .lazy()
            .filter(col(REGION).eq(lit(region)))
            .select([col(WAIT_MINUTES).mean(), col(TOTAL_SESSIONS).sum()])
            .collect()?;

        Ok(KeyMetrics {
            total_sales: Self::first_f64(&sales, VALUE)?.unwrap_or(0.0),
            avg_wait_minutes: Self::first_f64(&stations, WAIT_MINUTES)?,
            total_sessions: Self::first_i64(&stations, TOTAL_SESSIONS)?.unwrap_or(0),
        })
    }

    /// Sales rows of a region split by mode, ordered by year.
    pub fn sales_trend(ds: &Dataset, region: &str) -> Result<Vec<TrendSeries>, AggregateError> {
        let df = ds
            .sales()
            .clone()
            .lazy()
            .filter(col(REGION).eq(lit(region)))
            .sort([YEAR], SortMultipleOptions::default().with_maintain_order(true))
            .collect()?;

        let modes = DataProcessor::str_values(&df, MODE)?;
        let years = DataProcessor::i64_values(&df, YEAR)?;
        let values = DataProcessor::f64_values(&df, VALUE)?;

        let mut by_mode: BTreeMap<String, Vec<(i64, f64)>> = BTreeMap::new();
        for ((mode, year), value) in modes.into_iter().zip(years).zip(values) {
            if let (Some(mode), Some(year), Some(value)) = (mode, year, value) {
                by_mode.entry(mode).or_default().push((year, value));
            }
        }

        Ok(by_mode
            .into_iter()
            .map(|(mode, points)| TrendSeries { mode, points })
            .collect())
    }

    /// Stations of one region, in file order.
    pub fn station_load(ds: &Dataset, region: &str) -> Result<Vec<StationLoad>, AggregateError> {
        let df = ds
            .stations()
            .clone()
            .lazy()
            .filter(col(REGION).eq(lit(region)))
            .collect()?;
        Self::station_rows(&df)
    }

    /// Every station with its sessions and wait time.
    pub fn station_waits(ds: &Dataset) -> Result<Vec<StationLoad>, AggregateError> {
        Self::station_rows(ds.stations())
    }

    /// Total sales per region joined with the existing station count.
    pub fn sales_vs_stations(
        ds: &Dataset,
    ) -> Result<Joined<RegionSalesVsStations>, AggregateError> {
        let stations = ds
            .regional()
            .clone()
            .lazy()
            .select([col(REGION), col(EXISTING_STATIONS)]);

        let df = Self::group_sum(ds.sales(), [REGION])
            .inner_join(stations, col(REGION), col(REGION))
            .sort([REGION], SortMultipleOptions::default())
            .collect()?;

        let regions = DataProcessor::str_values(&df, REGION)?;
        let sales = DataProcessor::f64_values(&df, VALUE)?;
        let counts = DataProcessor::i64_values(&df, EXISTING_STATIONS)?;

        let rows = regions
            .into_iter()
            .zip(sales)
            .zip(counts)
            .filter_map(|((region, ev_sales), existing_stations)| {
                Some(RegionSalesVsStations {
                    region: region?,
                    ev_sales: ev_sales?,
                    existing_stations: existing_stations?,
                })
            })
            .collect();

        let diagnostics = JoinDiagnostics::between(
            &Self::region_keys(ds.sales()),
            &Self::region_keys(ds.regional()),
        );
        diagnostics.log("sales_vs_stations");

        Ok(Joined { rows, diagnostics })
    }

    /// Total sales per (region, mode).
    pub fn mode_totals(ds: &Dataset) -> Result<Vec<ModeTotal>, AggregateError> {
        let df = Self::group_sum(ds.sales(), [REGION, MODE]).collect()?;

        let regions = DataProcessor::str_values(&df, REGION)?;
        let modes = DataProcessor::str_values(&df, MODE)?;
        let values = DataProcessor::f64_values(&df, VALUE)?;

        Ok(regions
            .into_iter()
            .zip(modes)
            .zip(values)
            .filter_map(|((region, mode), value)| {
                Some(ModeTotal {
                    region: region?,
                    mode: mode?,
                    value: value?,
                })
            })
            .collect())
    }

    /// Mean wait per region joined with the adoption rate, with an OLS fit.
    ///
    /// Regions whose mean wait is undefined stay in the join but are neither
    /// returned nor fitted.
    pub fn adoption_vs_wait(ds: &Dataset) -> Result<AdoptionTrend, AggregateError> {
        let adoption = ds
            .regional()
            .clone()
            .lazy()
            .select([col(REGION), col(ADOPTION_RATE)]);

        let df = ds
            .stations()
            .clone()
            .lazy()
            .group_by([col(REGION)])
            .agg([col(WAIT_MINUTES).mean()])
            .inner_join(adoption, col(REGION), col(REGION))
            .sort([REGION], SortMultipleOptions::default())
            .collect()?;

        let regions = DataProcessor::str_values(&df, REGION)?;
        let rates = DataProcessor::f64_values(&df, ADOPTION_RATE)?;
        let waits = DataProcessor::f64_values(&df, WAIT_MINUTES)?;

        let rows: Vec<AdoptionVsWait> = regions
            .into_iter()
            .zip(rates)
            .zip(waits)
            .filter_map(|((region, adoption_rate), avg_wait_minutes)| {
                Some(AdoptionVsWait {
                    region: region?,
                    adoption_rate: adoption_rate?,
                    avg_wait_minutes: avg_wait_minutes?,
                })
            })
            .collect();

        let points: Vec<(f64, f64)> = rows
            .iter()
            .map(|r| (r.adoption_rate, r.avg_wait_minutes))
            .collect();
        let fit = OlsFit::fit(&points);

        let diagnostics = JoinDiagnostics::between(
            &Self::region_keys(ds.stations()),
            &Self::region_keys(ds.regional()),
        );
        diagnostics.log("adoption_vs_wait");

        Ok(AdoptionTrend {
            joined: Joined { rows, diagnostics },
            fit,
        })
    }

    /// Total sales per (region, year).
    pub fn yearly_growth(ds: &Dataset) -> Result<Vec<YearlyTotal>, AggregateError> {
        let df = Self::group_sum(ds.sales(), [REGION, YEAR]).collect()?;

        let regions = DataProcessor::str_values(&df, REGION)?;
        let years = DataProcessor::i64_values(&df, YEAR)?;
        let values = DataProcessor::f64_values(&df, VALUE)?;

        Ok(regions
            .into_iter()
            .zip(years)
            .zip(values)
            .filter_map(|((region, year), value)| {
                Some(YearlyTotal {
                    region: region?,
                    year: year?,
                    value: value?,
                })
            })
            .collect())
    }

    /// Sum of sales `value` grouped by `keys`, sorted by `keys`.
    fn group_sum<const N: usize>(df: &DataFrame, keys: [&str; N]) -> LazyFrame {
        let by: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
        df.clone()
            .lazy()
            .group_by(by)
            .agg([col(VALUE).sum()])
            .sort(keys, SortMultipleOptions::default())
    }

    fn station_rows(df: &DataFrame) -> Result<Vec<StationLoad>, AggregateError> {
        let ids = DataProcessor::str_values(df, STATION_ID)?;
        let regions = DataProcessor::str_values(df, REGION)?;
        let sessions = DataProcessor::i64_values(df, TOTAL_SESSIONS)?;
        let waits = DataProcessor::f64_values(df, WAIT_MINUTES)?;

        Ok(ids
            .into_iter()
            .zip(regions)
            .zip(sessions)
            .zip(waits)
            .filter_map(|(((id, region), sessions), wait_minutes)| {
                Some(StationLoad {
                    station_id: id?,
                    region: region?,
                    total_sessions: sessions.unwrap_or(0),
                    wait_minutes,
                })
            })
            .collect())
    }

    fn region_keys(df: &DataFrame) -> BTreeSet<String> {
        DataProcessor::unique_strings(df, REGION).into_iter().collect()
    }

    fn first_f64(df: &DataFrame, name: &str) -> PolarsResult<Option<f64>> {
        Ok(DataProcessor::f64_values(df, name)?.into_iter().next().flatten())
    }

    fn first_i64(df: &DataFrame, name: &str) -> PolarsResult<Option<i64>> {
        Ok(DataProcessor::i64_values(df, name)?.into_iter().next().flatten())
    }
}
