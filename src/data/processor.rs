//! Data Processor Module
//! Handles data cleaning (parameter filter, missing values, wait-time parsing)
//! and column extraction into plain Rust vectors.

use polars::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{info, warn};

use super::model::{columns, EV_SALES_PARAMETER};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Row counts recorded while cleaning, for operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub raw_sales_rows: usize,
    pub kept_sales_rows: usize,
    /// Rows whose parameter is not "EV Sales".
    pub other_parameter_rows: usize,
    /// "EV Sales" rows without a usable value.
    pub missing_value_rows: usize,
    /// Station rows whose wait time has no digits.
    pub unparsed_wait_times: usize,
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Keep only "EV Sales" rows with a present, non-NaN value.
    pub fn clean_sales(df: &DataFrame) -> Result<(DataFrame, CleaningReport), ProcessorError> {
        let raw_sales_rows = df.height();

        let ev_sales = df
            .clone()
            .lazy()
            .filter(col(columns::PARAMETER).eq(lit(EV_SALES_PARAMETER)))
            .collect()?;

        let values = ev_sales.column(columns::VALUE)?.cast(&DataType::Float64)?;
        let mask: BooleanChunked = values
            .f64()?
            .into_iter()
            .map(|v| v.is_some_and(|v| !v.is_nan()))
            .collect();
        let cleaned = ev_sales.filter(&mask)?;

        let report = CleaningReport {
            raw_sales_rows,
            kept_sales_rows: cleaned.height(),
            other_parameter_rows: raw_sales_rows - ev_sales.height(),
            missing_value_rows: ev_sales.height() - cleaned.height(),
            unparsed_wait_times: 0,
        };

        info!(
            raw = report.raw_sales_rows,
            kept = report.kept_sales_rows,
            other_parameter = report.other_parameter_rows,
            missing_value = report.missing_value_rows,
            "Cleaned sales table"
        );

        Ok((cleaned, report))
    }

    /// Append the `WaitMinutes` column parsed from `AvgWaitTime`.
    ///
    /// Returns the new frame and the number of rows that had no digits.
    pub fn with_wait_minutes(df: &DataFrame) -> Result<(DataFrame, usize), ProcessorError> {
        let texts = Self::str_values(df, columns::AVG_WAIT_TIME)?;
        let waits: Vec<Option<f64>> = texts
            .iter()
            .map(|text| text.as_deref().and_then(Self::parse_wait_minutes))
            .collect();
        let unparsed = waits.iter().filter(|w| w.is_none()).count();

        if unparsed > 0 {
            warn!(rows = unparsed, "Station wait times without a numeric value");
        }

        let mut out = df.clone();
        out.with_column(Column::new(columns::WAIT_MINUTES.into(), waits))?;
        Ok((out, unparsed))
    }

    /// Parse the first run of ASCII digits in a wait-time text.
    ///
    /// `"15 minutes"` gives 15.0, `"12.5 min"` gives 12.0, `"n/a"` gives `None`.
    /// Digits of other scripts are not recognised.
    pub fn parse_wait_minutes(text: &str) -> Option<f64> {
        let start = text.find(|c: char| c.is_ascii_digit())?;
        let digits: String = text[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse::<f64>().ok()
    }

    /// Extract a column as owned strings.
    pub fn str_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
        let column = df.column(name)?.cast(&DataType::String)?;
        let ca = column.str()?;
        Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
    }

    /// Extract a column as `f64` values.
    pub fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        let ca = column.f64()?;
        Ok(ca.into_iter().collect())
    }

    /// Extract a column as `i64` values.
    pub fn i64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
        let column = df.column(name)?.cast(&DataType::Int64)?;
        let ca = column.i64()?;
        Ok(ca.into_iter().collect())
    }

    /// Sorted unique non-null strings of a column.
    pub fn unique_strings(df: &DataFrame, name: &str) -> Vec<String> {
        Self::str_values(df, name)
            .map(|values| {
                values
                    .into_iter()
                    .flatten()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sorted unique years of a sales frame.
    pub fn unique_years(df: &DataFrame) -> Vec<i64> {
        Self::i64_values(df, columns::YEAR)
            .map(|values| {
                values
                    .into_iter()
                    .flatten()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_sales() -> DataFrame {
        df!(
            "region" => ["West", "West", "East", "East", "North"],
            "year" => [2022i64, 2022, 2021, 2023, 2020],
            "mode" => ["Cars", "Cars", "Buses", "Cars", "Cars"],
            "parameter" => ["EV Sales", "EV stock", "EV Sales", "EV Sales", "EV Sales"],
            "value" => [Some(100.0), Some(900.0), None, Some(40.0), Some(f64::NAN)]
        )
        .unwrap()
    }

    #[test]
    fn clean_sales_keeps_ev_sales_with_values() {
        let (cleaned, report) = DataProcessor::clean_sales(&raw_sales()).unwrap();

        assert_eq!(cleaned.height(), 2);
        assert_eq!(
            DataProcessor::str_values(&cleaned, "region").unwrap(),
            vec![Some("West".to_string()), Some("East".to_string())]
        );
        assert_eq!(report.raw_sales_rows, 5);
        assert_eq!(report.kept_sales_rows, 2);
        assert_eq!(report.other_parameter_rows, 1);
        assert_eq!(report.missing_value_rows, 2);
    }

    #[test]
    fn clean_sales_is_idempotent() {
        let (once, _) = DataProcessor::clean_sales(&raw_sales()).unwrap();
        let (twice, report) = DataProcessor::clean_sales(&once).unwrap();

        assert!(once.equals_missing(&twice));
        assert_eq!(report.other_parameter_rows, 0);
        assert_eq!(report.missing_value_rows, 0);
    }

    #[test]
    fn clean_sales_may_yield_empty_table() {
        let df = df!(
            "region" => ["West"],
            "year" => [2022i64],
            "mode" => ["Cars"],
            "parameter" => ["EV stock"],
            "value" => [10.0]
        )
        .unwrap();

        let (cleaned, report) = DataProcessor::clean_sales(&df).unwrap();
        assert_eq!(cleaned.height(), 0);
        assert_eq!(report.kept_sales_rows, 0);
    }

    #[test]
    fn parse_wait_minutes_takes_first_digit_run() {
        assert_eq!(DataProcessor::parse_wait_minutes("15 minutes"), Some(15.0));
        assert_eq!(DataProcessor::parse_wait_minutes("10 min"), Some(10.0));
        assert_eq!(DataProcessor::parse_wait_minutes("about 7-9 min"), Some(7.0));
        assert_eq!(DataProcessor::parse_wait_minutes("12.5 min"), Some(12.0));
        assert_eq!(DataProcessor::parse_wait_minutes("n/a"), None);
        assert_eq!(DataProcessor::parse_wait_minutes(""), None);
    }

    #[test]
    fn parse_wait_minutes_reads_ascii_digits_only() {
        assert_eq!(DataProcessor::parse_wait_minutes("١٥ min"), None);
        assert_eq!(DataProcessor::parse_wait_minutes("١٥ or 20 min"), Some(20.0));
        assert_eq!(DataProcessor::parse_wait_minutes("Ⅻ min"), None);
    }

    #[test]
    fn with_wait_minutes_adds_column_and_counts_misses() {
        let df = df!(
            "StationID" => ["S1", "S2", "S3"],
            "region" => ["West", "West", "East"],
            "AvgWaitTime" => [Some("10 min"), Some("unknown"), None],
            "TotalSessions" => [5i64, 7, 3]
        )
        .unwrap();

        let (out, unparsed) = DataProcessor::with_wait_minutes(&df).unwrap();

        assert_eq!(unparsed, 2);
        assert_eq!(
            DataProcessor::f64_values(&out, "WaitMinutes").unwrap(),
            vec![Some(10.0), None, None]
        );
        assert_eq!(
            DataProcessor::str_values(&out, "AvgWaitTime").unwrap()[0].as_deref(),
            Some("10 min")
        );
    }

    #[test]
    fn unique_values_are_sorted_and_deduplicated() {
        let (cleaned, _) = DataProcessor::clean_sales(&raw_sales()).unwrap();

        assert_eq!(
            DataProcessor::unique_strings(&cleaned, "region"),
            vec!["East".to_string(), "West".to_string()]
        );
        assert_eq!(DataProcessor::unique_years(&cleaned), vec![2022, 2023]);
    }
}
