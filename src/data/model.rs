//! Table Model
//! Column names shared by the loader, cleaner and aggregator, plus the
//! immutable `Dataset` every view is computed from.

use polars::prelude::*;

use super::processor::{CleaningReport, DataProcessor, ProcessorError};

/// Column names of the three input tables.
pub mod columns {
    pub const REGION: &str = "region";
    pub const YEAR: &str = "year";
    pub const MODE: &str = "mode";
    pub const PARAMETER: &str = "parameter";
    pub const VALUE: &str = "value";

    pub const STATION_ID: &str = "StationID";
    pub const AVG_WAIT_TIME: &str = "AvgWaitTime";
    pub const TOTAL_SESSIONS: &str = "TotalSessions";
    /// Derived by the cleaner from `AvgWaitTime`.
    pub const WAIT_MINUTES: &str = "WaitMinutes";

    pub const EXISTING_STATIONS: &str = "ExistingStations";
    pub const ADOPTION_RATE: &str = "EV_AdoptionRate";
}

/// Parameter category retained in the sales table.
pub const EV_SALES_PARAMETER: &str = "EV Sales";

/// Which of the three input tables a frame holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Sales,
    Stations,
    Regional,
}

impl TableKind {
    pub fn name(self) -> &'static str {
        match self {
            TableKind::Sales => "EV sales",
            TableKind::Stations => "station usage",
            TableKind::Regional => "regional factors",
        }
    }

    /// Columns kept after loading, with their target types.
    pub fn schema(self) -> Vec<(&'static str, DataType)> {
        use columns::*;
        match self {
            TableKind::Sales => vec![
                (REGION, DataType::String),
                (YEAR, DataType::Int64),
                (MODE, DataType::String),
                (PARAMETER, DataType::String),
                (VALUE, DataType::Float64),
            ],
            TableKind::Stations => vec![
                (STATION_ID, DataType::String),
                (REGION, DataType::String),
                (AVG_WAIT_TIME, DataType::String),
                (TOTAL_SESSIONS, DataType::Int64),
            ],
            TableKind::Regional => vec![
                (REGION, DataType::String),
                (EXISTING_STATIONS, DataType::Int64),
                (ADOPTION_RATE, DataType::Float64),
            ],
        }
    }
}

/// The three cleaned tables. Read-only once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    sales: DataFrame,
    stations: DataFrame,
    regional: DataFrame,
    report: CleaningReport,
}

impl Dataset {
    /// Clean raw (typed) frames into a dataset.
    pub fn from_frames(
        raw_sales: DataFrame,
        raw_stations: DataFrame,
        regional: DataFrame,
    ) -> Result<Self, ProcessorError> {
        let (sales, sales_report) = DataProcessor::clean_sales(&raw_sales)?;
        let (stations, unparsed_wait_times) = DataProcessor::with_wait_minutes(&raw_stations)?;

        let report = CleaningReport {
            unparsed_wait_times,
            ..sales_report
        };

        Ok(Self {
            sales,
            stations,
            regional,
            report,
        })
    }

    pub fn sales(&self) -> &DataFrame {
        &self.sales
    }

    pub fn stations(&self) -> &DataFrame {
        &self.stations
    }

    pub fn regional(&self) -> &DataFrame {
        &self.regional
    }

    pub fn report(&self) -> &CleaningReport {
        &self.report
    }

    /// Sorted unique regions of the cleaned sales table.
    pub fn sales_regions(&self) -> Vec<String> {
        DataProcessor::unique_strings(&self.sales, columns::REGION)
    }

    /// Sorted unique years of the cleaned sales table.
    pub fn sales_years(&self) -> Vec<i64> {
        DataProcessor::unique_years(&self.sales)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Small dataset covering joins with regions on one side only.
    ///
    /// Sales regions: West, East, X. Station regions: West, East, South.
    /// Regional regions: West, East, South, North.
    pub(crate) fn sample_dataset() -> Dataset {
        let sales = df!(
            "region" => ["West", "West", "West", "East", "X", "West"],
            "year" => [2022i64, 2023, 2022, 2022, 2021, 2022],
            "mode" => ["Cars", "Cars", "Buses", "Cars", "Cars", "Cars"],
            "parameter" => ["EV Sales", "EV Sales", "EV Sales", "EV Sales", "EV Sales", "EV stock"],
            "value" => [100.0, 150.0, 20.0, 60.0, 70.0, 999.0]
        )
        .unwrap();

        let stations = df!(
            "StationID" => ["S1", "S2", "S3", "S4"],
            "region" => ["West", "West", "East", "South"],
            "AvgWaitTime" => ["10 min", "20 minutes", "n/a", "30 min"],
            "TotalSessions" => [5i64, 7, 4, 2]
        )
        .unwrap();

        let regional = df!(
            "region" => ["West", "East", "South", "North"],
            "ExistingStations" => [12i64, 4, 6, 3],
            "EV_AdoptionRate" => [0.30, 0.10, 0.20, 0.05]
        )
        .unwrap();

        Dataset::from_frames(sales, stations, regional).unwrap()
    }
}
