//! CSV Data Loader Module
//! Loads the three dashboard tables with Polars and types their columns.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::model::{Dataset, TableKind};
use super::processor::ProcessorError;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file for {table} table not found: {}", .path.display())]
    MissingFile { table: &'static str, path: PathBuf },
    #[error("Failed to load {table} table from {}: {source}", .path.display())]
    CsvError {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Failed to clean data: {0}")]
    Processing(#[from] ProcessorError),
}

/// Locations of the three input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub sales: PathBuf,
    pub stations: PathBuf,
    pub regional: PathBuf,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load and clean all three tables. Any missing file is an error.
    pub fn load(paths: &DataPaths) -> Result<Dataset, LoaderError> {
        let sales = Self::load_table(&paths.sales, TableKind::Sales)?;
        let stations = Self::load_table(&paths.stations, TableKind::Stations)?;
        let regional = Self::load_table(&paths.regional, TableKind::Regional)?;

        Ok(Dataset::from_frames(sales, stations, regional)?)
    }

    /// Load a single CSV file, keeping only the table's known columns.
    pub fn load_table(path: &Path, kind: TableKind) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::MissingFile {
                table: kind.name(),
                path: path.to_path_buf(),
            });
        }

        let csv_error = |source: PolarsError| LoaderError::CsvError {
            table: kind.name(),
            path: path.to_path_buf(),
            source,
        };

        let typed: Vec<Expr> = kind
            .schema()
            .into_iter()
            .map(|(name, dtype)| col(name).cast(dtype))
            .collect();

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()
            .map_err(csv_error)?
            .select(typed)
            .collect()
            .map_err(csv_error)?;

        info!(
            table = kind.name(),
            path = %path.display(),
            rows = df.height(),
            "Loaded table"
        );

        Ok(df)
    }
}
