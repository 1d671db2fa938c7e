//! Data module - CSV loading and cleaning

mod loader;
mod model;
mod processor;

pub use loader::{DataLoader, DataPaths, LoaderError};
pub use model::{columns, Dataset, TableKind, EV_SALES_PARAMETER};
pub use processor::{CleaningReport, DataProcessor, ProcessorError};

#[cfg(test)]
pub(crate) use model::fixtures;
