//! Dashboard Configuration
//! Input locations and window settings, read from `dashboard.json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::data::DataPaths;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "EV_DASHBOARD_CONFIG";
/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

const DEFAULT_POWERBI_URL: &str = "https://app.powerbi.com/reportEmbed?reportId=7fa44beb-d571-42e8-b736-87224273297e&autoAuth=true&ctid=23035d1f-133c-44b5-b2ad-b3aef17baaa1";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base directory for relative input paths.
    pub data_dir: Option<PathBuf>,
    pub sales_csv: PathBuf,
    pub stations_csv: PathBuf,
    pub regional_csv: PathBuf,
    pub eda_report: PathBuf,
    pub powerbi_url: String,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            sales_csv: PathBuf::from("clean_ev_sales.csv"),
            stations_csv: PathBuf::from("clean_station_usage.csv"),
            regional_csv: PathBuf::from("clean_regional_factors_1.csv"),
            eda_report: PathBuf::from("eda_output.html"),
            powerbi_url: DEFAULT_POWERBI_URL.to_string(),
            window: WindowConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 800.0,
            title: "Tesla EV Dashboard".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load from `$EV_DASHBOARD_CONFIG`, else `./dashboard.json`, else defaults.
    ///
    /// A file named by the environment variable must exist.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    info!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Resolve a configured path against `data_dir`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn data_paths(&self) -> DataPaths {
        DataPaths {
            sales: self.resolve(&self.sales_csv),
            stations: self.resolve(&self.stations_csv),
            regional: self.resolve(&self.regional_csv),
        }
    }

    pub fn eda_report_path(&self) -> PathBuf {
        self.resolve(&self.eda_report)
    }
}
