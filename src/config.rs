use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, ScrapeError};

const DEFAULT_CONFIG_NAME: &str = "senamhi";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub station_url: String,
    pub data_url: String,
    pub select_id: String,
    pub table_id: String,
    pub stations_file: PathBuf,
    pub user_agent: String,
    pub output: OutputConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub csv_dir: PathBuf,
    pub separator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    pub request_timeout_secs: u64,
    pub element_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub max_retries: u32,
}

impl TimingConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Config {
    /// Defaults, then `senamhi.toml` if present, then `SENAMHI__*` variables.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Same layering, but an explicit file replaces the optional default one
    /// and must exist.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config: Config = config::Config::builder()
            .set_default(
                "station_url",
                "https://www.senamhi.gob.pe/mapas/mapa-estaciones-2/map_red_graf.php",
            )?
            .set_default(
                "data_url",
                "https://www.senamhi.gob.pe/mapas/mapa-estaciones-2/_dt_est_tp_0s3n@mH1.php",
            )?
            .set_default("select_id", "CBOFiltro")?
            .set_default("table_id", "dataTable")?
            .set_default("stations_file", "data/estaciones.json")?
            .set_default(
                "user_agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
            )?
            .set_default("output.csv_dir", "output/csv")?
            .set_default("output.separator", ";")?
            .set_default("timing.request_timeout_secs", 30_i64)?
            .set_default("timing.element_timeout_secs", 10_i64)?
            .set_default("timing.poll_interval_ms", 500_i64)?
            .set_default("timing.settle_delay_ms", 2000_i64)?
            .set_default("timing.max_retries", 3_i64)?
            .add_source(file)
            .add_source(config::Environment::with_prefix("SENAMHI").separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.output.separator.is_empty() {
            return Err(ScrapeError::Config(
                "output.separator must not be empty".to_string(),
            ));
        }
        if self.timing.poll_interval_ms == 0 {
            return Err(ScrapeError::Config(
                "timing.poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.timing.max_retries == 0 {
            return Err(ScrapeError::Config(
                "timing.max_retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
