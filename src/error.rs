use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// An expected element (select, table, station) is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// A request or a cell did not have the expected shape.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The driver could not produce a table for one period.
    #[error("fetch failed for period {period}: {reason}")]
    TransientFetch { period: String, reason: String },

    #[error("the period catalog has no valid YYYYMM options")]
    EmptyCatalog,

    #[error("station catalog error: {0}")]
    Catalog(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn fetch(period: impl Into<String>, reason: impl ToString) -> Self {
        ScrapeError::TransientFetch {
            period: period.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<config::ConfigError> for ScrapeError {
    fn from(err: config::ConfigError) -> Self {
        ScrapeError::Config(err.to_string())
    }
}
