use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ScrapeError};

/// Earliest year the station map publishes.
pub const MIN_YEAR: i32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryModeKind {
    Month,
    Year,
    Period,
}

impl fmt::Display for QueryModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryModeKind::Month => write!(f, "MONTH"),
            QueryModeKind::Year => write!(f, "YEAR"),
            QueryModeKind::Period => write!(f, "PERIOD"),
        }
    }
}

/// Query fields as entered, before they are checked against the mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub mode: QueryModeKind,
    pub start_year: i32,
    pub month: Option<u32>,
    pub end_year: Option<i32>,
    pub consolidated: bool,
    pub output_filename: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Month { year: i32, month: u32 },
    Year { year: i32 },
    Period { start_year: i32, end_year: i32 },
}

impl QueryMode {
    pub fn kind(&self) -> QueryModeKind {
        match self {
            QueryMode::Month { .. } => QueryModeKind::Month,
            QueryMode::Year { .. } => QueryModeKind::Year,
            QueryMode::Period { .. } => QueryModeKind::Period,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub mode: QueryMode,
    consolidated: bool,
    pub output_filename: Option<String>,
}

impl QueryRequest {
    /// Checks the parameters against the current calendar year.
    pub fn from_params(params: QueryParams) -> Result<Self> {
        Self::from_params_until(params, chrono::Local::now().year())
    }

    pub fn from_params_until(params: QueryParams, max_year: i32) -> Result<Self> {
        let invalid = |msg: String| Err(ScrapeError::Validation(msg));

        check_year(params.start_year, max_year)?;

        let mode = match params.mode {
            QueryModeKind::Month => {
                if params.end_year.is_some() {
                    return invalid("a month query must not carry an end year".to_string());
                }
                let Some(month) = params.month else {
                    return invalid("a month query requires a month".to_string());
                };
                if !(1..=12).contains(&month) {
                    return invalid(format!("month {} is outside 1-12", month));
                }
                QueryMode::Month {
                    year: params.start_year,
                    month,
                }
            }
            QueryModeKind::Year => {
                if params.month.is_some() {
                    return invalid("a year query must not carry a month".to_string());
                }
                if params.end_year.is_some() {
                    return invalid("a year query must not carry an end year".to_string());
                }
                QueryMode::Year {
                    year: params.start_year,
                }
            }
            QueryModeKind::Period => {
                if params.month.is_some() {
                    return invalid("a period query must not carry a month".to_string());
                }
                let Some(end_year) = params.end_year else {
                    return invalid("a period query requires an end year".to_string());
                };
                check_year(end_year, max_year)?;
                if params.start_year > end_year {
                    return invalid(format!(
                        "start year {} is after end year {}",
                        params.start_year, end_year
                    ));
                }
                QueryMode::Period {
                    start_year: params.start_year,
                    end_year,
                }
            }
        };

        let output_filename = params
            .output_filename
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Ok(QueryRequest {
            mode,
            consolidated: params.consolidated,
            output_filename,
        })
    }

    /// Month queries always produce a single individual file.
    pub fn is_consolidated(&self) -> bool {
        self.consolidated && !matches!(self.mode, QueryMode::Month { .. })
    }

    pub fn suggested_filename(&self, label: &str) -> String {
        if let Some(name) = &self.output_filename {
            return name.clone();
        }
        match self.mode {
            QueryMode::Month { year, month } => format!("{}-{:04}{:02}.csv", label, year, month),
            QueryMode::Year { year } => format!("{}-{}.csv", label, year),
            QueryMode::Period {
                start_year,
                end_year,
            } => format!("{}-{}-{}.csv", label, start_year, end_year),
        }
    }
}

fn check_year(year: i32, max_year: i32) -> Result<()> {
    if year < MIN_YEAR || year > max_year {
        return Err(ScrapeError::Validation(format!(
            "year {} is outside {}-{}",
            year, MIN_YEAR, max_year
        )));
    }
    Ok(())
}
