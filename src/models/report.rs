use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// What happened to one period option during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionOutcome {
    pub value: String,
    pub label: String,
    pub success: bool,
    pub rows: usize,
    pub file: Option<PathBuf>,
    pub error: Option<String>,
}

impl OptionOutcome {
    pub fn succeeded(value: &str, label: &str, rows: usize, file: Option<PathBuf>) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            success: true,
            rows,
            file,
            error: None,
        }
    }

    pub fn failed(value: &str, label: &str, error: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            success: false,
            rows: 0,
            file: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FlushOutcome {
    Saved { path: PathBuf, lines: usize },
    /// The buffer held no data rows; nothing was written.
    NoData,
    Failed { path: PathBuf, error: String },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionReport {
    pub available_years: Vec<i32>,
    pub outcomes: Vec<OptionOutcome>,
    pub flush: Option<FlushOutcome>,
    pub cancelled: bool,
}

impl SessionReport {
    pub fn processed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    /// Options selected by the filter, including those skipped on cancel.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn rows(&self) -> usize {
        self.outcomes.iter().map(|o| o.rows).sum()
    }

    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .outcomes
            .iter()
            .filter_map(|o| o.file.clone())
            .collect();
        if let Some(FlushOutcome::Saved { path, .. }) = &self.flush {
            files.push(path.clone());
        }
        files
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.processed(), self.total())
    }
}
