use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::error::{Result, ScrapeError};
use crate::models::{OptionOutcome, PeriodOption};

/// Writes one `{label}-{YYYYMM}.csv` per period.
#[derive(Debug, Clone)]
pub struct IndividualWriter {
    dir: PathBuf,
    label: String,
    headers: Vec<String>,
    separator: String,
}

impl IndividualWriter {
    pub fn new(
        dir: impl Into<PathBuf>,
        label: impl Into<String>,
        headers: Vec<String>,
        separator: impl Into<String>,
    ) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ScrapeError::io(&dir, e))?;
        Ok(Self {
            dir,
            label: label.into(),
            headers,
            separator: separator.into(),
        })
    }

    pub fn file_path(&self, option_value: &str) -> PathBuf {
        self.dir.join(format!("{}-{}.csv", self.label, option_value))
    }

    /// Header line, newline, then the normalized CSV `body`.
    pub fn write_csv(&self, option: &PeriodOption, body: &str) -> OptionOutcome {
        if body.trim().is_empty() {
            warn!("Table for period {} has no rows, no file written", option.value);
            return OptionOutcome::succeeded(&option.value, &option.label, 0, None);
        }

        let rows = body.lines().filter(|line| !line.trim().is_empty()).count();
        let path = self.file_path(&option.value);
        let contents = format!("{}\n{}", self.headers.join(self.separator.as_str()), body);

        match fs::write(&path, contents) {
            Ok(()) => {
                info!("Individual file saved: {} ({} rows)", path.display(), rows);
                OptionOutcome::succeeded(&option.value, &option.label, rows, Some(path))
            }
            Err(e) => {
                let err = ScrapeError::io(&path, e);
                error!("Failed to save individual file: {}", err);
                OptionOutcome::failed(&option.value, &option.label, err)
            }
        }
    }
}
