use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::error::ScrapeError;
use crate::models::{FlushOutcome, OptionOutcome, PeriodOption};

/// In-memory lines for one consolidated file. The header line goes in once,
/// just before the first data lines.
#[derive(Debug, Clone)]
pub struct ConsolidatedBuffer {
    headers: Vec<String>,
    separator: String,
    lines: Vec<String>,
    has_header: bool,
}

impl ConsolidatedBuffer {
    pub fn new(headers: Vec<String>, separator: impl Into<String>) -> Self {
        Self {
            headers,
            separator: separator.into(),
            lines: Vec::new(),
            has_header: false,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn data_lines(&self) -> usize {
        self.lines.len() - usize::from(self.has_header)
    }

    /// Appends the non-empty lines of a normalized CSV `body` as they are.
    pub fn add_csv(&mut self, option: &PeriodOption, body: &str) -> OptionOutcome {
        let new_lines: Vec<String> = body
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        if new_lines.is_empty() {
            warn!("Table for period {} contributed no rows", option.value);
            return OptionOutcome::succeeded(&option.value, &option.label, 0, None);
        }

        if self.lines.is_empty() && !self.headers.is_empty() {
            self.lines.push(self.headers.join(self.separator.as_str()));
            self.has_header = true;
        }

        let rows = new_lines.len();
        self.lines.extend(new_lines);
        info!("Buffered {} rows for period {}", rows, option.value);
        OptionOutcome::succeeded(&option.value, &option.label, rows, None)
    }

    /// Writes the buffer as one file, or reports `NoData` without touching
    /// the filesystem.
    pub fn flush(self, path: &Path) -> FlushOutcome {
        if self.data_lines() == 0 {
            warn!("No data in buffer, consolidated file not saved");
            return FlushOutcome::NoData;
        }

        let lines = self.lines.len();
        if let Err(e) = fs::write(path, self.lines.join("\n")) {
            let err = ScrapeError::io(path, e);
            error!("Failed to save consolidated file: {}", err);
            return FlushOutcome::Failed {
                path: path.to_path_buf(),
                error: err.to_string(),
            };
        }

        info!(
            "Consolidated file saved: {} ({} lines)",
            path.display(),
            lines
        );
        FlushOutcome::Saved {
            path: path.to_path_buf(),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer() -> ConsolidatedBuffer {
        ConsolidatedBuffer::new(
            vec!["Año".into(), "Mes".into(), "Día".into(), "Valor".into()],
            ";",
        )
    }

    #[test]
    fn header_added_once_before_first_rows() {
        let mut buffer = buffer();

        let empty = buffer.add_csv(&PeriodOption::new("202312", ""), "");
        assert!(empty.success);
        assert!(buffer.lines().is_empty());

        buffer.add_csv(&PeriodOption::new("202401", ""), "2024;01;01;1");
        buffer.add_csv(&PeriodOption::new("202402", ""), "2024;02;01;2\n\n2024;02;02;3");

        assert_eq!(
            buffer.lines(),
            &["Año;Mes;Día;Valor", "2024;01;01;1", "2024;02;01;2", "2024;02;02;3"]
        );
        assert_eq!(buffer.data_lines(), 3);
    }

    #[test]
    fn empty_buffer_flush_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.csv");

        assert_eq!(buffer().flush(&path), FlushOutcome::NoData);
        assert!(!path.exists());
    }

    #[test]
    fn flush_joins_lines_with_newline() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let mut buffer = buffer();
        buffer.add_csv(&PeriodOption::new("202401", ""), "2024;01;01;1");

        let outcome = buffer.flush(&path);
        assert_eq!(
            outcome,
            FlushOutcome::Saved {
                path: path.clone(),
                lines: 2
            }
        );
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Año;Mes;Día;Valor\n2024;01;01;1"
        );
    }

    #[test]
    fn flush_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let mut buffer = buffer();
        buffer.add_csv(&PeriodOption::new("202401", ""), "2024;01;01;1");

        let outcome = buffer.flush(tmp.path());
        assert!(matches!(outcome, FlushOutcome::Failed { .. }));
    }
}
