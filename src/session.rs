//! One scraping session: one station, one query, one driver.
//!
//! The session walks `Idle → CatalogLoaded → Filtered`, then for every
//! selected period `Fetching → Normalizing → Accumulating`, and ends in
//! `Finalized` once every period has been attempted. A failed period sends
//! the loop on to the next one; only a missing or empty catalog stops the
//! session early.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

use crate::catalog::PeriodCatalog;
use crate::config::Config;
use crate::driver::SessionDriver;
use crate::error::{Result, ScrapeError};
use crate::models::{
    HeaderSet, OptionOutcome, PeriodOption, QueryRequest, SessionReport, StationMeta,
};
use crate::parsers::{SelectLocator, TableNormalizer};
use crate::storage::{ConsolidatedBuffer, IndividualWriter, OutputAccumulator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    CatalogLoaded,
    Filtered,
    Fetching,
    Normalizing,
    Accumulating,
    Finalized,
}

#[derive(Debug)]
pub struct Session {
    label: String,
    request: QueryRequest,
    header_set: HeaderSet,
    normalizer: TableNormalizer,
    output_dir: PathBuf,
    locator: SelectLocator,
    state: SessionState,
}

impl Session {
    /// Output goes to `{csv_dir}/{label}/`.
    pub fn new(station: &StationMeta, request: QueryRequest, config: &Config) -> Self {
        let label = station.file_label();
        Self {
            output_dir: config.output.csv_dir.join(&label),
            label,
            request,
            header_set: station.header_set(),
            normalizer: TableNormalizer::new(
                config.output.separator.clone(),
                station.table_start_line(),
            ),
            locator: SelectLocator::Id(config.select_id.clone()),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Runs the whole session against `driver`. `cancel` is checked before
    /// each selection; once set, no further periods are requested but the
    /// consolidated buffer is still flushed.
    pub async fn run<D>(&mut self, driver: &mut D, cancel: &AtomicBool) -> Result<SessionReport>
    where
        D: SessionDriver + ?Sized,
    {
        let mut report = SessionReport::default();

        let select_html = driver.read_select_html().await?;
        let catalog = PeriodCatalog::from_select_html(&select_html, &self.locator)?;
        catalog.ensure_valid()?;
        self.transition(SessionState::CatalogLoaded);

        report.available_years = catalog.available_years();
        info!("Available years: {:?}", report.available_years);

        let options = catalog.filter(&self.request.mode);
        self.transition(SessionState::Filtered);

        if options.is_empty() {
            warn!("No period options match the requested {}", self.request.mode.kind());
            self.transition(SessionState::Finalized);
            return Ok(report);
        }

        info!("{} periods will be processed", options.len());
        let mut accumulator = self.accumulator()?;

        let total = options.len();
        for (index, option) in options.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                warn!(
                    "Cancelled, skipping remaining {} periods",
                    total - index
                );
                report.cancelled = true;
                report.outcomes.extend(
                    options[index..]
                        .iter()
                        .map(|skipped| OptionOutcome::failed(&skipped.value, &skipped.label, "cancelled")),
                );
                break;
            }

            info!("--- Processing {}/{} ---", index + 1, total);
            let outcome = self.process_option(driver, &mut accumulator, option).await;
            report.outcomes.push(outcome);
        }

        report.flush = accumulator.finish();
        self.transition(SessionState::Finalized);

        info!("Session completed: {} periods processed", report);
        Ok(report)
    }

    fn accumulator(&self) -> Result<OutputAccumulator> {
        if self.request.is_consolidated() {
            std::fs::create_dir_all(&self.output_dir)
                .map_err(|e| ScrapeError::io(&self.output_dir, e))?;
            let path = self
                .output_dir
                .join(self.request.suggested_filename(&self.label));
            Ok(OutputAccumulator::Consolidated {
                buffer: ConsolidatedBuffer::new(self.header_set.header_strings(), self.normalizer.separator()),
                path,
            })
        } else {
            let writer = IndividualWriter::new(
                &self.output_dir,
                &self.label,
                self.header_set.header_strings(),
                self.normalizer.separator(),
            )?;
            Ok(OutputAccumulator::Individual(writer))
        }
    }

    async fn process_option<D>(
        &mut self,
        driver: &mut D,
        accumulator: &mut OutputAccumulator,
        option: &PeriodOption,
    ) -> OptionOutcome
    where
        D: SessionDriver + ?Sized,
    {
        self.transition(SessionState::Fetching);
        info!("Processing option: {} ({})", option.label, option.value);

        let table_html = match driver.select_period(&option.value).await {
            Ok(html) => html,
            Err(e) => {
                error!("Error processing option {}: {}", option.value, e);
                return OptionOutcome::failed(&option.value, &option.label, e);
            }
        };

        self.transition(SessionState::Normalizing);
        let rows = self.normalizer.normalize_rows(&table_html);
        let mismatched = rows
            .iter()
            .filter(|row| !self.header_set.validate_row(row.cells()))
            .count();
        if mismatched > 0 {
            warn!(
                "{} rows of period {} do not have the expected {} columns",
                mismatched,
                option.value,
                self.header_set.column_count()
            );
        }
        let body = rows
            .iter()
            .map(|row| row.join(self.normalizer.separator()))
            .collect::<Vec<_>>()
            .join("\n");

        self.transition(SessionState::Accumulating);
        let outcome = accumulator.accept(option, &body);
        if outcome.success {
            info!("Option {} processed: {} rows", option.value, outcome.rows);
        }
        outcome
    }
}

/// Sets `cancel` on the first interrupt, then waits for another one.
/// Returns `true` once the second interrupt arrives, `false` if listening
/// fails.
pub async fn cancel_on_interrupt<F, Fut>(cancel: &AtomicBool, mut interrupt: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if interrupt().await.is_err() {
        return false;
    }
    warn!("Interrupt received, stopping after the current period (interrupt again to abort)");
    cancel.store(true, Ordering::SeqCst);

    interrupt().await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn second_interrupt_requests_abort() {
        let cancel = AtomicBool::new(false);
        let abort = cancel_on_interrupt(&cancel, || async { Ok(()) }).await;

        assert!(abort);
        assert!(cancel.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn first_interrupt_only_cancels() {
        let cancel = AtomicBool::new(false);
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let waiting = tokio::time::timeout(
            Duration::from_secs(60),
            cancel_on_interrupt(&cancel, || async move {
                if calls.fetch_add(1, Ordering::SeqCst) > 0 {
                    std::future::pending::<()>().await;
                }
                Ok(())
            }),
        )
        .await;

        assert!(waiting.is_err());
        assert!(cancel.load(Ordering::SeqCst));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_listener_leaves_session_running() {
        let cancel = AtomicBool::new(false);
        let abort = cancel_on_interrupt(&cancel, || async {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal handler"))
        })
        .await;

        assert!(!abort);
        assert!(!cancel.load(Ordering::SeqCst));
    }
}
