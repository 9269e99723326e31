//! The period dropdown as offered by the station map, and the filters that
//! turn a query into the ordered list of periods to fetch.

use std::collections::BTreeSet;
use tracing::info;

use crate::error::{Result, ScrapeError};
use crate::models::{PeriodOption, QueryMode};
use crate::parsers::{extract_select_options, SelectLocator};

#[derive(Debug, Clone, Default)]
pub struct PeriodCatalog {
    options: Vec<PeriodOption>,
}

impl PeriodCatalog {
    pub fn new(options: Vec<PeriodOption>) -> Self {
        Self { options }
    }

    pub fn from_select_html(html: &str, locator: &SelectLocator) -> Result<Self> {
        let options = extract_select_options(html, locator)?;
        info!("{} period options loaded", options.len());
        Ok(Self::new(options))
    }

    /// Every option, including the ones filters discard.
    pub fn options(&self) -> &[PeriodOption] {
        &self.options
    }

    /// Options whose value is exactly six digits, in catalog order.
    pub fn valid_options(&self) -> impl Iterator<Item = &PeriodOption> + '_ {
        self.options.iter().filter(|option| option.period().is_some())
    }

    pub fn ensure_valid(&self) -> Result<()> {
        if self.valid_options().next().is_none() {
            return Err(ScrapeError::EmptyCatalog);
        }
        Ok(())
    }

    pub fn filter_by_month(&self, year: i32, month: u32) -> Vec<PeriodOption> {
        let target = format!("{:04}{:02}", year, month);
        let filtered = self.collect(|option| option.value.trim() == target);
        info!(
            "Month filter {}/{:02}: {} options found",
            year,
            month,
            filtered.len()
        );
        filtered
    }

    pub fn filter_by_year(&self, year: i32) -> Vec<PeriodOption> {
        let filtered = self.collect(|option| option.period().map(|p| p.year) == Some(year));
        info!("Year filter {}: {} options found", year, filtered.len());
        filtered
    }

    /// Inclusive on both ends.
    pub fn filter_by_period(&self, start_year: i32, end_year: i32) -> Vec<PeriodOption> {
        let filtered = self.collect(|option| {
            option
                .period()
                .is_some_and(|p| (start_year..=end_year).contains(&p.year))
        });
        info!(
            "Period filter {}-{}: {} options found",
            start_year,
            end_year,
            filtered.len()
        );
        filtered
    }

    pub fn filter(&self, mode: &QueryMode) -> Vec<PeriodOption> {
        match *mode {
            QueryMode::Month { year, month } => self.filter_by_month(year, month),
            QueryMode::Year { year } => self.filter_by_year(year),
            QueryMode::Period {
                start_year,
                end_year,
            } => self.filter_by_period(start_year, end_year),
        }
    }

    /// Distinct years across valid options, ascending.
    pub fn available_years(&self) -> Vec<i32> {
        self.valid_options()
            .filter_map(|option| option.period())
            .map(|period| period.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn collect<F>(&self, predicate: F) -> Vec<PeriodOption>
    where
        F: Fn(&PeriodOption) -> bool,
    {
        self.valid_options()
            .filter(|option| predicate(option))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog(values: &[&str]) -> PeriodCatalog {
        PeriodCatalog::new(values.iter().map(|v| PeriodOption::new(*v, *v)).collect())
    }

    fn values(options: &[PeriodOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn year_filter_skips_invalid_values() {
        let catalog = catalog(&["202401", "202402", "202403", "", "bad"]);
        assert_eq!(
            values(&catalog.filter_by_year(2024)),
            vec!["202401", "202402", "202403"]
        );
        assert_eq!(catalog.available_years(), vec![2024]);
    }

    #[test]
    fn month_filter_matches_exact_value() {
        let catalog = catalog(&["202312", "202401", "2024011", "202410"]);
        assert_eq!(values(&catalog.filter_by_month(2024, 1)), vec!["202401"]);
        assert!(catalog.filter_by_month(2024, 2).is_empty());
    }

    #[test]
    fn period_filter_is_union_of_years_in_catalog_order() {
        let catalog = catalog(&["202502", "202501", "202312", "202201", "202412", "2021xx"]);
        let period = catalog.filter_by_period(2023, 2025);
        assert_eq!(values(&period), vec!["202502", "202501", "202312", "202412"]);

        let mut union: Vec<String> = (2023..=2025)
            .flat_map(|year| catalog.filter_by_year(year))
            .map(|o| o.value)
            .collect();
        let mut expected: Vec<String> = period.into_iter().map(|o| o.value).collect();
        union.sort();
        expected.sort();
        assert_eq!(union, expected);

        assert_eq!(catalog.available_years(), vec![2022, 2023, 2024, 2025]);
    }

    #[test]
    fn empty_catalog_is_detected() {
        assert!(matches!(
            catalog(&["", "bad", "2024"]).ensure_valid(),
            Err(ScrapeError::EmptyCatalog)
        ));
        assert!(catalog(&["202401"]).ensure_valid().is_ok());
    }

    #[test]
    fn filter_dispatches_on_mode() {
        let catalog = catalog(&["202312", "202401", "202402"]);
        assert_eq!(
            values(&catalog.filter(&QueryMode::Year { year: 2024 })),
            vec!["202401", "202402"]
        );
        assert_eq!(
            values(&catalog.filter(&QueryMode::Month {
                year: 2023,
                month: 12
            })),
            vec!["202312"]
        );
    }
}
