//! Monthly station records from the SENAMHI station map, turned into
//! per-station CSV files.
//!
//! The pipeline reads the period dropdown into a [`catalog::PeriodCatalog`],
//! filters it for the requested month, year or range of years, then fetches
//! each period's table through a [`driver::SessionDriver`], normalizes it with
//! [`parsers::TableNormalizer`] and hands the rows to a
//! [`storage::OutputAccumulator`]. [`session::Session`] ties the steps
//! together.

pub mod catalog;
pub mod config;
pub mod driver;
pub mod error;
pub mod models;
pub mod parsers;
pub mod registry;
pub mod session;
pub mod storage;
pub mod utils;

pub use error::{Result, ScrapeError};
