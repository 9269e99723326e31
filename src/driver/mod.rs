//! The session driver owns whatever renders the station map and exposes
//! the two reads the pipeline needs: the period dropdown and, after a
//! period is selected, the data table.

mod http;

pub use http::HttpDriver;

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, sleep, Instant};

use crate::error::Result;

/// The remote page has one selection state, so a driver is borrowed
/// mutably for a whole session and never shared.
#[async_trait]
pub trait SessionDriver: Send {
    /// HTML fragment containing the period `<select>`.
    async fn read_select_html(&mut self) -> Result<String>;

    /// Select `option_value` and return the HTML of the refreshed table.
    async fn select_period(&mut self, option_value: &str) -> Result<String>;
}

/// Run `probe` every `interval` until it yields a value or `timeout`
/// elapses. An attempt still running at the deadline is dropped.
pub async fn poll_until<T, F, Fut>(timeout: Duration, interval: Duration, mut probe: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match time::timeout(remaining, probe()).await {
            Ok(Some(found)) => return Some(found),
            Ok(None) => {}
            Err(_) => return None,
        }
        if Instant::now() >= deadline {
            return None;
        }
        sleep(interval.min(deadline.saturating_duration_since(Instant::now()))).await;
    }
}
