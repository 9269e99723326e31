use async_trait::async_trait;
use reqwest::Client;
use tokio::time::{self, sleep, Instant};
use tracing::{debug, info, warn};
use url::Url;

use super::{poll_until, SessionDriver};
use crate::config::{Config, TimingConfig};
use crate::error::{Result, ScrapeError};
use crate::models::StationMeta;
use crate::parsers::{find_element_html, first_element_html};
use crate::utils::http::{create_client, fetch_text_with_retry, RetryPolicy};

/// Drives the station map over plain HTTP: the station page carries the
/// period dropdown and the table endpoint answers one period per request.
pub struct HttpDriver {
    client: Client,
    station_url: Url,
    data_url: Url,
    station: StationMeta,
    select_id: String,
    table_id: String,
    timing: TimingConfig,
    retry: RetryPolicy,
}

impl HttpDriver {
    pub fn new(config: &Config, station: &StationMeta) -> Result<Self> {
        let client = create_client(config).map_err(|e| ScrapeError::Config(format!("{:#}", e)))?;
        Self::with_client(client, config, station)
    }

    pub fn with_client(client: Client, config: &Config, station: &StationMeta) -> Result<Self> {
        let legacy_code = station.legacy_code.as_deref().unwrap_or_default();
        let station_url = Url::parse_with_params(
            &config.station_url,
            &[
                ("cod", station.code.as_str()),
                ("estado", station.status.key()),
                ("tipo_esta", station.station_type.key()),
                ("cate", station.category.key()),
                ("cod_old", legacy_code),
            ],
        )
        .map_err(|e| ScrapeError::Config(format!("invalid station_url: {}", e)))?;

        let data_url = Url::parse(&config.data_url)
            .map_err(|e| ScrapeError::Config(format!("invalid data_url: {}", e)))?;

        Ok(Self {
            client,
            station_url,
            data_url,
            station: station.clone(),
            select_id: config.select_id.clone(),
            table_id: config.table_id.clone(),
            timing: config.timing.clone(),
            retry: RetryPolicy::new(config.timing.max_retries),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn station_url(&self) -> &Url {
        &self.station_url
    }

    pub fn period_url(&self, option_value: &str) -> Url {
        let mut url = self.data_url.clone();
        url.query_pairs_mut()
            .append_pair("estaciones", &self.station.code)
            .append_pair("t_e", self.station.station_type.key())
            .append_pair("CBOFiltro", option_value)
            .append_pair("estado", self.station.status.key())
            .append_pair(
                "cod_old",
                self.station.legacy_code.as_deref().unwrap_or_default(),
            )
            .append_pair("cate_esta", self.station.category.key());
        url
    }
}

fn extract_table(body: &str, table_id: &str) -> Option<String> {
    match find_element_html(body, "table", table_id) {
        Ok(Some(table)) => Some(table),
        Ok(None) => first_element_html(body, "table").ok().flatten(),
        Err(_) => None,
    }
}

#[async_trait]
impl SessionDriver for HttpDriver {
    async fn read_select_html(&mut self) -> Result<String> {
        info!("Fetching station page {}", self.station_url);
        let body = fetch_text_with_retry(&self.client, self.station_url.as_str(), self.retry)
            .await
            .map_err(|e| ScrapeError::fetch("catalog", format!("{:#}", e)))?;

        find_element_html(&body, "select", &self.select_id)?
            .ok_or_else(|| ScrapeError::NotFound(format!("select with id '{}'", self.select_id)))
    }

    /// The period request stands in for the dropdown selection. Its
    /// response is read once the settle delay has passed; if it carries no
    /// table, the endpoint is polled until the element timeout.
    async fn select_period(&mut self, option_value: &str) -> Result<String> {
        let url = self.period_url(option_value);
        debug!("Selecting period {} via {}", option_value, url);

        let client = &self.client;
        let url_str = url.as_str();
        let table_id = self.table_id.as_str();
        let retry = self.retry;
        let element_timeout = self.timing.element_timeout();
        let started = Instant::now();

        let selected = time::timeout(
            element_timeout,
            fetch_text_with_retry(client, url_str, retry),
        )
        .await;
        sleep(self.timing.settle_delay()).await;

        let mut table = match selected {
            Ok(Ok(body)) => extract_table(&body, table_id),
            Ok(Err(e)) => {
                warn!("{:#}", e);
                None
            }
            Err(_) => None,
        };

        if table.is_none() {
            let remaining = element_timeout.saturating_sub(started.elapsed());
            table = poll_until(remaining, self.timing.poll_interval(), || async move {
                match fetch_text_with_retry(client, url_str, retry).await {
                    Ok(body) => extract_table(&body, table_id),
                    Err(e) => {
                        warn!("{:#}", e);
                        None
                    }
                }
            })
            .await;
        }

        table.ok_or_else(|| {
            ScrapeError::fetch(
                option_value,
                format!("no table appeared within {:?}", element_timeout),
            )
        })
    }
}
