use anyhow::{Context, Result};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::Config;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Waits are `base_delay * 2^attempt`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
            base_delay: Duration::from_secs(1),
        }
    }

    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

pub fn create_client(config: &Config) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timing.request_timeout())
        .cookie_store(true)
        .build()?;

    Ok(client)
}

/// GET `url` and return the body, retrying failed requests and non-success
/// statuses with exponential back-off.
pub async fn fetch_text_with_retry(client: &Client, url: &str, policy: RetryPolicy) -> Result<String> {
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < policy.max_retries {
        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response
                        .text()
                        .await
                        .with_context(|| format!("Failed to read body of {}", url));
                }
                warn!("HTTP error {}: {}", status, url);
                last_error = Some(anyhow::anyhow!("HTTP error: {}", status));
            }
            Err(e) => {
                error!("Request failed for {}: {}", url, e);
                last_error = Some(e.into());
            }
        }

        attempts += 1;
        if attempts < policy.max_retries {
            let delay = policy.delay_after(attempts);
            warn!(
                "Retrying in {:?}... (attempt {}/{})",
                delay,
                attempts + 1,
                policy.max_retries
            );
            sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
        .context(format!("Failed to fetch {} after {} attempts", url, policy.max_retries))
}
