use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::CatalogError;

// The catalog site serves Latin-1 without always declaring it.
const SOURCE_CHARSET: &str = "iso-8859-1";

const MAX_BACKOFF_SECS: u64 = 60;

/// Where pages come from. The pipeline only needs decoded HTML for a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Live site access over HTTP.
pub struct HttpSource {
    client: Client,
    max_attempts: u32,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            max_attempts: config.max_attempts,
        })
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        fetch_text(&self.client, url, self.max_attempts).await
    }
}

pub fn create_client(config: &Config) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .pool_max_idle_per_host(config.concurrency.max(1))
        .build()?;

    Ok(client)
}

/// GETs `url` and decodes the body from the site's legacy charset. Non-success statuses
/// are retried up to `max_attempts` times in total before failing with a transport error.
pub async fn fetch_text(client: &Client, url: &str, max_attempts: u32) -> Result<String> {
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;
        let last_error: anyhow::Error = match client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(url, "fetched");
                return response
                    .text_with_charset(SOURCE_CHARSET)
                    .await
                    .with_context(|| format!("Failed to read body of {}", url));
            }
            Ok(response) => {
                let status = response.status();
                warn!("HTTP error {}: {}", status, url);
                CatalogError::Transport {
                    url: url.to_string(),
                    status,
                }
                .into()
            }
            Err(e) => {
                error!("Request failed for {}: {}", url, e);
                e.into()
            }
        };

        if attempts >= max_attempts {
            return Err(last_error)
                .context(format!("Failed to fetch {} after {} attempts", url, attempts));
        }

        let delay = backoff_delay(attempts);
        warn!("Retrying in {:?}... (attempt {}/{})", delay, attempts + 1, max_attempts);
        sleep(delay).await;
    }
}

/// Exponential backoff after the `attempt`-th failure, capped at `MAX_BACKOFF_SECS`.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt).min(MAX_BACKOFF_SECS))
}
