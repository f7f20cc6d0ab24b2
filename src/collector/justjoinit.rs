use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use spider_client::shapes::request::{ReturnFormat, ReturnFormatHandling};
use spider_client::{RequestParams, Spider};
use tracing::{debug, info, warn};

use super::html::harvest_listings;
use super::{Collector, RawListing};
use crate::model::Source;

pub const OFFERS_URL: &str = "https://justjoin.it/job-offers/all-locations";
const USER_AGENT: &str = concat!("jobpulse/", env!("CARGO_PKG_VERSION"));

/// How the listing page is obtained. The site hydrates its cards client-side,
/// so a rendering fetch sees far more than a plain GET.
enum Fetcher {
    Direct,
    Spider { api_key: String },
}

pub struct JustJoinIt {
    page_url: String,
    fetcher: Fetcher,
}

impl JustJoinIt {
    /// Renders through spider.cloud when `SPIDER_API_KEY` is set.
    pub fn from_env() -> Self {
        let fetcher = match std::env::var("SPIDER_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => Fetcher::Spider { api_key },
            _ => Fetcher::Direct,
        };
        Self {
            page_url: OFFERS_URL.to_string(),
            fetcher,
        }
    }

    pub fn direct(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            fetcher: Fetcher::Direct,
        }
    }

    async fn fetch_page(&self) -> Result<String> {
        match &self.fetcher {
            Fetcher::Direct => fetch_direct(&self.page_url).await,
            Fetcher::Spider { api_key } => fetch_rendered(api_key, &self.page_url).await,
        }
    }
}

#[async_trait]
impl Collector for JustJoinIt {
    fn source(&self) -> Source {
        Source::JustJoinIt
    }

    async fn collect(&self, timeout: Duration) -> Vec<RawListing> {
        let start = Instant::now();
        match tokio::time::timeout(timeout, self.fetch_page()).await {
            Ok(Ok(page)) => {
                let listings = harvest_listings(&page, &self.page_url);
                info!(
                    source = %self.source(),
                    listings = listings.len(),
                    "Harvested listing page in {:.1}s",
                    start.elapsed().as_secs_f64()
                );
                listings
            }
            Ok(Err(e)) => {
                warn!(source = %self.source(), "Fetching {} failed: {:#}", self.page_url, e);
                Vec::new()
            }
            Err(_) => {
                warn!(
                    source = %self.source(),
                    "Fetching {} timed out after {}s",
                    self.page_url,
                    timeout.as_secs()
                );
                Vec::new()
            }
        }
    }
}

async fn fetch_direct(url: &str) -> Result<String> {
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    debug!("GET {}", url);
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
        .context("Failed to read listing page")
}

async fn fetch_rendered(api_key: &str, url: &str) -> Result<String> {
    let spider = Spider::new(Some(api_key.to_string()))
        .map_err(|e| anyhow!("Failed to create Spider client: {}", e))?;

    let params = RequestParams {
        return_format: Some(ReturnFormatHandling::Single(ReturnFormat::Raw)),
        ..Default::default()
    };

    debug!("Rendering {} via spider", url);
    let response = spider
        .scrape_url(url, Some(params), "application/json")
        .await
        .map_err(|e| anyhow!("Spider scrape failed: {}", e))?;

    let parsed: serde_json::Value = match response.as_str() {
        Some(s) => serde_json::from_str(s).unwrap_or(response.clone()),
        None => response,
    };

    parsed
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|obj| obj.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No content in spider response"))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_yields_empty_batch() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let collector = JustJoinIt::direct(format!("http://{}/job-offers", addr));
        assert!(collector.collect(Duration::from_secs(5)).await.is_empty());
    }

    #[tokio::test]
    async fn silent_server_times_out_to_empty_batch() {
        // accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _hold = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((sock, _)) = listener.accept().await {
                held.push(sock);
            }
        });

        let collector = JustJoinIt::direct(format!("http://{}/job-offers", addr));
        let got = collector.collect(Duration::from_millis(200)).await;
        assert!(got.is_empty());
    }
}
