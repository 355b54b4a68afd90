#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use kkm_core::{CardQuery, LookupError, PageFetcher};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Card validity form on the MPK site.
pub const DEFAULT_ENDPOINT: &str = "http://www.mpk.krakow.pl/pl/sprawdz-waznosc-biletu/index,1.html";

/// KKM cards are always queried as card type 0.
const CITY_CARD_TYPE: &str = "0";

/// Upstream fetch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Validity form URL
    #[serde(default = "FetchConfig::default_endpoint")]
    pub endpoint: String,

    /// User-Agent header
    #[serde(default = "FetchConfig::default_user_agent")]
    pub user_agent: String,

    /// Request timeout (seconds); transport default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl FetchConfig {
    fn default_endpoint() -> String {
        DEFAULT_ENDPOINT.to_string()
    }

    fn default_user_agent() -> String {
        format!("Mozilla/5.0 (compatible; kkmbot/{})", env!("CARGO_PKG_VERSION"))
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            user_agent: Self::default_user_agent(),
            timeout_secs: None,
        }
    }
}

/// Fetches card validity pages from the MPK site.
#[derive(Debug, Clone)]
pub struct MpkFetcher {
    client: Client,
    endpoint: Url,
}

impl MpkFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid upstream endpoint: {}", config.endpoint))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            anyhow::bail!("Only http and https endpoints are supported");
        }

        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    /// Full request URL for `query`.
    #[must_use]
    pub fn query_url(&self, query: &CardQuery) -> Url {
        let date = query.date_string();
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("cityCardType", CITY_CARD_TYPE)
            .append_pair("dateValidity", &date)
            .append_pair("identityNumber", query.client_id())
            .append_pair("cityCardNumber", query.card_id())
            .append_pair("sprawdz_kkm", "Check");
        url
    }
}

#[async_trait]
impl PageFetcher for MpkFetcher {
    async fn fetch(&self, query: &CardQuery) -> Result<Vec<u8>, LookupError> {
        let url = self.query_url(query);
        debug!("GET {url}");

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Upstream request failed: {e}");
                return Err(LookupError::Transport);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream responded with status {status}");
            return Err(LookupError::Transport);
        }

        match response.bytes().await {
            Ok(bytes) => {
                debug!("Read {} bytes from upstream", bytes.len());
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!("Failed to read upstream response ({status}): {e}");
                Err(LookupError::Transport)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fetcher() -> MpkFetcher {
        let Ok(fetcher) = MpkFetcher::new(&FetchConfig::default()) else {
            panic!("Failed to create MpkFetcher");
        };
        fetcher
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.user_agent.contains("kkmbot"));
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_query_url() {
        let date = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap_or_default();
        let url = fetcher().query_url(&CardQuery::new("12345", "67890", date));

        assert_eq!(
            url.as_str(),
            "http://www.mpk.krakow.pl/pl/sprawdz-waznosc-biletu/index,1.html\
             ?cityCardType=0&dateValidity=2023-02-01&identityNumber=12345\
             &cityCardNumber=67890&sprawdz_kkm=Check"
        );
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let config = FetchConfig {
            endpoint: "ftp://example.com/form".to_string(),
            ..FetchConfig::default()
        };
        assert!(MpkFetcher::new(&config).is_err());
    }

    #[test]
    fn test_rejects_unparseable_endpoint() {
        let config = FetchConfig {
            endpoint: "not a url".to_string(),
            ..FetchConfig::default()
        };
        assert!(MpkFetcher::new(&config).is_err());
    }
}
