//! Search providers
//!
//! A provider answers one name query with a list of entities. The picker does
//! no filtering of its own; whatever the provider returns is the result set.

use crate::entity::{Entity, SearchPage};
use crate::error::{FetchFailure, PickError, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use std::time::Duration;

/// Default public endpoint
pub const DEFAULT_ENDPOINT: &str = "https://rickandmortyapi.com/api/character/";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of searchable entities
pub trait SearchProvider: Send + Sync {
    fn search(&self, name: &str) -> std::result::Result<Vec<Entity>, FetchFailure>;
}

/// HTTP provider settings
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// `GET <endpoint>?name=<query>` returning `{ "results": [...] }`
#[derive(Clone)]
pub struct HttpProvider {
    endpoint: Url,
    http: Client,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpProvider {
    pub fn new(config: &HttpProviderConfig) -> Result<Self> {
        let endpoint = Url::parse(config.endpoint.trim())
            .map_err(|e| PickError::InvalidEndpoint(config.endpoint.clone(), e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(PickError::InvalidEndpoint(
                config.endpoint.clone(),
                format!("unsupported scheme '{}'", endpoint.scheme()),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("multipick/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PickError::HttpClient(e.to_string()))?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl SearchProvider for HttpProvider {
    fn search(&self, name: &str) -> std::result::Result<Vec<Entity>, FetchFailure> {
        let url = self.endpoint.as_str();
        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&[("name", name)])
            .send()
            .map_err(|e| FetchFailure::from_reqwest(url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().map_err(|e| FetchFailure::from_reqwest(url, &e))?;
        let page: SearchPage = serde_json::from_str(&body)
            .map_err(|e| FetchFailure::MalformedBody(e.to_string()))?;

        let results = page.into_results();
        tracing::debug!("provider returned {} results for {:?}", results.len(), name);
        Ok(results)
    }
}
