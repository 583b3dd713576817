// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{thread, time::Duration};

use serde::de::DeserializeOwned;

use crate::{Error, Result};

use super::config::{ApiConfig, USER_AGENT};

/// Fetches a single remote resource by its locator.
///
/// Every call is a fresh request; callers decide what a failure means.
/// Implementations must be shareable across rayon workers.
pub trait Fetch: Sync {
    /// Returns the raw body of a successful (2xx) response.
    fn get_text(&self, url: &str) -> Result<String>;

    /// Fetches `url` and parses the body as JSON.
    fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T>
    where
        Self: Sized,
    {
        let body = self.get_text(url)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Thread-safe HTTP client for the catalog's remote endpoints.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::blocking::Client,
    config: ApiConfig,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Creates a new API client with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (e.g., TLS backend unavailable).
    pub fn new() -> Self {
        Self::with_config(ApiConfig::new())
            .unwrap_or_else(|e| panic!("failed to create API client: {e}"))
    }

    pub fn with_config(config: ApiConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }

    /// Returns a reference to the underlying HTTP client for reuse.
    pub fn http_client(&self) -> &reqwest::blocking::Client {
        &self.client
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn get_once(&self, url: &str) -> Result<String> {
        log::debug!(target: "api", "GET {url}");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::http_status(url, status.as_u16()));
        }
        Ok(response.text()?)
    }
}

impl Fetch for ApiClient {
    fn get_text(&self, url: &str) -> Result<String> {
        let mut backoff_ms = u64::from(self.config.initial_backoff_ms);

        for attempt in 0..=self.config.max_retries {
            match self.get_once(url) {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.config.max_retries && e.is_transient() => {
                    log::debug!(target: "api", "retrying {url} in {backoff_ms}ms: {e}");
                    thread::sleep(Duration::from_millis(backoff_ms));
                    backoff_ms = backoff_ms.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::other("max retries exceeded"))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::api::mock::MockFetcher;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_fetch_parses_json_body() {
        let fetcher = MockFetcher::new().with(
            "https://swapi.dev/api/planets/1/",
            serde_json::json!({ "name": "Tatooine", "climate": "arid" }),
        );

        let planet: Named = fetcher.fetch("https://swapi.dev/api/planets/1/").unwrap();
        assert_eq!(planet.name, "Tatooine");
    }

    #[test]
    fn test_fetch_reports_malformed_body() {
        let fetcher = MockFetcher::new().with_raw("https://swapi.dev/api/planets/1/", "<html>");

        let err = fetcher
            .fetch::<Named>("https://swapi.dev/api/planets/1/")
            .unwrap_err();
        assert!(matches!(err, Error::JsonParse(_)));
    }

    #[test]
    fn test_fetch_reports_missing_resource() {
        let fetcher = MockFetcher::new();

        let err = fetcher
            .fetch::<Named>("https://swapi.dev/api/planets/404/")
            .unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    }

    #[test]
    fn test_client_uses_configured_settings() {
        let config = ApiConfig::new()
            .with_timeouts(Duration::from_secs(1), Duration::from_secs(2))
            .with_retries(2, 50);
        let client = ApiClient::with_config(config.clone()).unwrap();
        assert_eq!(client.config(), &config);
    }
}
