// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use crate::{
    api::{ApiConfig, DEFAULT_IMAGE_DATASET_URL, DEFAULT_LISTING_URL},
    auth::Credentials,
    pagination::PAGE_SIZE,
};

/// Configuration for libswapi-catalog operations.
///
/// Library consumers can construct this directly; the CLI fills it from
/// its TOML file.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use libswapi_catalog::Config;
///
/// let config = Config::new()
///     .with_listing_url("https://swapi.dev/api/people/?page=2")
///     .with_timeouts(Duration::from_secs(3), Duration::from_secs(20))
///     .with_threads(4);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// First page of the people listing endpoint.
    pub listing_url: String,

    /// Auxiliary dataset used to look up character images.
    pub image_dataset_url: String,

    /// Number of characters per page when paginating filtered results locally.
    pub page_size: usize,

    pub api: ApiConfig,

    /// Maximum number of parallel fetch threads.
    ///
    /// `None` (default) uses rayon's global pool.
    pub threads: Option<usize>,

    /// Credentials accepted by the login gate.
    pub credentials: Credentials,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            image_dataset_url: DEFAULT_IMAGE_DATASET_URL.to_string(),
            page_size: PAGE_SIZE,
            api: ApiConfig::new(),
            threads: None,
            credentials: Credentials::default(),
        }
    }

    pub fn with_listing_url(mut self, url: impl Into<String>) -> Self {
        self.listing_url = url.into();
        self
    }

    pub fn with_image_dataset_url(mut self, url: impl Into<String>) -> Self {
        self.image_dataset_url = url.into();
        self
    }

    /// Sets the local page size. Zero is clamped to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.api = self.api.with_timeouts(connect, request);
        self
    }

    pub fn with_retries(mut self, max_retries: u8, initial_backoff_ms: u16) -> Self {
        self.api = self.api.with_retries(max_retries, initial_backoff_ms);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}
