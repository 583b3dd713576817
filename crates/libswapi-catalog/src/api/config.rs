// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

pub(crate) const DEFAULT_LISTING_URL: &str = "https://swapi.dev/api/people/";
pub(crate) const DEFAULT_IMAGE_DATASET_URL: &str =
    "https://akabab.github.io/starwars-api/api/all.json";
pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub(crate) const DEFAULT_MAX_RETRIES: u8 = 0;
pub(crate) const DEFAULT_INITIAL_BACKOFF_MS: u16 = 100;

pub const USER_AGENT: &str = concat!("swapi-catalog/", env!("CARGO_PKG_VERSION"));

/// HTTP settings shared by every remote fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Extra attempts after a transient failure. `0` issues every request once.
    pub max_retries: u8,
    pub initial_backoff_ms: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiConfig {
    pub const fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF_MS,
        }
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    pub fn with_retries(mut self, max_retries: u8, initial_backoff_ms: u16) -> Self {
        self.max_retries = max_retries;
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }
}
