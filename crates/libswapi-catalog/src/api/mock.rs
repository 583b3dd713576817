// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::{Error, Result};

use super::Fetch;

/// Serves canned bodies by url and answers 404 for anything else.
#[derive(Default)]
pub(crate) struct MockFetcher {
    bodies: HashMap<String, String>,
    failing: HashMap<String, u16>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(self, url: &str, body: serde_json::Value) -> Self {
        self.with_raw(url, &body.to_string())
    }

    pub(crate) fn with_raw(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    pub(crate) fn with_status(mut self, url: &str, status: u16) -> Self {
        self.failing.insert(url.to_string(), status);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub(crate) fn request_count(&self, url: &str) -> usize {
        self.requests.lock().iter().filter(|r| *r == url).count()
    }
}

impl Fetch for MockFetcher {
    fn get_text(&self, url: &str) -> Result<String> {
        self.requests.lock().push(url.to_string());

        if let Some(&status) = self.failing.get(url) {
            return Err(Error::http_status(url, status));
        }

        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| Error::http_status(url, 404))
    }
}
