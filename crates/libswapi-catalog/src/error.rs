// SPDX-License-Identifier: MIT OR Apache-2.0

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{url} returned http status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to parse json: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("failed to fetch characters from {url}: {source}")]
    ListingFetch {
        url: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

macro_rules! error_ctor {
    ($($name:ident => $variant:ident),* $(,)?) => {
        $(
            pub fn $name(msg: impl Into<String>) -> Self {
                Self::$variant(msg.into())
            }
        )*
    };
}

impl Error {
    error_ctor!(
        config => Config,
        other => Other,
    );

    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    pub(crate) fn listing(url: impl Into<String>, source: Error) -> Self {
        Self::ListingFetch {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Returns `true` for failures that may succeed when the same request is
    /// issued again (connection problems, timeouts, 5xx and 429 responses).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::ListingFetch { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}
