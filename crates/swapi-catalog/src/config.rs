// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use libswapi_catalog::{Config, Credentials, Error, Result};
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "swapi-catalog.toml";

const DEFAULT_CONTENT: &str = r#"# swapi-catalog configuration
# listing_url = "https://swapi.dev/api/people/"
# image_dataset_url = "https://akabab.github.io/starwars-api/api/all.json"
# page_size = 12
# connect_timeout_secs = 5
# request_timeout_secs = 60
# max_retries = 0
# initial_backoff_ms = 100
# threads = 8
# verbose = false
#
# [login]
# username = "jedi"
# password = "force123"
"#;

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct TomlConfig {
    listing_url: Option<String>,
    image_dataset_url: Option<String>,
    page_size: Option<usize>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    max_retries: Option<u8>,
    initial_backoff_ms: Option<u16>,
    threads: Option<usize>,
    verbose: bool,
    login: Option<TomlLogin>,
}

#[derive(Debug, Deserialize)]
struct TomlLogin {
    username: String,
    password: String,
}

/// cli configuration wrapper that combines toml file parsing with the library's config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub inner: Config,
    pub verbose: bool,
}

impl std::ops::Deref for CliConfig {
    type Target = Config;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl CliConfig {
    pub fn load() -> Result<Self> {
        let Some(path) = config_path() else {
            return Ok(Self::from_toml(TomlConfig::default()));
        };

        if !path.exists() {
            return Ok(Self::from_toml(TomlConfig::default()));
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            Error::config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        Self::parse(&content).map_err(|e| {
            Error::config(format!(
                "failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content).map(Self::from_toml)
    }

    fn from_toml(toml_config: TomlConfig) -> Self {
        let mut inner = Config::new();
        let defaults = inner.api.clone();

        if let Some(url) = toml_config.listing_url {
            inner = inner.with_listing_url(url);
        }
        if let Some(url) = toml_config.image_dataset_url {
            inner = inner.with_image_dataset_url(url);
        }
        if let Some(page_size) = toml_config.page_size {
            inner = inner.with_page_size(page_size);
        }

        let connect = toml_config
            .connect_timeout_secs
            .map_or(defaults.connect_timeout, Duration::from_secs);
        let request = toml_config
            .request_timeout_secs
            .map_or(defaults.request_timeout, Duration::from_secs);
        inner = inner.with_timeouts(connect, request).with_retries(
            toml_config.max_retries.unwrap_or(defaults.max_retries),
            toml_config
                .initial_backoff_ms
                .unwrap_or(defaults.initial_backoff_ms),
        );

        if let Some(threads) = toml_config.threads {
            inner = inner.with_threads(threads);
        }
        if let Some(login) = toml_config.login {
            inner = inner.with_credentials(Credentials::new(login.username, login.password));
        }

        Self {
            inner,
            verbose: toml_config.verbose,
        }
    }

    pub fn edit_config() -> Result<()> {
        let Some(path) = config_path() else {
            return Err(Error::config("could not determine config directory"));
        };

        if !path.exists() {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).map_err(|e| {
                    Error::config(format!(
                        "failed to create config directory {}: {e}",
                        dir.display()
                    ))
                })?;
            }

            fs::write(&path, DEFAULT_CONTENT).map_err(|e| {
                Error::config(format!(
                    "failed to create config file {}: {e}",
                    path.display()
                ))
            })?;
        }

        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());
        std::process::Command::new(&editor)
            .arg(&path)
            .status()
            .map_err(|e| Error::other(format!("failed to open editor {editor}: {e}")))?;

        Ok(())
    }
}
