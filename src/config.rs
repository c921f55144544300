//! Application configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

pub const PAGE_URL_ENV: &str = "CONNECTION_MANAGER_PAGE_URL";
pub const TITLE_ENV: &str = "CONNECTION_MANAGER_TITLE";
pub const TIMEOUT_ENV: &str = "CONNECTION_MANAGER_TIMEOUT_SECS";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Page the diagram is mounted on; API paths resolve against it.
    pub page_url: Url,
    pub window_title: String,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_url: Url::parse("http://localhost:8080/").expect("valid default URL"),
            window_title: String::from("Connection Manager"),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Overlays values from `lookup` on the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(PAGE_URL_ENV) {
            config.page_url =
                Url::parse(&url).with_context(|| format!("Invalid {}: {}", PAGE_URL_ENV, url))?;
        }
        if let Some(title) = lookup(TITLE_ENV) {
            config.window_title = title;
        }
        if let Some(secs) = lookup(TIMEOUT_ENV) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", TIMEOUT_ENV, secs))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
