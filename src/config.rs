use std::time::Duration;

use anyhow::Context as _;

pub const PRODUCTS_URL_VAR: &str = "SHEETFEED_PRODUCTS_URL";
pub const ARTICLES_URL_VAR: &str = "SHEETFEED_ARTICLES_URL";
pub const FETCH_TIMEOUT_VAR: &str = "SHEETFEED_FETCH_TIMEOUT_MS";

pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub products_source: Option<String>,
    pub articles_source: Option<String>,
    pub fetch_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            products_source: None,
            articles_source: None,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let fetch_timeout = match read(FETCH_TIMEOUT_VAR) {
            Some(raw) => {
                let ms = raw.parse::<u64>().with_context(|| {
                    format!("invalid {FETCH_TIMEOUT_VAR}={raw:?}; expected milliseconds")
                })?;
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        };

        Ok(Self {
            products_source: read(PRODUCTS_URL_VAR),
            articles_source: read(ARTICLES_URL_VAR),
            fetch_timeout,
        })
    }

    pub fn with_timeout_override(mut self, timeout_ms: Option<u64>) -> Self {
        if let Some(ms) = timeout_ms {
            self.fetch_timeout = Duration::from_millis(ms);
        }
        self
    }
}

/// The CLI flag wins over the environment.
pub fn pick_source(
    flag: Option<&str>,
    configured: Option<&str>,
    var: &str,
) -> anyhow::Result<String> {
    flag.or(configured)
        .map(str::to_owned)
        .ok_or_else(|| anyhow::anyhow!("no feed source: pass --source or set {var}"))
}
