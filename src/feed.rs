use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

/// Where feed text comes from: a published sheet URL or a local export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Remote(Url),
    Local(PathBuf),
}

impl FeedSource {
    /// `http://` and `https://` sources are fetched; anything else is a path.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            anyhow::bail!("feed source is empty");
        }
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(raw).with_context(|| format!("parse feed url: {raw}"))?;
            return Ok(Self::Remote(url));
        }
        Ok(Self::Local(PathBuf::from(raw)))
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

pub async fn load_text(source: &FeedSource, timeout: Duration) -> anyhow::Result<String> {
    let text = match source {
        FeedSource::Remote(url) => fetch(url, timeout)
            .await
            .with_context(|| format!("fetch feed: {url}"))?,
        FeedSource::Local(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read feed: {}", path.display()))?,
    };
    tracing::info!(source = %source, bytes = text.len(), "loaded feed");
    Ok(text)
}

async fn fetch(url: &Url, timeout: Duration) -> anyhow::Result<String> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .context("build feed http client")?;

    let response = client
        .get(url.clone())
        .header(USER_AGENT, concat!("sheetfeed/", env!("CARGO_PKG_VERSION")))
        .header(ACCEPT, "text/csv,application/json;q=0.9,*/*;q=0.8")
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("feed request failed ({status})");
    }
    response.text().await.context("read feed body")
}
