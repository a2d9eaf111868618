use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

/// Applied when `RUST_LOG` is unset: our own events at `info`, dependencies
/// (reqwest, hyper) only when they warn.
pub const DEFAULT_FILTER: &str = "warn,sheetfeed=info";

fn filter_from(directives: Option<&str>) -> anyhow::Result<EnvFilter> {
    match directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("parse RUST_LOG: {directives}")),
        None => EnvFilter::try_new(DEFAULT_FILTER).context("build default log filter"),
    }
}

/// Installs the stderr subscriber so stdout carries only feed output.
pub fn init() -> anyhow::Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_from(directives.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
