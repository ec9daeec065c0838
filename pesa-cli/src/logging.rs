use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber, logging to stderr.
///
/// An explicit `--log-level` wins, then `RUST_LOG`, then the config level.
/// Unparseable directives fall back to "info".
pub fn init_logging(cli_level: Option<&str>, config_level: &str) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::try_new(level),
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config_level)),
    }
    .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}
