//! Tracing subscriber setup.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use director_core::config::LogFormat;

/// `RUST_LOG` wins over the configured level.
fn env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{level}'")),
    }
}

/// Install the global subscriber. Calling it twice is an error.
pub fn init(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = env_filter(level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
