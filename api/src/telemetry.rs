//! Tracing subscriber setup

use anyhow::Result;
use rc_shared::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Build the log filter: `RUST_LOG` when set, otherwise the configured level
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };
    Ok(filter
        .add_directive("actix_server=info".parse()?)
        .add_directive("reqwest=warn".parse()?))
}

/// Install the global subscriber in the configured format
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;

    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_current_span(true).with_target(true);
            tracing::subscriber::set_global_default(Registry::default().with(layer).with(filter))?;
        }
        LogFormat::Pretty => {
            let layer = fmt::layer().pretty().with_target(false);
            tracing::subscriber::set_global_default(Registry::default().with(layer).with(filter))?;
        }
        LogFormat::Compact => {
            let layer = fmt::layer().compact().with_target(false);
            tracing::subscriber::set_global_default(Registry::default().with(layer).with(filter))?;
        }
    }

    Ok(())
}
