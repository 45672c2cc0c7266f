//! Module for telemetry functionality such as logging

use anyhow::{Result, bail};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env() -> Result<Self> {
        match std::env::var("LOG_FORMAT").as_deref() {
            Err(_) | Ok("pretty") => Ok(LogFormat::Pretty),
            Ok("json") => Ok(LogFormat::Json),
            Ok(other) => bail!("unsupported LOG_FORMAT: {other} (expected pretty or json)"),
        }
    }
}

/// Sets up logging. The log level is taken from the `RUST_LOG` env variable (default is `info`).
/// The logging format (pretty/json) is set by the `LOG_FORMAT` env variable.
///
/// Logs go to stderr: stdout carries the response of the process.
pub fn setup_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    match LogFormat::from_env()? {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }
    debug!("Debug mode is enabled. Customer data and API responses are logged.");
    Ok(())
}
