//! Logging setup
//!
//! Everything goes to stderr so stdout carries nothing but the rules.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Select JSON lines with `YARGEN_LOG_FORMAT=json`
const LOG_FORMAT_ENV: &str = "YARGEN_LOG_FORMAT";

/// Fallback filter when `RUST_LOG` is unset. `-v` progress comes from the
/// terminal reporter, so tracing stays at `warn` there too.
pub const DEFAULT_DIRECTIVE: &str = "warn";

pub fn init() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVE))?;

    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "compact".to_string());

    let result = match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}
