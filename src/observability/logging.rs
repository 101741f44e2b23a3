//! # Structured Logging
//!
//! Subscriber setup and span helpers built on the tracing ecosystem.
//!
//! `RUST_LOG` always wins over the configured level, so a single run can be
//! made more verbose without touching the environment file.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::Result;

/// Create a tracing span for a checker run.
///
/// ```rust,ignore
/// let _span = check_span!("single_host", "bookinfo").entered();
/// ```
#[macro_export]
macro_rules! check_span {
    ($checker:expr, $namespace:expr) => {
        tracing::info_span!(
            "checker",
            checker = %$checker,
            namespace = %$namespace
        )
    };
    ($checker:expr, $namespace:expr, $($field:tt)*) => {
        tracing::info_span!(
            "checker",
            checker = %$checker,
            namespace = %$namespace,
            $($field)*
        )
    };
}

/// Install the global fmt subscriber.
///
/// Safe to call more than once: if a subscriber is already installed (for
/// example by a test harness) the existing one is kept.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let result = if config.json_logging {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    };

    if result.is_err() {
        // Subscriber already set elsewhere; ignore.
        tracing::debug!("Global tracing subscriber already installed");
    }

    Ok(())
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::debug!(
        namespace = %config.namespace,
        output = %config.output,
        log_level = %config.observability.log_level,
        json_logging = config.observability.json_logging,
        "meshcheck configuration"
    );
}
