//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use campus_core::config::ObservabilityConfig;

/// Environment variable holding per-crate filter directives, e.g.
/// `CAMPUS_LOG=campus_transport=debug,campus_session=info`.
pub const LOG_ENV: &str = "CAMPUS_LOG";

static INIT: Once = Once::new();

/// Initialize with the default config: `CAMPUS_LOG`, falling back to
/// `campus=info`, human-readable output.
///
/// Idempotent. If another global subscriber is already installed, this
/// one is skipped.
pub fn init_tracing() {
    init_tracing_with_config(&ObservabilityConfig::default());
}

/// Initialize from config. `CAMPUS_LOG` still wins over `log_level`.
pub fn init_tracing_with_config(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level)));
        install(filter, config.json);
    });
}

/// Initialize with an explicit filter string (for tests or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    INIT.call_once(|| install(EnvFilter::new(filter), false));
}

fn install(filter: EnvFilter, json: bool) {
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing: subscriber already installed, keeping it");
    }
}

fn default_directive(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        "campus=info".to_string()
    } else {
        format!("campus={level}")
    }
}
