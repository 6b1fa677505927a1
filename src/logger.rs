use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
};

pub const DEFAULT_DIRECTIVE: &str = "info";

/// Installs the global subscriber with the `info` default.
pub fn init() -> Result<(), TryInitError> {
    init_with_default(DEFAULT_DIRECTIVE)
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `default_directive`.
/// Once anything is enabled at debug level, span close events report stage durations.
///
/// Fails if a global subscriber is already installed, e.g. by a host application.
pub fn init_with_default(default_directive: &str) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let span_events = if enables_debug(&env_filter) {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
}

fn enables_debug(filter: &EnvFilter) -> bool {
    filter
        .max_level_hint()
        .is_some_and(|level| level >= LevelFilter::DEBUG)
}
