use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::LoaderConfig;

/// Default filter directive for this station
pub fn default_directive(config: &LoaderConfig) -> String {
    if config.station.debug {
        "debug".to_string()
    } else {
        config.observability.log_level.clone()
    }
}

/// Initialize structured logging. Output goes to stderr; stdout belongs to
/// the operator panel. `RUST_LOG` overrides the configured level.
pub fn init_telemetry(config: &LoaderConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(config)))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }

    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());
    tracing::info!(host = %host, press = %config.station.press_id, "Loader controller telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking everything one cycle does
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one pass through the scan/validate/run sequence
pub fn create_cycle_span(cycle: u64, press_id: &str, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "loader_cycle",
        cycle = cycle,
        press.id = press_id,
        correlation.id = correlation_id,
    )
}
