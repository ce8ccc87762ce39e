//! # Envelope Guard Telemetry
//!
//! Logging and metrics bootstrap shared by the verifier and the tools.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by `tracing-subscriber`, plain or JSON
//! - **Metrics**: Prometheus counters for envelope outcomes
//!
//! Library crates only emit events and bump counters. Installing a subscriber
//! and registering metrics is left to binaries via [`init_telemetry`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eg_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EG_SERVICE_NAME` | `envelope-guard` | Service name attached to log lines |
//! | `EG_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `EG_JSON_LOGS` | `false` | Emit JSON log lines |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, MetricsHandle, ENVELOPES_REJECTED,
    ENVELOPES_VERIFIED, ENVELOPE_VERIFY_DURATION, REPLAY_KEYS_WRITTEN,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;
    init_logging(config)?;

    tracing::info!(service = %config.service_name, "Telemetry initialized");

    Ok(TelemetryGuard {
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!("Shutting down telemetry");
    }
}
