//! Prometheus metrics for envelope verification.
//!
//! All metrics follow the naming convention: `eg_<area>_<metric>_<unit>`
//!
//! Counters are process-global and can be bumped before (or without)
//! [`register_metrics`]; registration only makes them visible to [`encode_metrics`].

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Envelopes accepted (signature valid, replay record written)
    pub static ref ENVELOPES_VERIFIED: Counter = Counter::new(
        "eg_envelope_verified_total",
        "Total number of envelopes accepted"
    ).expect("metric creation failed");

    /// Envelopes rejected, by reason
    pub static ref ENVELOPES_REJECTED: CounterVec = CounterVec::new(
        Opts::new("eg_envelope_rejected_total", "Total number of envelopes rejected"),
        &["reason"]  // reason: missing_signature/decode/expired/invalid_method/...
    ).expect("metric creation failed");

    /// Replay records written to the state store
    pub static ref REPLAY_KEYS_WRITTEN: Counter = Counter::new(
        "eg_replay_keys_written_total",
        "Total number of replay records written"
    ).expect("metric creation failed");

    /// Time spent verifying one call
    pub static ref ENVELOPE_VERIFY_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "eg_envelope_verify_duration_seconds",
            "Time spent verifying an envelope"
        ).buckets(exponential_buckets(0.00001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Handle to the registered metrics.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless: already-registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ENVELOPES_VERIFIED.clone()),
        Box::new(ENVELOPES_REJECTED.clone()),
        Box::new(REPLAY_KEYS_WRITTEN.clone()),
        Box::new(ENVELOPE_VERIFY_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
