//! Prometheus Metrics Registry - Request Counting
//!
//! Owns the process-wide `request_count` counter and its registry.
//! The counter is shared between the counting middleware and the
//! `/metrics` renderer via `Arc` - no globals.

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Process-wide request counter plus its Prometheus registry.
///
/// Created once at startup with the counter at 0. The counter only
/// ever goes up: one increment per observed request, never reset,
/// never persisted.
pub struct RequestMetrics {
    /// Prometheus registry.
    registry: Registry,
    /// Total inbound requests, incremented once per request.
    requests: IntCounter,
}

impl RequestMetrics {
    /// Create and register the request counter.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests =
            IntCounter::new("request_count", "Number of requests received")?;

        registry.register(Box::new(requests.clone()))?;

        Ok(Self { registry, requests })
    }

    /// Count one inbound request. Atomic, so concurrent requests
    /// never lose updates.
    pub fn inc_requests(&self) {
        self.requests.inc();
    }

    /// Snapshot of the current request total.
    pub fn requests_total(&self) -> u64 {
        self.requests.get()
    }

    /// Render the registry in the Prometheus text exposition format.
    ///
    /// The value is a snapshot: an increment racing with the render
    /// may or may not be reflected.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
