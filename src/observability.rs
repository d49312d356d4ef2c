use std::net::SocketAddr;

use crate::engine::EngineError;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: free-slot queries served.
pub const SLOT_QUERIES_TOTAL: &str = "openslot_slot_queries_total";

/// Histogram: free-slot computation latency in seconds.
pub const SLOT_QUERY_DURATION_SECONDS: &str = "openslot_slot_query_duration_seconds";

/// Counter: bookings admitted by the conflict guard.
pub const BOOKINGS_ACCEPTED_TOTAL: &str = "openslot_bookings_accepted_total";

/// Counter: bookings rejected before the write. Labels: reason.
pub const BOOKINGS_REJECTED_TOTAL: &str = "openslot_bookings_rejected_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init_metrics(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Plain-text tracing subscriber for host processes that don't install their
/// own.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}

/// Map an error to a short label for metrics.
pub fn error_label(err: &EngineError) -> &'static str {
    match err {
        EngineError::MissingFields(_) | EngineError::Validation { .. } => "validation",
        EngineError::NotFound(_) => "not_found",
        EngineError::AlreadyExists(_) => "already_exists",
        EngineError::HasDependents(_) => "has_dependents",
        EngineError::Conflict(_) => "conflict",
        EngineError::Lookup(_) => "lookup",
        EngineError::Persistence(_) => "persistence",
        EngineError::LimitExceeded(_) => "limit_exceeded",
    }
}
