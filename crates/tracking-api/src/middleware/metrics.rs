//! # Request Metrics
//!
//! Lightweight in-process counters using atomics. HTTP-level counts are
//! recorded by [`metrics_middleware`]; issuance outcomes are recorded by
//! the issue handler. A snapshot is served at `/v1/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shared metrics state.
#[derive(Debug, Clone)]
pub struct ApiMetrics {
    request_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU64>,
    issued_count: Arc<AtomicU64>,
    conflict_count: Arc<AtomicU64>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetricsSnapshot {
    /// HTTP requests served.
    pub requests: u64,
    /// HTTP responses with a 4xx or 5xx status.
    pub errors: u64,
    /// Tracking numbers successfully issued.
    pub issued: u64,
    /// Issuances rejected by the store's unique key.
    pub conflicts: u64,
}

impl ApiMetrics {
    /// Create a new metrics instance.
    pub fn new() -> Self {
        Self {
            request_count: Arc::new(AtomicU64::new(0)),
            error_count: Arc::new(AtomicU64::new(0)),
            issued_count: Arc::new(AtomicU64::new(0)),
            conflict_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_issued(&self) {
        self.issued_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_conflict(&self) {
        self.conflict_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.request_count.load(Ordering::Relaxed),
            errors: self.error_count.load(Ordering::Relaxed),
            issued: self.issued_count.load(Ordering::Relaxed),
            conflicts: self.conflict_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.request_count.fetch_add(1, Ordering::Relaxed);
        if response.status().is_server_error() || response.status().is_client_error() {
            m.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_metrics_start_at_zero() {
        let snapshot = ApiMetrics::new().snapshot();
        assert_eq!(
            snapshot,
            MetricsSnapshot {
                requests: 0,
                errors: 0,
                issued: 0,
                conflicts: 0
            }
        );
    }

    #[test]
    fn clones_share_counters() {
        let metrics = ApiMetrics::new();
        let clone = metrics.clone();
        clone.record_issued();
        clone.record_issued();
        metrics.record_conflict();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.issued, 2);
        assert_eq!(snapshot.conflicts, 1);
    }
}
