//! Metrics collection module for the load matching service
//!
//! This module provides functionality for collecting and exposing service
//! metrics using Prometheus.

use lazy_static::lazy_static;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use std::time::Instant;

lazy_static! {
    /// Global Prometheus registry instance
    pub static ref REGISTRY_INSTANCE: Registry = Registry::new();

    /// Counter for tracking request counts by endpoint
    pub static ref REQ_COUNTER_VEC: CounterVec = CounterVec::new(
        Opts::new("request_counter", "request counter"),
        &["endpoint"]
    )
    .unwrap();

    /// Histogram for tracking endpoint execution times
    pub static ref ENDPOINT_HISTOGRAM_VEC: HistogramVec = HistogramVec::new(
        HistogramOpts::new("endpoint_cost", "endpoint cost"),
        &["endpoint"]
    )
    .unwrap();

    /// Counter for load search outcomes by status token
    pub static ref SEARCH_OUTCOME_VEC: CounterVec = CounterVec::new(
        Opts::new("search_outcome_counter", "load search outcomes"),
        &["status"]
    )
    .unwrap();
}

/// Initializes the metrics registry
///
/// Registers all metric collectors with the global registry
pub fn init_registry() {
    let _ = REGISTRY_INSTANCE.register(Box::new(REQ_COUNTER_VEC.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(ENDPOINT_HISTOGRAM_VEC.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(SEARCH_OUTCOME_VEC.clone()));
}

/// Counts one load search decision by its status token.
pub fn observe_outcome(status: &str) {
    SEARCH_OUTCOME_VEC.with_label_values(&[status]).inc();
}

/// Records metrics for an async endpoint handler
///
/// This function:
/// 1. Records the start time
/// 2. Increments the request counter
/// 3. Executes the provided handler
/// 4. Records the execution time
pub async fn record_metrics<F, Fut, T, E>(endpoint: &'static str, handler: F) -> Result<T, E>
where
    F: FnOnce() -> Fut + Send,
    Fut: std::future::Future<Output = Result<T, E>> + Send,
{
    let start = Instant::now();
    REQ_COUNTER_VEC.with_label_values(&[endpoint]).inc();
    let result = handler().await;

    let elapsed = start.elapsed();
    ENDPOINT_HISTOGRAM_VEC
        .with_label_values(&[endpoint])
        .observe(elapsed.as_secs_f64());

    result
}
