use std::future::Future;
use std::time::Instant;

use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder};
use service::errors::ServiceError;

// Prometheus metrics (default registry)
pub static DOG_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "kennel_dog_requests_total",
        "Roster requests by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("register dog_requests_total")
});

pub static DOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "kennel_dog_request_duration_seconds",
        "Roster request duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("register dog_request_duration")
});

fn outcome_of(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::NotFound { .. } => "not_found",
        ServiceError::Validation(_) => "invalid",
        ServiceError::Service { .. } => "error",
    }
}

/// Count a request turned away before it reached the service.
pub fn record_rejected(operation: &'static str) {
    DOG_REQUESTS_TOTAL.with_label_values(&[operation, "rejected"]).inc();
}

/// Run a service call, recording its outcome and duration under `operation`.
pub async fn observe<T, F>(operation: &'static str, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    let started = Instant::now();
    let result = call.await;
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => outcome_of(e),
    };
    DOG_REQUESTS_TOTAL.with_label_values(&[operation, outcome]).inc();
    DOG_REQUEST_DURATION
        .with_label_values(&[operation])
        .observe(started.elapsed().as_secs_f64());
    result
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
