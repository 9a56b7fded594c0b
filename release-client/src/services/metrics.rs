use metrics::{counter, histogram};
use std::time::Duration;

/// Count one API call and record its latency.
///
/// `outcome` is `ok`, `not_ok`, or the kind of transport error.
pub fn record_request(operation: &str, outcome: &str, elapsed: Duration) {
    let labels = [
        ("operation", operation.to_string()),
        ("outcome", outcome.to_string()),
    ];

    counter!("release_client_requests_total", &labels).increment(1);
    histogram!("release_client_request_duration_seconds", &labels).record(elapsed.as_secs_f64());
}
