//! Notification dispatch metrics
//!
//! Thin wrappers over the `metrics` facade; no-ops until a recorder is installed.

use metrics::counter;

/// Record the outcome of one downstream send
pub fn record_send(service: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "notify_conditional_sends_total",
        "service" => service.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a target skipped by its conditions
pub fn record_target_excluded(service: &str) {
    counter!(
        "notify_conditional_targets_excluded_total",
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record a target disabled at load time
pub fn record_invalid_target(service: &str) {
    counter!(
        "notify_conditional_invalid_targets_total",
        "service" => service.to_string()
    )
    .increment(1);
}
