//! Metrics and observability utilities
//!
//! Prometheus counters and histograms for the enrichment and sync
//! operations, with standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

/// Metrics prefix for all back-office metrics
pub const METRICS_PREFIX: &str = "backoffice";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_counter!(
        format!("{}_publishers_enriched_total", METRICS_PREFIX),
        Unit::Count,
        "Publisher saves that ran external enrichment"
    );

    describe_counter!(
        format!("{}_journals_normalized_total", METRICS_PREFIX),
        Unit::Count,
        "Journal saves that ran pricing normalization"
    );

    describe_counter!(
        format!("{}_supportdesk_syncs_total", METRICS_PREFIX),
        Unit::Count,
        "API-key saves pushed to the support desk"
    );

    describe_counter!(
        format!("{}_exempt_pushes_total", METRICS_PREFIX),
        Unit::Count,
        "Rate-limit allow-list pushes to the hosting platform"
    );

    describe_histogram!(
        format!("{}_external_call_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "External API call latency in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Record a publisher enrichment pass
pub fn record_enrichment(resolved_registry_id: bool) {
    counter!(
        format!("{}_publishers_enriched_total", METRICS_PREFIX),
        "resolved_registry_id" => resolved_registry_id.to_string()
    )
    .increment(1);
}

/// Record a journal pricing normalization
pub fn record_normalization(had_usd: bool) {
    counter!(
        format!("{}_journals_normalized_total", METRICS_PREFIX),
        "had_usd" => had_usd.to_string()
    )
    .increment(1);
}

/// Record a support-desk sync outcome
pub fn record_supportdesk_sync(created: bool) {
    counter!(
        format!("{}_supportdesk_syncs_total", METRICS_PREFIX),
        "created" => created.to_string()
    )
    .increment(1);
}

/// Record an allow-list push with the platform's response status
pub fn record_exempt_push(status: u16) {
    counter!(
        format!("{}_exempt_pushes_total", METRICS_PREFIX),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record the latency of one external API call
pub fn record_external_call(service: &str, duration_secs: f64) {
    histogram!(
        format!("{}_external_call_duration_seconds", METRICS_PREFIX),
        "service" => service.to_string()
    )
    .record(duration_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorders_run_without_panic() {
        register_metrics();
        record_enrichment(true);
        record_normalization(false);
        record_supportdesk_sync(true);
        record_exempt_push(200);
        record_external_call("ror", 0.12);
    }
}
