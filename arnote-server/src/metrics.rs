//! Prometheus metrics for arnote-server.
//!
//! Provides metrics collection and a Prometheus-compatible `/metrics` endpoint.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

const EXPORTS_TOTAL: &str = "arnote_qr_exports_total";
const EXPORT_DURATION: &str = "arnote_qr_export_duration_seconds";
const NORMALIZATIONS_TOTAL: &str = "arnote_avatar_normalizations_total";
const STORE_WRITES_TOTAL: &str = "arnote_store_writes_total";
const VALIDATION_FAILURES_TOTAL: &str = "arnote_validation_failures_total";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record a QR export.
///
/// # Arguments
///
/// * `success` - Whether a PNG was produced
/// * `duration_secs` - Time spent rendering
pub fn record_export(success: bool, duration_secs: f64) {
    counter!(EXPORTS_TOTAL, "success" => success.to_string()).increment(1);
    histogram!(EXPORT_DURATION).record(duration_secs);
}

/// Record an avatar normalization.
///
/// # Arguments
///
/// * `schema` - Detected input schema (empty, legacy, extended)
pub fn record_normalization(schema: &str) {
    counter!(NORMALIZATIONS_TOTAL, "schema" => schema.to_string()).increment(1);
}

/// Record a config store write.
///
/// # Arguments
///
/// * `kind` - Record kind ("avatar" or "qr-style")
/// * `success` - Whether the store accepted the write
pub fn record_store_write(kind: &str, success: bool) {
    counter!(
        STORE_WRITES_TOTAL,
        "kind" => kind.to_string(),
        "success" => success.to_string()
    )
    .increment(1);
}

/// Record an input validation failure.
///
/// # Arguments
///
/// * `validation_type` - Type of validation that failed (id, message, photo, etc.)
pub fn record_validation_failure(validation_type: &str) {
    counter!(
        VALIDATION_FAILURES_TOTAL,
        "type" => validation_type.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_export(true, 0.01);
        record_normalization("legacy");
        record_store_write("avatar", false);
        record_validation_failure("id");
    }
}
