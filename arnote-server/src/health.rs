//! Liveness and readiness.
//!
//! Liveness only says the process answers. Readiness asks the config store
//! whether avatar and QR style records can be persisted right now; while it
//! cannot, saves through the store-backed routes fail with 503, so the probe
//! answers 503 too. Render-only routes (normalize, scene, export with an
//! inline style) keep working regardless.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Readiness report.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// `healthy` when every check passed.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Per-dependency results.
    pub checks: HealthChecks,
}

/// Per-dependency results.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// [`ConfigStore::is_available`](arnote_core::ConfigStore::is_available)
    /// answered true.
    pub config_store: bool,
}

/// Always 200 once the router is serving.
#[tracing::instrument(name = "liveness_probe")]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// 200 with the report while the store is available, 503 otherwise.
#[tracing::instrument(name = "readiness_probe", skip(state))]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let store_ok = state.store.is_available().await;
    if !store_ok {
        tracing::warn!("config store unavailable, reporting not ready");
    }

    let status = HealthStatus {
        status: if store_ok { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            config_store: store_ok,
        },
    };

    let code = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(status))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arnote_core::MemoryStore;

    use super::*;
    use crate::ServerConfig;

    fn state_with(store: MemoryStore) -> AppState {
        AppState::new(ServerConfig::default(), Arc::new(store))
    }

    #[tokio::test]
    async fn test_memory_store_is_ready() {
        let (code, Json(report)) = readiness(State(state_with(MemoryStore::new()))).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(report.status, "healthy");
        assert!(report.checks.config_store);
    }

    #[tokio::test]
    async fn test_missing_data_dir_is_not_ready() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MemoryStore::with_data_dir(dir.path().join("records")).expect("store");
        drop(dir);

        let (code, Json(report)) = readiness(State(state_with(store))).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.status, "unhealthy");
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["checks"]["config_store"], false);
    }
}
