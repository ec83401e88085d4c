//! # Arnote Server Library
//!
//! HTTP surface for avatar normalization, scene assembly, QR styling and
//! export, and scan analytics. Used by the `arnote` binary and by the
//! integration tests.

use std::sync::Arc;

use arnote_core::{ConfigStore, MemoryStore, StoreResult};
use arnote_renderer::QrExporter;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod routes;
pub mod validation;

pub use config::{LogFormat, ServerArgs, ServerConfig};
pub use error::{ApiError, ApiResult};

/// Largest accepted request body (photos and data URIs).
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Avatar and QR style records.
    pub store: Arc<dyn ConfigStore>,
    /// Resolved configuration.
    pub config: Arc<ServerConfig>,
    /// Composite exporter sized to the configured canvas.
    pub exporter: QrExporter,
}

impl AppState {
    /// State over an explicit store.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn ConfigStore>) -> Self {
        let exporter = QrExporter::new(config.canvas);
        Self {
            store,
            config: Arc::new(config),
            exporter,
        }
    }

    /// State with a [`MemoryStore`], persisted when `config.data_dir` is set.
    ///
    /// # Errors
    ///
    /// Returns the store error if the data directory cannot be opened.
    pub fn from_config(config: ServerConfig) -> StoreResult<Self> {
        let store = match &config.data_dir {
            Some(dir) => MemoryStore::with_data_dir(dir)?,
            None => MemoryStore::new(),
        };
        Ok(Self::new(config, Arc::new(store)))
    }
}

/// Build a CORS layer that only allows localhost origins.
fn build_cors_layer(port: u16) -> CorsLayer {
    let localhost_origins = [
        format!("http://localhost:{port}"),
        format!("http://127.0.0.1:{port}"),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(), // Vite
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ];

    let origins: Vec<HeaderValue> = localhost_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Build the application router.
///
/// `/metrics` is only mounted when a Prometheus handle is given.
#[must_use]
pub fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let port = state.config.addr.port();

    let api = Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::readiness))
        .route("/api/avatar/normalize", post(routes::normalize_avatar))
        .route("/api/avatar/scene", post(routes::avatar_scene))
        .route("/api/avatar/from-photo", post(routes::avatar_from_photo))
        .route(
            "/api/profiles/{id}/avatar",
            get(routes::get_avatar).put(routes::put_avatar),
        )
        .route(
            "/api/reminders/{id}/qr-style",
            get(routes::get_qr_style).put(routes::put_qr_style),
        )
        .route("/api/reminders/{id}/qr-payload", get(routes::get_qr_payload))
        .route("/api/reminders/{id}/qr-export", post(routes::qr_export))
        .route("/api/sign/layout", post(routes::sign_layout))
        .route("/api/analytics/overview", post(routes::analytics_overview))
        .route("/api/analytics/{id}", post(routes::analytics_detail))
        .with_state(state);

    let app = match metrics_handle {
        Some(handle) => api.merge(
            Router::new()
                .route("/metrics", get(metrics_handler))
                .with_state(handle),
        ),
        None => api,
    };

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Request ID for distributed tracing correlation
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(build_cors_layer(port))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Prometheus metrics endpoint.
#[tracing::instrument(name = "metrics", skip(handle))]
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
