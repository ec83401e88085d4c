//! API route handlers.

use std::time::Instant;

use arnote_core::analytics::{self, AnalyticsOverview, QrDetail, ReminderInfo, Visit};
use arnote_core::qr::payload::qr_payload;
use arnote_core::{
    assemble, detect_schema, layout, normalize, AnimationRates, AnimationState, AvatarConfig,
    AvatarEditor, MeshInstance, QrEditor, QrStylePatch, QrVisualConfig, RecordKey, RecordKind,
    SchemaGeneration, SignLayout, SignStyle,
};
use arnote_renderer::ExportRequest;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::validation::{
    validate_id, validate_image_uri, validate_message, validate_photo, validate_time,
    validate_width,
};
use crate::AppState;

type JsonBody<T> = Result<Json<T>, JsonRejection>;

// ============================================================================
// Avatar
// ============================================================================

/// Scene request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRequest {
    /// Stored avatar record in any schema.
    #[serde(default)]
    pub config: Value,
    /// Attach blink and breathing hooks.
    #[serde(default)]
    pub animated: bool,
    /// Pose the scene at this many seconds.
    #[serde(default)]
    pub time: Option<f32>,
}

/// Scene response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneResponse {
    /// Normalized configuration that was assembled.
    pub config: AvatarConfig,
    /// Whether animation hooks were attached.
    pub animated: bool,
    /// Flattened draw list.
    pub meshes: Vec<MeshInstance>,
}

fn normalize_recorded(value: &Value) -> AvatarConfig {
    let schema = match detect_schema(value) {
        SchemaGeneration::Empty => "empty",
        SchemaGeneration::Legacy => "legacy",
        SchemaGeneration::Extended => "extended",
    };
    metrics::record_normalization(schema);
    normalize(Some(value))
}

/// Normalize any JSON value into a complete avatar.
#[tracing::instrument(name = "normalize_avatar", skip_all)]
pub async fn normalize_avatar(body: JsonBody<Value>) -> ApiResult<Json<AvatarConfig>> {
    let Json(value) = body?;
    Ok(Json(normalize_recorded(&value)))
}

/// Assemble an avatar and return its draw list.
#[tracing::instrument(name = "avatar_scene", skip_all)]
pub async fn avatar_scene(body: JsonBody<SceneRequest>) -> ApiResult<Json<SceneResponse>> {
    let Json(request) = body?;
    let config = normalize_recorded(&request.config);
    let model = assemble(&config, request.animated);
    let meshes = match request.time {
        Some(t) => {
            validate_time(t)?;
            let state = AnimationState::default().advance(t, &AnimationRates::default());
            model.flatten_posed(&state)
        }
        None => model.flatten(),
    };
    tracing::debug!(meshes = meshes.len(), "assembled avatar scene");
    Ok(Json(SceneResponse {
        config,
        animated: request.animated,
        meshes,
    }))
}

/// Generate an avatar from raw photo bytes.
#[tracing::instrument(name = "avatar_from_photo", skip_all, fields(bytes = body.len()))]
pub async fn avatar_from_photo(body: Bytes) -> ApiResult<Json<AvatarConfig>> {
    validate_photo(&body)?;
    let config =
        tokio::task::spawn_blocking(move || arnote_renderer::capture::avatar_from_photo(&body))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(config))
}

/// Load a profile's avatar, normalized.
#[tracing::instrument(name = "get_avatar", skip(state))]
pub async fn get_avatar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AvatarConfig>> {
    validate_id(&id)?;
    let editor = AvatarEditor::open(state.store.as_ref(), RecordKey::avatar(id)?).await?;
    Ok(Json(editor.config().clone()))
}

/// Replace a profile's avatar with the normalized body.
#[tracing::instrument(name = "put_avatar", skip(state, body))]
pub async fn put_avatar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody<Value>,
) -> ApiResult<Json<AvatarConfig>> {
    validate_id(&id)?;
    let Json(value) = body?;
    let mut editor = AvatarEditor::new(RecordKey::avatar(id)?, None);
    editor.replace(normalize_recorded(&value));
    let saved = editor.save(state.store.as_ref()).await;
    metrics::record_store_write(RecordKind::Avatar.as_str(), saved.is_ok());
    saved?;
    Ok(Json(editor.config().clone()))
}

// ============================================================================
// QR styling
// ============================================================================

/// QR payload response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct PayloadResponse {
    /// URL encoded into the QR.
    pub payload: String,
}

/// Export request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportBody {
    /// Style to render; the stored style when absent.
    pub config: Option<Value>,
    /// Background image as a data URI.
    pub base_image: Option<String>,
    /// Center logo as a data URI.
    pub center_logo: Option<String>,
    /// Reminder title used for the download filename.
    pub title: Option<String>,
}

/// Load a reminder's QR style merged over the defaults.
#[tracing::instrument(name = "get_qr_style", skip(state))]
pub async fn get_qr_style(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<QrVisualConfig>> {
    validate_id(&id)?;
    let key = RecordKey::qr_style(id.clone())?;
    let editor = QrEditor::open(state.store.as_ref(), key, id, state.config.canvas, None).await?;
    Ok(Json(editor.config().clone()))
}

/// Apply a partial style update and save it.
#[tracing::instrument(name = "put_qr_style", skip(state, body))]
pub async fn put_qr_style(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody<QrStylePatch>,
) -> ApiResult<Json<QrVisualConfig>> {
    validate_id(&id)?;
    let Json(patch) = body?;
    validate_image_uri(patch.base_image_url.as_deref())?;
    let key = RecordKey::qr_style(id.clone())?;
    let mut editor =
        QrEditor::open(state.store.as_ref(), key, id, state.config.canvas, None).await?;
    editor.update(patch);
    let saved = editor.save(state.store.as_ref()).await;
    metrics::record_store_write(RecordKind::QrStyle.as_str(), saved.is_ok());
    saved?;
    Ok(Json(editor.config().clone()))
}

/// URL a reminder's QR encodes.
#[tracing::instrument(name = "qr_payload", skip(state))]
pub async fn get_qr_payload(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PayloadResponse>> {
    validate_id(&id)?;
    Ok(Json(PayloadResponse {
        payload: qr_payload(&state.config.public_origin, &id),
    }))
}

/// Render the styled QR over its background as a PNG download.
#[tracing::instrument(name = "qr_export", skip(state, body))]
pub async fn qr_export(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody<ExportBody>,
) -> ApiResult<impl IntoResponse> {
    validate_id(&id)?;
    let Json(request) = body?;
    validate_image_uri(request.base_image.as_deref())?;
    validate_image_uri(request.center_logo.as_deref())?;

    let key = RecordKey::qr_style(id.clone())?;
    let title = request.title.unwrap_or_else(|| id.clone());
    let canvas = state.config.canvas;
    let mut editor = match &request.config {
        Some(stored) => QrEditor::new(key, title, Some(stored), canvas, None),
        None => QrEditor::open(state.store.as_ref(), key, title, canvas, None).await?,
    };
    if request.center_logo.is_some() {
        editor.set_center_logo(request.center_logo);
    }

    let config = editor.config().clone();
    let logo = editor.center_logo().map(str::to_string);
    let filename = editor.download_filename();
    let payload = qr_payload(&state.config.public_origin, &id);
    let base = request.base_image;
    let exporter = state.exporter;

    let started = Instant::now();
    let result = tokio::task::spawn_blocking(move || {
        let export = ExportRequest {
            payload: &payload,
            config: &config,
            base_image: base.as_deref(),
            center_logo: logo.as_deref(),
        };
        exporter.export(&export)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;
    metrics::record_export(result.is_ok(), started.elapsed().as_secs_f64());
    let png = result?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        png,
    ))
}

fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && *c != '"' && *c != '\\')
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

// ============================================================================
// Sign
// ============================================================================

/// Sign layout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    /// Reminder message, lines separated by `\n`.
    pub message: String,
    /// Override for the widest text block.
    #[serde(default)]
    pub max_width: Option<f32>,
}

/// Compute sign dimensions for a message.
#[tracing::instrument(name = "sign_layout", skip_all)]
pub async fn sign_layout(body: JsonBody<SignRequest>) -> ApiResult<Json<SignLayout>> {
    let Json(request) = body?;
    validate_message(&request.message)?;
    let mut style = SignStyle::default();
    if let Some(width) = request.max_width {
        validate_width(width)?;
        style.max_width = width;
    }
    Ok(Json(layout(&request.message, &style)))
}

// ============================================================================
// Analytics
// ============================================================================

/// Overview request body.
#[derive(Debug, Deserialize)]
pub struct OverviewRequest {
    /// Visit rows.
    #[serde(default)]
    pub visits: Vec<Visit>,
    /// Reminder rows.
    #[serde(default)]
    pub reminders: Vec<ReminderInfo>,
    /// Reference instant; the current time when absent.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Detail request body.
#[derive(Debug, Deserialize)]
pub struct DetailRequest {
    /// Visit rows.
    #[serde(default)]
    pub visits: Vec<Visit>,
    /// Reference instant; the current time when absent.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Aggregate visits across every reminder.
#[tracing::instrument(name = "analytics_overview", skip_all)]
pub async fn analytics_overview(
    body: JsonBody<OverviewRequest>,
) -> ApiResult<Json<AnalyticsOverview>> {
    let Json(request) = body?;
    let now = request.now.unwrap_or_else(Utc::now);
    Ok(Json(analytics::overview(
        &request.visits,
        &request.reminders,
        now,
    )))
}

/// Aggregate visits for one reminder.
#[tracing::instrument(name = "analytics_detail", skip(body))]
pub async fn analytics_detail(
    Path(reminder_id): Path<String>,
    body: JsonBody<DetailRequest>,
) -> ApiResult<Json<QrDetail>> {
    validate_id(&reminder_id)?;
    let Json(request) = body?;
    let now = request.now.unwrap_or_else(Utc::now);
    Ok(Json(analytics::detail(&reminder_id, &request.visits, now)))
}
