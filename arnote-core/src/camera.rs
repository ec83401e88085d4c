//! Camera acquisition state for AR and photo capture sessions.
//!
//! Acquisition happens once per session. A failure is terminal for that
//! session: further readiness reports are ignored until the user explicitly
//! calls [`CameraSession::retry`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the camera could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CameraError {
    /// The user or platform refused access.
    #[error("Camera permission denied. Please allow camera access.")]
    PermissionDenied,

    /// The device has no camera.
    #[error("No camera found on this device.")]
    NotFound,

    /// Any other acquisition failure.
    #[error("Could not access the camera: {0}. Please try again.")]
    Unavailable(String),
}

impl CameraError {
    /// Classify a platform error name (`NotAllowedError`, `NotFoundError`,
    /// ...).
    #[must_use]
    pub fn from_error_name(name: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" => Self::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" => Self::NotFound,
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Which camera to prefer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera.
    User,
    /// Rear camera.
    #[default]
    Environment,
}

impl FacingMode {
    /// The other camera.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::User => Self::Environment,
            Self::Environment => Self::User,
        }
    }
}

/// Requested stream constraints; sizes are hints, not requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConstraints {
    /// Preferred camera.
    pub facing_mode: FacingMode,
    /// Ideal width in pixels.
    pub ideal_width: u32,
    /// Ideal height in pixels.
    pub ideal_height: u32,
}

impl VideoConstraints {
    /// Rear camera, landscape full HD.
    #[must_use]
    pub fn ar_viewer() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            ideal_width: 1920,
            ideal_height: 1080,
        }
    }

    /// Front camera, portrait, for avatar photo capture.
    #[must_use]
    pub fn photo_capture() -> Self {
        Self {
            facing_mode: FacingMode::User,
            ideal_width: 720,
            ideal_height: 960,
        }
    }

    /// Same constraints with the other camera.
    #[must_use]
    pub fn with_toggled_facing(self) -> Self {
        Self {
            facing_mode: self.facing_mode.toggled(),
            ..self
        }
    }
}

/// Acquisition state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum CameraState {
    /// Waiting for the platform.
    Requesting,
    /// Stream live.
    Ready,
    /// Terminal until retried.
    Failed(CameraError),
}

/// One camera acquisition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSession {
    constraints: VideoConstraints,
    state: CameraState,
    attempts: u32,
}

impl CameraSession {
    /// Start requesting a stream.
    #[must_use]
    pub fn new(constraints: VideoConstraints) -> Self {
        Self {
            constraints,
            state: CameraState::Requesting,
            attempts: 1,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Requested constraints.
    #[must_use]
    pub fn constraints(&self) -> VideoConstraints {
        self.constraints
    }

    /// Number of acquisition attempts, including the first.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether the stream is live.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == CameraState::Ready
    }

    /// User-facing message when failed.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            CameraState::Failed(e) => Some(e.to_string()),
            _ => None,
        }
    }

    /// Platform reported a live stream. Ignored after a failure.
    pub fn on_ready(&mut self) {
        if self.state == CameraState::Requesting {
            self.state = CameraState::Ready;
        } else {
            tracing::debug!(state = ?self.state, "ignoring late camera ready");
        }
    }

    /// Platform reported an error. The session stays failed until retried.
    pub fn on_error(&mut self, error: CameraError) {
        tracing::warn!(%error, "camera acquisition failed");
        self.state = CameraState::Failed(error);
    }

    /// Switch camera; restarts acquisition unless failed.
    pub fn toggle_facing(&mut self) {
        self.constraints = self.constraints.with_toggled_facing();
        if self.state == CameraState::Ready {
            self.state = CameraState::Requesting;
        }
    }

    /// Explicit user retry: request the stream again.
    pub fn retry(&mut self) {
        self.attempts += 1;
        self.state = CameraState::Requesting;
    }
}
