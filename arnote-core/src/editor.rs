//! Editing sessions for stored configuration records.
//!
//! Each session owns its configuration and replaces it wholesale on every
//! edit. A failed save leaves both the configuration and the unsaved flag as
//! they were so the user can retry.

use serde_json::Value;

use crate::assembler::{assemble_with, AssembleOptions, AvatarModel};
use crate::avatar::{normalize, AvatarConfig, AvatarPatch};
use crate::error::StoreResult;
use crate::event::InputEvent;
use crate::lifecycle::ReleaseHub;
use crate::qr::compositor::QrCompositor;
use crate::qr::layers::{plan_export, Layer};
use crate::qr::payload::download_filename;
use crate::qr::{CanvasSize, Position, QrStylePatch, QrVisualConfig, StylePreset};
use crate::spatial::Camera;
use crate::store::{ConfigStore, RecordKey};

/// Editing session for one reminder's QR styling.
#[derive(Debug)]
pub struct QrEditor {
    key: RecordKey,
    title: String,
    config: QrVisualConfig,
    center_logo: Option<String>,
    compositor: QrCompositor,
    unsaved: bool,
}

impl QrEditor {
    /// Start a session from a stored style (or none).
    ///
    /// The compositor subscribes to `hub` when given, so a release anywhere
    /// in the window ends a drag.
    #[must_use]
    pub fn new(
        key: RecordKey,
        title: impl Into<String>,
        stored: Option<&Value>,
        canvas: CanvasSize,
        hub: Option<&ReleaseHub>,
    ) -> Self {
        let compositor = match hub {
            Some(hub) => QrCompositor::attached(canvas, hub),
            None => QrCompositor::new(canvas),
        };
        Self {
            key,
            title: title.into(),
            config: QrVisualConfig::from_stored(stored),
            center_logo: None,
            compositor,
            unsaved: false,
        }
    }

    /// Load the stored style and start a session.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the record cannot be read.
    pub async fn open(
        store: &dyn ConfigStore,
        key: RecordKey,
        title: impl Into<String>,
        canvas: CanvasSize,
        hub: Option<&ReleaseHub>,
    ) -> StoreResult<Self> {
        let stored = store.load(&key).await?;
        Ok(Self::new(key, title, stored.as_ref(), canvas, hub))
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &QrVisualConfig {
        &self.config
    }

    /// Center logo image, if one is set.
    #[must_use]
    pub fn center_logo(&self) -> Option<&str> {
        self.center_logo.as_deref()
    }

    /// Whether edits have been made since the last successful save.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.compositor.is_dragging()
    }

    /// Apply a partial update from the controls.
    pub fn update(&mut self, patch: QrStylePatch) {
        self.config = self.config.apply(patch);
        self.unsaved = true;
    }

    /// Apply a color preset.
    pub fn apply_preset(&mut self, preset: &StylePreset) {
        let mut next = self.config.clone();
        next.set_preset(preset);
        self.config = next;
        self.unsaved = true;
    }

    /// Move the QR directly.
    pub fn set_position(&mut self, position: Position) {
        self.update(QrStylePatch {
            position: Some(position),
            ..QrStylePatch::default()
        });
    }

    /// Feed canvas input to the drag compositor.
    pub fn handle_input(&mut self, event: &InputEvent) {
        if let Some(position) = self.compositor.handle_input(&self.config, event) {
            self.set_position(position);
        }
    }

    /// Use an uploaded image (data URI) as the background.
    pub fn set_base_image(&mut self, data_uri: impl Into<String>) {
        self.update(QrStylePatch {
            base_image_url: Some(data_uri.into()),
            ..QrStylePatch::default()
        });
    }

    /// Set or clear the center logo image.
    pub fn set_center_logo(&mut self, data_uri: Option<String>) {
        self.center_logo = data_uri;
        self.unsaved = true;
    }

    /// Back to defaults with no background or logo.
    pub fn reset(&mut self) {
        self.config = QrVisualConfig::default();
        self.center_logo = None;
        self.compositor.release();
        self.unsaved = true;
    }

    /// Layers the exporter should draw.
    #[must_use]
    pub fn export_plan(&self, has_base_image: bool) -> Vec<Layer> {
        plan_export(&self.config, self.compositor.canvas(), has_base_image, true)
    }

    /// Filename for the exported image.
    #[must_use]
    pub fn download_filename(&self) -> String {
        download_filename(&self.title)
    }

    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns the store's error; the session keeps its edits and stays
    /// unsaved.
    pub async fn save(&mut self, store: &dyn ConfigStore) -> StoreResult<()> {
        let value = serde_json::to_value(&self.config)?;
        match store.save(&self.key, value).await {
            Ok(()) => {
                self.unsaved = false;
                tracing::info!(key = %self.key, "saved qr style");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "qr style save failed");
                Err(e)
            }
        }
    }
}

/// Editing session for one profile's avatar.
#[derive(Debug, Clone)]
pub struct AvatarEditor {
    key: RecordKey,
    config: AvatarConfig,
    unsaved: bool,
}

impl AvatarEditor {
    /// Start a session from a stored record (or none), normalizing it.
    #[must_use]
    pub fn new(key: RecordKey, stored: Option<&Value>) -> Self {
        Self {
            key,
            config: normalize(stored),
            unsaved: false,
        }
    }

    /// Load the stored record and start a session.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the record cannot be read.
    pub async fn open(store: &dyn ConfigStore, key: RecordKey) -> StoreResult<Self> {
        let stored = store.load(&key).await?;
        Ok(Self::new(key, stored.as_ref()))
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }

    /// Whether edits have been made since the last successful save.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Apply a partial update.
    pub fn update(&mut self, patch: AvatarPatch) {
        self.config = self.config.apply(patch);
        self.unsaved = true;
    }

    /// Replace the whole configuration, e.g. with one generated from a photo.
    pub fn replace(&mut self, config: AvatarConfig) {
        self.config = config;
        self.unsaved = true;
    }

    /// Back to the default avatar.
    pub fn reset(&mut self) {
        self.replace(AvatarConfig::default());
    }

    /// Animated, idly rotating preview of the current configuration.
    #[must_use]
    pub fn preview(&self) -> AvatarModel {
        assemble_with(
            &self.config,
            AssembleOptions {
                animated: true,
                idle_rotation: true,
            },
        )
    }

    /// Camera framing the preview.
    #[must_use]
    pub fn preview_camera() -> Camera {
        Camera::avatar_preview()
    }

    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns the store's error; the session keeps its edits and stays
    /// unsaved.
    pub async fn save(&mut self, store: &dyn ConfigStore) -> StoreResult<()> {
        let value = serde_json::to_value(&self.config)?;
        store.save(&self.key, value).await.inspect_err(|e| {
            tracing::warn!(key = %self.key, error = %e, "avatar save failed");
        })?;
        self.unsaved = false;
        tracing::info!(key = %self.key, "saved avatar");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::event::PointerPhase;
    use crate::mesh::Part;
    use crate::qr::STYLE_PRESETS;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;

    struct RejectingStore;

    #[async_trait]
    impl ConfigStore for RejectingStore {
        async fn load(&self, _key: &RecordKey) -> StoreResult<Option<Value>> {
            Ok(None)
        }

        async fn save(&self, _key: &RecordKey, _value: Value) -> StoreResult<()> {
            Err(StoreError::Rejected("row level security".into()))
        }
    }

    fn qr_key() -> RecordKey {
        RecordKey::qr_style("rem-1").expect("key")
    }

    // ========================================================================
    // QrEditor
    // ========================================================================

    #[test]
    fn test_qr_editor_tracks_unsaved() {
        let mut editor = QrEditor::new(qr_key(), "Water Plants", None, CanvasSize::default(), None);
        assert!(!editor.has_unsaved_changes());
        editor.update(QrStylePatch {
            rotation: Some(45.0),
            ..QrStylePatch::default()
        });
        assert!(editor.has_unsaved_changes());
        assert!((editor.config().rotation - 45.0).abs() < f32::EPSILON);
        assert_eq!(editor.download_filename(), "qr-water-plants.png");
    }

    #[test]
    fn test_qr_editor_drag_updates_position() {
        let mut editor = QrEditor::new(qr_key(), "t", None, CanvasSize::default(), None);
        editor.handle_input(&InputEvent::pointer(PointerPhase::Down, 100.0, 100.0));
        assert!(!editor.has_unsaved_changes());
        editor.handle_input(&InputEvent::pointer(PointerPhase::Move, 150.0, 120.0));
        assert_eq!(editor.config().position, Position::new(100.0, 70.0));
        assert!(editor.has_unsaved_changes());
    }

    #[test]
    fn test_qr_editor_reset() {
        let stored = json!({"foreground": "#000000", "baseImageUrl": "data:image/png;base64,AA"});
        let mut editor = QrEditor::new(qr_key(), "t", Some(&stored), CanvasSize::default(), None);
        editor.set_center_logo(Some("data:image/png;base64,BB".into()));
        editor.apply_preset(&STYLE_PRESETS[1]);
        editor.reset();
        assert_eq!(editor.config(), &QrVisualConfig::default());
        assert_eq!(editor.center_logo(), None);
        assert!(editor.has_unsaved_changes());
    }

    #[test]
    fn test_qr_editor_window_release() {
        let hub = ReleaseHub::new();
        let mut editor = QrEditor::new(qr_key(), "t", None, CanvasSize::default(), Some(&hub));
        editor.handle_input(&InputEvent::pointer(PointerPhase::Down, 60.0, 60.0));
        assert!(editor.is_dragging());
        hub.dispatch_release();
        assert!(!editor.is_dragging());
        drop(editor);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_qr_editor_save_and_reopen() {
        let store = MemoryStore::new();
        let mut editor = QrEditor::open(&store, qr_key(), "t", CanvasSize::default(), None)
            .await
            .expect("open");
        editor.update(QrStylePatch {
            size: Some(220.0),
            ..QrStylePatch::default()
        });
        editor.save(&store).await.expect("save");
        assert!(!editor.has_unsaved_changes());

        let reopened = QrEditor::open(&store, qr_key(), "t", CanvasSize::default(), None)
            .await
            .expect("reopen");
        assert!((reopened.config().size - 220.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_qr_editor_failed_save_keeps_edits() {
        let mut editor = QrEditor::new(qr_key(), "t", None, CanvasSize::default(), None);
        editor.update(QrStylePatch {
            foreground: Some("#123456".into()),
            ..QrStylePatch::default()
        });
        let before = editor.config().clone();
        let err = editor.save(&RejectingStore).await.expect_err("rejected");
        assert!(matches!(err, StoreError::Rejected(_)));
        assert_eq!(editor.config(), &before);
        assert!(editor.has_unsaved_changes());
    }

    // ========================================================================
    // AvatarEditor
    // ========================================================================

    #[tokio::test]
    async fn test_avatar_editor_round_trip() {
        let store = MemoryStore::new();
        let key = RecordKey::avatar("profile-1").expect("key");
        store
            .save(&key, json!({"skinColor": "#8d5524", "hairStyle": "curly", "hasGlasses": true}))
            .await
            .expect("seed legacy record");

        let mut editor = AvatarEditor::open(&store, key.clone()).await.expect("open");
        assert_eq!(editor.config().skin_color, "#8d5524");
        assert!(editor.config().has_glasses);

        editor.update(AvatarPatch {
            has_hat: Some(true),
            hat_style: Some(crate::avatar::HatStyle::Beanie),
            ..AvatarPatch::default()
        });
        editor.save(&store).await.expect("save");

        let stored = store.load(&key).await.expect("load").expect("present");
        assert_eq!(stored["hatStyle"], "beanie");
        assert_eq!(stored["bodyStyle"], "average");
    }

    #[tokio::test]
    async fn test_avatar_editor_failed_save_keeps_edits() {
        let key = RecordKey::avatar("p").expect("key");
        let mut editor = AvatarEditor::new(key, None);
        editor.reset();
        assert!(editor.save(&RejectingStore).await.is_err());
        assert!(editor.has_unsaved_changes());
    }

    #[test]
    fn test_avatar_preview_rotates() {
        let editor = AvatarEditor::new(RecordKey::avatar("p").expect("key"), None);
        let model = editor.preview();
        assert!(model.animated);
        assert!(model.contains_part(Part::Head));
        assert_eq!(
            model.root.anim,
            Some(crate::animation::AnimationTarget::IdleRotation)
        );
    }
}
