//! QR visual configuration and editing.
//!
//! The visual skin (colors, placement, rotation, opacity, logo) is kept apart
//! from the encoded payload: nothing in [`QrVisualConfig`] feeds into
//! [`payload::qr_payload`].

pub mod compositor;
pub mod layers;
pub mod payload;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default foreground color.
pub const DEFAULT_FOREGROUND: &str = "#7c3aed";
/// Default background color.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
/// Logo side as a percentage of the QR side when none is configured.
pub const DEFAULT_LOGO_PERCENT: f32 = 25.0;
/// Largest logo side as a percentage of the QR side. Keeps the cleared
/// modules within what level H can recover.
pub const MAX_LOGO_PERCENT: f32 = 30.0;

/// Size control range in pixels.
pub const SIZE_RANGE: (f32, f32) = (50.0, 300.0);
/// Size control step.
pub const SIZE_STEP: f32 = 5.0;
/// Opacity control range in percent.
pub const OPACITY_PERCENT_RANGE: (f32, f32) = (10.0, 100.0);
/// Opacity control step in percent.
pub const OPACITY_PERCENT_STEP: f32 = 5.0;
/// Rotation control range in degrees.
pub const ROTATION_RANGE: (f32, f32) = (0.0, 360.0);
/// Rotation control step.
pub const ROTATION_STEP: f32 = 5.0;

/// Top-left corner of the QR square in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// Fixed dimensions of the compositing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
        }
    }
}

impl CanvasSize {
    /// Create a canvas size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest allowed top-left coordinate for a square of side `size`.
    ///
    /// Pinned to zero when the square is larger than the canvas.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn max_origin(&self, size: f32) -> Position {
        Position {
            x: (self.width as f32 - size).max(0.0),
            y: (self.height as f32 - size).max(0.0),
        }
    }
}

/// QR error-correction level used when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    /// Roughly 15% recovery.
    Medium,
    /// Roughly 30% recovery; needed when a logo covers modules.
    High,
}

impl ErrorCorrection {
    /// Level for a code with or without a center logo.
    #[must_use]
    pub fn for_logo(has_logo: bool) -> Self {
        if has_logo {
            Self::High
        } else {
            Self::Medium
        }
    }
}

/// How a QR code is styled and placed over a background image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrVisualConfig {
    /// Dark module color.
    pub foreground: String,
    /// Light module color.
    pub background: String,
    /// Top-left corner on the canvas.
    pub position: Position,
    /// Side length in pixels.
    pub size: f32,
    /// Clockwise rotation about the QR center, in degrees.
    pub rotation: f32,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f32,
    /// Background image, usually a data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image_url: Option<String>,
    /// Center logo side as a percentage of `size`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_logo_size: Option<f32>,
}

impl Default for QrVisualConfig {
    fn default() -> Self {
        Self {
            foreground: DEFAULT_FOREGROUND.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            position: Position::default(),
            size: 150.0,
            rotation: 0.0,
            opacity: 1.0,
            base_image_url: None,
            center_logo_size: None,
        }
    }
}

impl QrVisualConfig {
    /// Merge a stored style over the defaults.
    ///
    /// Each field is taken only when present and well typed. Blank color
    /// strings fall back to the default colors. Numeric fields are clamped
    /// to their control ranges, so a stored record can never ask for a
    /// larger symbol than the size control allows.
    #[must_use]
    pub fn from_stored(stored: Option<&Value>) -> Self {
        let defaults = Self::default();
        let Some(Value::Object(map)) = stored else {
            return defaults;
        };
        Self {
            foreground: color_field(map, "foreground", defaults.foreground),
            background: color_field(map, "background", defaults.background),
            position: position_field(map).unwrap_or(defaults.position),
            size: number_field(map, "size")
                .map_or(defaults.size, |v| v.clamp(SIZE_RANGE.0, SIZE_RANGE.1)),
            rotation: number_field(map, "rotation")
                .map_or(defaults.rotation, |v| v.clamp(ROTATION_RANGE.0, ROTATION_RANGE.1)),
            opacity: number_field(map, "opacity").map_or(defaults.opacity, |v| v.clamp(0.0, 1.0)),
            base_image_url: map
                .get("baseImageUrl")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            center_logo_size: number_field(map, "centerLogoSize").and_then(logo_percent),
        }
    }

    /// Apply a partial update, producing a new value.
    #[must_use]
    pub fn apply(&self, patch: QrStylePatch) -> Self {
        let mut next = self.clone();
        if let Some(v) = patch.foreground {
            next.foreground = v;
        }
        if let Some(v) = patch.background {
            next.background = v;
        }
        if let Some(v) = patch.position {
            next.position = v;
        }
        if let Some(v) = patch.size {
            next.set_size(v);
        }
        if let Some(v) = patch.rotation {
            next.set_rotation(v);
        }
        if let Some(v) = patch.opacity {
            next.set_opacity_percent(v * 100.0);
        }
        if let Some(v) = patch.base_image_url {
            next.base_image_url = Some(v);
        }
        if let Some(v) = patch.center_logo_size.and_then(logo_percent) {
            next.center_logo_size = Some(v);
        }
        next
    }

    /// Set the size from the size control. Position is not re-clamped.
    pub fn set_size(&mut self, size: f32) {
        if let Some(v) = snap(size, SIZE_RANGE, SIZE_STEP) {
            self.size = v;
        }
    }

    /// Set the opacity from the percentage control.
    pub fn set_opacity_percent(&mut self, percent: f32) {
        if let Some(v) = snap(percent, OPACITY_PERCENT_RANGE, OPACITY_PERCENT_STEP) {
            self.opacity = v / 100.0;
        }
    }

    /// Set the rotation from the angle control.
    pub fn set_rotation(&mut self, degrees: f32) {
        if let Some(v) = snap(degrees, ROTATION_RANGE, ROTATION_STEP) {
            self.rotation = v;
        }
    }

    /// Opacity as shown on the percentage control.
    #[must_use]
    pub fn opacity_percent(&self) -> f32 {
        (self.opacity * 100.0).round()
    }

    /// Apply a color preset.
    pub fn set_preset(&mut self, preset: &StylePreset) {
        self.foreground = preset.foreground.to_string();
        self.background = preset.background.to_string();
    }

    /// The preset matching the current colors, if any.
    #[must_use]
    pub fn matching_preset(&self) -> Option<&'static StylePreset> {
        STYLE_PRESETS
            .iter()
            .find(|p| p.foreground == self.foreground && p.background == self.background)
    }

    /// Side of the centered logo in pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn logo_pixels(&self) -> u32 {
        let percent = self
            .center_logo_size
            .and_then(logo_percent)
            .unwrap_or(DEFAULT_LOGO_PERCENT);
        (self.size * percent / 100.0).round().max(0.0) as u32
    }

    /// Whether `(x, y)` lies inside the QR square, edges included.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.position.x
            && x <= self.position.x + self.size
            && y >= self.position.y
            && y <= self.position.y + self.size
    }
}

/// Partial update to a [`QrVisualConfig`]; absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrStylePatch {
    /// New foreground color.
    pub foreground: Option<String>,
    /// New background color.
    pub background: Option<String>,
    /// New position.
    pub position: Option<Position>,
    /// New size (snapped and clamped).
    pub size: Option<f32>,
    /// New rotation (snapped and clamped).
    pub rotation: Option<f32>,
    /// New opacity in `[0, 1]` (snapped and clamped).
    pub opacity: Option<f32>,
    /// New background image.
    pub base_image_url: Option<String>,
    /// New logo percentage.
    pub center_logo_size: Option<f32>,
}

/// A named foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StylePreset {
    /// Display name.
    pub name: &'static str,
    /// Dark module color.
    pub foreground: &'static str,
    /// Light module color.
    pub background: &'static str,
}

/// Color presets offered by the customizer.
pub const STYLE_PRESETS: [StylePreset; 6] = [
    StylePreset {
        name: "Classic Purple",
        foreground: "#7c3aed",
        background: "#ffffff",
    },
    StylePreset {
        name: "Dark",
        foreground: "#1f2937",
        background: "#ffffff",
    },
    StylePreset {
        name: "Mint",
        foreground: "#059669",
        background: "#ecfdf5",
    },
    StylePreset {
        name: "Red",
        foreground: "#dc2626",
        background: "#fef2f2",
    },
    StylePreset {
        name: "Sky",
        foreground: "#0284c7",
        background: "#f0f9ff",
    },
    StylePreset {
        name: "Lavender",
        foreground: "#7c3aed",
        background: "#f5f3ff",
    },
];

/// Snap `value` to `step` measured from the range start, then clamp.
fn snap(value: f32, (min, max): (f32, f32), step: f32) -> Option<f32> {
    if !value.is_finite() {
        return None;
    }
    let snapped = min + ((value - min) / step).round() * step;
    Some(snapped.clamp(min, max))
}

/// A usable logo percentage in `(0, MAX_LOGO_PERCENT]`.
fn logo_percent(value: f32) -> Option<f32> {
    (value.is_finite() && value > 0.0).then_some(value.min(MAX_LOGO_PERCENT))
}

fn color_field(map: &Map<String, Value>, key: &str, default: String) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map_or(default, str::to_string)
}

#[allow(clippy::cast_possible_truncation)]
fn number_field(map: &Map<String, Value>, key: &str) -> Option<f32> {
    map.get(key)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
}

fn position_field(map: &Map<String, Value>) -> Option<Position> {
    let Some(Value::Object(pos)) = map.get("position") else {
        return None;
    };
    Some(Position {
        x: number_field(pos, "x")?,
        y: number_field(pos, "y")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = QrVisualConfig::default();
        assert_eq!(config.foreground, "#7c3aed");
        assert_eq!(config.background, "#ffffff");
        assert_eq!(config.position, Position::new(50.0, 50.0));
        assert!((config.size - 150.0).abs() < f32::EPSILON);
        assert!((config.opacity - 1.0).abs() < f32::EPSILON);
        assert_eq!(CanvasSize::default(), CanvasSize::new(600, 400));
    }

    #[test]
    fn test_from_stored_merges_fields() {
        let stored = json!({
            "foreground": "#1f2937",
            "background": "",
            "position": {"x": 10, "y": "oops"},
            "size": 200,
            "rotation": 45,
        });
        let config = QrVisualConfig::from_stored(Some(&stored));
        assert_eq!(config.foreground, "#1f2937");
        assert_eq!(config.background, DEFAULT_BACKGROUND);
        assert_eq!(config.position, Position::default());
        assert!((config.size - 200.0).abs() < f32::EPSILON);
        assert!((config.rotation - 45.0).abs() < f32::EPSILON);
        assert!((config.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_stored_clamps_numbers() {
        let stored = json!({
            "size": 1.0e7,
            "rotation": -90,
            "opacity": 4.0,
            "centerLogoSize": 5000,
        });
        let config = QrVisualConfig::from_stored(Some(&stored));
        assert!((config.size - SIZE_RANGE.1).abs() < f32::EPSILON);
        assert!(config.rotation.abs() < f32::EPSILON);
        assert!((config.opacity - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.center_logo_size, Some(MAX_LOGO_PERCENT));
        assert_eq!(config.logo_pixels(), 90);

        let tiny = QrVisualConfig::from_stored(Some(&json!({"size": 1, "centerLogoSize": -3})));
        assert!((tiny.size - SIZE_RANGE.0).abs() < f32::EPSILON);
        assert_eq!(tiny.center_logo_size, None);
    }

    #[test]
    fn test_patch_bounds_logo_percent() {
        let next = QrVisualConfig::default().apply(QrStylePatch {
            center_logo_size: Some(1.0e9),
            ..QrStylePatch::default()
        });
        assert_eq!(next.center_logo_size, Some(MAX_LOGO_PERCENT));
        let kept = next.apply(QrStylePatch {
            center_logo_size: Some(f32::NAN),
            ..QrStylePatch::default()
        });
        assert_eq!(kept.center_logo_size, Some(MAX_LOGO_PERCENT));
    }

    #[test]
    fn test_from_stored_non_object() {
        assert_eq!(
            QrVisualConfig::from_stored(Some(&json!([1, 2]))),
            QrVisualConfig::default()
        );
        assert_eq!(QrVisualConfig::from_stored(None), QrVisualConfig::default());
    }

    #[test]
    fn test_stored_round_trip_of_valid_config() {
        let config = QrVisualConfig {
            rotation: 90.0,
            center_logo_size: Some(20.0),
            base_image_url: Some("data:image/png;base64,AAAA".into()),
            ..QrVisualConfig::default()
        };
        let value = serde_json::to_value(&config).expect("serialize");
        assert_eq!(value["baseImageUrl"], "data:image/png;base64,AAAA");
        assert_eq!(QrVisualConfig::from_stored(Some(&value)), config);
    }

    #[test]
    fn test_control_setters_snap_and_clamp() {
        let mut config = QrVisualConfig::default();
        config.set_size(7.0);
        assert!((config.size - 50.0).abs() < f32::EPSILON);
        config.set_size(178.0);
        assert!((config.size - 180.0).abs() < f32::EPSILON);
        config.set_size(1000.0);
        assert!((config.size - 300.0).abs() < f32::EPSILON);

        config.set_opacity_percent(3.0);
        assert!((config.opacity - 0.1).abs() < 1e-6);
        config.set_opacity_percent(72.0);
        assert!((config.opacity_percent() - 70.0).abs() < f32::EPSILON);

        config.set_rotation(-20.0);
        assert!(config.rotation.abs() < f32::EPSILON);
        config.set_rotation(359.0);
        assert!((config.rotation - 360.0).abs() < f32::EPSILON);
        config.set_rotation(f32::NAN);
        assert!((config.rotation - 360.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_size_change_keeps_position() {
        let mut config = QrVisualConfig {
            position: Position::new(500.0, 300.0),
            ..QrVisualConfig::default()
        };
        config.set_size(300.0);
        assert_eq!(config.position, Position::new(500.0, 300.0));
    }

    #[test]
    fn test_patch_applies_present_fields() {
        let base = QrVisualConfig::default();
        let next = base.apply(QrStylePatch {
            foreground: Some("#000000".into()),
            opacity: Some(0.5),
            ..QrStylePatch::default()
        });
        assert_eq!(next.foreground, "#000000");
        assert!((next.opacity - 0.5).abs() < 1e-6);
        assert_eq!(next.background, base.background);
        assert_eq!(base, QrVisualConfig::default());
    }

    #[test]
    fn test_logo_pixels() {
        let mut config = QrVisualConfig::default();
        assert_eq!(config.logo_pixels(), 38);
        config.center_logo_size = Some(20.0);
        assert_eq!(config.logo_pixels(), 30);
        config.center_logo_size = Some(0.0);
        assert_eq!(config.logo_pixels(), 38);
    }

    #[test]
    fn test_error_correction_level() {
        assert_eq!(ErrorCorrection::for_logo(true), ErrorCorrection::High);
        assert_eq!(ErrorCorrection::for_logo(false), ErrorCorrection::Medium);
    }

    #[test]
    fn test_presets() {
        let mut config = QrVisualConfig::default();
        assert_eq!(
            config.matching_preset().map(|p| p.name),
            Some("Classic Purple")
        );
        config.set_preset(&STYLE_PRESETS[2]);
        assert_eq!(config.background, "#ecfdf5");
        assert_eq!(config.matching_preset().map(|p| p.name), Some("Mint"));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let config = QrVisualConfig::default();
        assert!(config.contains(50.0, 50.0));
        assert!(config.contains(200.0, 200.0));
        assert!(!config.contains(200.1, 100.0));
        assert!(!config.contains(49.9, 100.0));
    }

    #[test]
    fn test_max_origin_pins_oversized_square() {
        let canvas = CanvasSize::new(100, 100);
        assert_eq!(canvas.max_origin(150.0), Position::new(0.0, 0.0));
        assert_eq!(
            CanvasSize::default().max_origin(150.0),
            Position::new(450.0, 250.0)
        );
    }
}
