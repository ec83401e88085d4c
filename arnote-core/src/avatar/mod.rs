//! Avatar configuration record.
//!
//! [`AvatarConfig`] is an immutable value: edits produce a new value through
//! [`AvatarConfig::apply`], and stored records are repaired on read by
//! [`normalize`].
//!
//! Toggles are authoritative over their style selectors. A stored
//! `hatStyle: "cap"` with `hasHat: false` keeps the style for when the toggle
//! is switched back on, but never renders.

mod normalize;

pub use normalize::{detect_schema, normalize, normalize_str, SchemaGeneration};

use serde::{Deserialize, Serialize};

/// Default skin color.
pub const DEFAULT_SKIN_COLOR: &str = "#deb887";
/// Default hair color.
pub const DEFAULT_HAIR_COLOR: &str = "#4a3728";
/// Default eye color.
pub const DEFAULT_EYE_COLOR: &str = "#634e34";

/// Hair style variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HairStyle {
    /// Short crop with a bumpy top.
    Short,
    /// Shoulder-length volume.
    #[default]
    Medium,
    /// Long flowing sides and back.
    Long,
    /// Ring of puffs.
    Curly,
    /// Pulled back with a tie.
    Ponytail,
    /// Central ridge of spikes with shaved sides.
    Mohawk,
    /// No hair geometry.
    Bald,
}

impl HairStyle {
    /// Every variant.
    pub const ALL: [Self; 7] = [
        Self::Short,
        Self::Medium,
        Self::Long,
        Self::Curly,
        Self::Ponytail,
        Self::Mohawk,
        Self::Bald,
    ];
}

/// Face shape variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceShape {
    /// Wide and soft.
    Round,
    /// Taller than wide.
    #[default]
    Oval,
    /// Broad jaw.
    Square,
    /// Narrow chin.
    Heart,
}

impl FaceShape {
    /// Every variant.
    pub const ALL: [Self; 4] = [Self::Round, Self::Oval, Self::Square, Self::Heart];
}

/// Facial expression variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    /// Squinting smile with blush.
    Happy,
    /// Resting face.
    #[default]
    Neutral,
    /// Wide eyes and open mouth.
    Surprised,
    /// Left eye closed, smirk.
    Wink,
}

impl Expression {
    /// Every variant.
    pub const ALL: [Self; 4] = [Self::Happy, Self::Neutral, Self::Surprised, Self::Wink];
}

/// Glasses variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlassesStyle {
    /// Circular rims.
    #[default]
    Round,
    /// Rectangular rims.
    Square,
    /// Upswept rims with wings.
    CatEye,
    /// Teardrop lenses with a double bridge.
    Aviator,
}

impl GlassesStyle {
    /// Every variant.
    pub const ALL: [Self; 4] = [Self::Round, Self::Square, Self::CatEye, Self::Aviator];
}

/// Hat variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HatStyle {
    /// No hat, even when the toggle is on.
    #[default]
    None,
    /// Baseball cap.
    Cap,
    /// Knit beanie with a pom.
    Beanie,
    /// Wide-brim cowboy hat.
    Cowboy,
}

impl HatStyle {
    /// Every variant.
    pub const ALL: [Self; 4] = [Self::None, Self::Cap, Self::Beanie, Self::Cowboy];
}

/// Facial hair variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacialHairStyle {
    /// No facial hair, even when the toggle is on.
    #[default]
    None,
    /// Full beard.
    Beard,
    /// Chin tuft with a thin mustache.
    Goatee,
    /// Mustache only.
    Mustache,
    /// Scattered short dots.
    Stubble,
}

impl FacialHairStyle {
    /// Every variant.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Beard,
        Self::Goatee,
        Self::Mustache,
        Self::Stubble,
    ];
}

/// Body build variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyStyle {
    /// Narrow torso and shoulders.
    Slim,
    /// Default proportions.
    #[default]
    Average,
    /// Broad shoulders and thicker arms.
    Athletic,
}

impl BodyStyle {
    /// Every variant.
    pub const ALL: [Self; 3] = [Self::Slim, Self::Average, Self::Athletic];
}

/// Declarative description of a procedural avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct AvatarConfig {
    /// Skin color, stored verbatim.
    pub skin_color: String,
    /// Hair, eyebrow and facial hair color, stored verbatim.
    pub hair_color: String,
    /// Iris color, stored verbatim.
    pub eye_color: String,
    /// Hair style.
    pub hair_style: HairStyle,
    /// Face shape.
    pub face_shape: FaceShape,
    /// Facial expression.
    pub expression: Expression,
    /// Whether glasses are rendered.
    pub has_glasses: bool,
    /// Glasses style, ignored while `has_glasses` is false.
    pub glasses_style: GlassesStyle,
    /// Whether a hat is rendered.
    pub has_hat: bool,
    /// Hat style, ignored while `has_hat` is false.
    pub hat_style: HatStyle,
    /// Whether earrings are rendered.
    pub has_earrings: bool,
    /// Whether facial hair is rendered.
    pub has_facial_hair: bool,
    /// Facial hair style, ignored while `has_facial_hair` is false.
    pub facial_hair_style: FacialHairStyle,
    /// Body build.
    pub body_style: BodyStyle,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            skin_color: DEFAULT_SKIN_COLOR.to_string(),
            hair_color: DEFAULT_HAIR_COLOR.to_string(),
            eye_color: DEFAULT_EYE_COLOR.to_string(),
            hair_style: HairStyle::default(),
            face_shape: FaceShape::default(),
            expression: Expression::default(),
            has_glasses: false,
            glasses_style: GlassesStyle::default(),
            has_hat: false,
            hat_style: HatStyle::default(),
            has_earrings: false,
            has_facial_hair: false,
            facial_hair_style: FacialHairStyle::default(),
            body_style: BodyStyle::default(),
        }
    }
}

impl AvatarConfig {
    /// Merge a partial update, returning a new config.
    #[must_use]
    pub fn apply(&self, patch: AvatarPatch) -> Self {
        Self {
            skin_color: patch.skin_color.unwrap_or_else(|| self.skin_color.clone()),
            hair_color: patch.hair_color.unwrap_or_else(|| self.hair_color.clone()),
            eye_color: patch.eye_color.unwrap_or_else(|| self.eye_color.clone()),
            hair_style: patch.hair_style.unwrap_or(self.hair_style),
            face_shape: patch.face_shape.unwrap_or(self.face_shape),
            expression: patch.expression.unwrap_or(self.expression),
            has_glasses: patch.has_glasses.unwrap_or(self.has_glasses),
            glasses_style: patch.glasses_style.unwrap_or(self.glasses_style),
            has_hat: patch.has_hat.unwrap_or(self.has_hat),
            hat_style: patch.hat_style.unwrap_or(self.hat_style),
            has_earrings: patch.has_earrings.unwrap_or(self.has_earrings),
            has_facial_hair: patch.has_facial_hair.unwrap_or(self.has_facial_hair),
            facial_hair_style: patch.facial_hair_style.unwrap_or(self.facial_hair_style),
            body_style: patch.body_style.unwrap_or(self.body_style),
        }
    }

    /// Glasses style to render, if any.
    #[must_use]
    pub fn effective_glasses(&self) -> Option<GlassesStyle> {
        self.has_glasses.then_some(self.glasses_style)
    }

    /// Hat style to render, if any.
    #[must_use]
    pub fn effective_hat(&self) -> Option<HatStyle> {
        match (self.has_hat, self.hat_style) {
            (false, _) | (true, HatStyle::None) => None,
            (true, style) => Some(style),
        }
    }

    /// Facial hair style to render, if any.
    #[must_use]
    pub fn effective_facial_hair(&self) -> Option<FacialHairStyle> {
        match (self.has_facial_hair, self.facial_hair_style) {
            (false, _) | (true, FacialHairStyle::None) => None,
            (true, style) => Some(style),
        }
    }
}

/// Field-by-field update for an [`AvatarConfig`]; absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)]
pub struct AvatarPatch {
    pub skin_color: Option<String>,
    pub hair_color: Option<String>,
    pub eye_color: Option<String>,
    pub hair_style: Option<HairStyle>,
    pub face_shape: Option<FaceShape>,
    pub expression: Option<Expression>,
    pub has_glasses: Option<bool>,
    pub glasses_style: Option<GlassesStyle>,
    pub has_hat: Option<bool>,
    pub hat_style: Option<HatStyle>,
    pub has_earrings: Option<bool>,
    pub has_facial_hair: Option<bool>,
    pub facial_hair_style: Option<FacialHairStyle>,
    pub body_style: Option<BodyStyle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AvatarConfig::default();
        assert_eq!(config.skin_color, "#deb887");
        assert_eq!(config.hair_color, "#4a3728");
        assert_eq!(config.hair_style, HairStyle::Medium);
        assert_eq!(config.face_shape, FaceShape::Oval);
        assert!(!config.has_glasses);
        assert_eq!(config.hat_style, HatStyle::None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(AvatarConfig::default()).expect("serialize");
        assert_eq!(json["skinColor"], "#deb887");
        assert_eq!(json["glassesStyle"], "round");
        assert_eq!(json["facialHairStyle"], "none");
        assert_eq!(json.as_object().map(serde_json::Map::len), Some(14));
    }

    #[test]
    fn test_cat_eye_is_kebab_case() {
        let json = serde_json::to_value(GlassesStyle::CatEye).expect("serialize");
        assert_eq!(json, "cat-eye");
    }

    #[test]
    fn test_apply_patch_replaces_only_given_fields() {
        let base = AvatarConfig::default();
        let patch = AvatarPatch {
            hair_style: Some(HairStyle::Curly),
            has_glasses: Some(true),
            ..Default::default()
        };
        let next = base.apply(patch);
        assert_eq!(next.hair_style, HairStyle::Curly);
        assert!(next.has_glasses);
        assert_eq!(next.skin_color, base.skin_color);
        assert_eq!(next.body_style, base.body_style);
    }

    #[test]
    fn test_patch_deserializes_partial_json() {
        let patch: AvatarPatch =
            serde_json::from_str(r#"{"hasHat": true, "hatStyle": "cowboy"}"#).expect("parse");
        assert_eq!(patch.has_hat, Some(true));
        assert_eq!(patch.hat_style, Some(HatStyle::Cowboy));
        assert_eq!(patch.skin_color, None);
    }

    #[test]
    fn test_toggle_is_authoritative() {
        let config = AvatarConfig {
            has_hat: false,
            hat_style: HatStyle::Cap,
            has_glasses: false,
            glasses_style: GlassesStyle::Aviator,
            has_facial_hair: false,
            facial_hair_style: FacialHairStyle::Beard,
            ..AvatarConfig::default()
        };
        assert_eq!(config.effective_hat(), None);
        assert_eq!(config.effective_glasses(), None);
        assert_eq!(config.effective_facial_hair(), None);
    }

    #[test]
    fn test_toggle_on_with_none_style_renders_nothing() {
        let config = AvatarConfig {
            has_hat: true,
            has_facial_hair: true,
            ..AvatarConfig::default()
        };
        assert_eq!(config.effective_hat(), None);
        assert_eq!(config.effective_facial_hair(), None);
    }

    #[test]
    fn test_turning_toggle_back_on_restores_style() {
        let hidden = AvatarConfig {
            has_hat: false,
            hat_style: HatStyle::Beanie,
            ..AvatarConfig::default()
        };
        let shown = hidden.apply(AvatarPatch {
            has_hat: Some(true),
            ..Default::default()
        });
        assert_eq!(shown.effective_hat(), Some(HatStyle::Beanie));
    }
}
