//! Avatar and AR scene scenario tests.
//!
//! Tests the stored-record to scene flow:
//! - Normalizing empty and legacy records
//! - Toggle authority over accessory styles
//! - Hat and hair interplay
//! - Sign sizing and the floating figure
//! - Posing over synthetic time

use arnote_core::{
    assemble, figure, normalize, AnimationRates, AnimationState, AvatarConfig, FacialHairStyle,
    GlassesStyle, HairStyle, HatStyle, Part, SignStyle,
};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_null_record_assembles_default_avatar() {
    let config = normalize(None);
    assert_eq!(config.skin_color, "#deb887");
    assert_eq!(config.hair_style, HairStyle::Medium);
    assert!(!config.has_glasses);

    let model = assemble(&config, false);
    assert!(model.contains_part(Part::Head));
    assert!(model.contains_part(Part::Hair));
    for part in [Part::Glasses, Part::Hat, Part::Earrings, Part::FacialHair] {
        assert!(!model.contains_part(part), "unexpected {part:?}");
    }
}

#[test]
fn test_legacy_record_upgrades() {
    let stored = json!({
        "skinColor": "#5c3317",
        "hairColor": "#1a1a1a",
        "eyeColor": "#3b7ea1",
        "hairStyle": "long",
        "hasGlasses": true,
    });
    let config = normalize(Some(&stored));
    assert_eq!(config.hair_style, HairStyle::Long);
    assert_eq!(config.effective_glasses(), Some(GlassesStyle::Round));
    assert!(assemble(&config, false).contains_part(Part::Glasses));
}

// ============================================================================
// Hats and hair
// ============================================================================

#[test]
fn test_bald_with_cap() {
    let config = AvatarConfig {
        hair_style: HairStyle::Bald,
        has_hat: true,
        hat_style: HatStyle::Cap,
        ..AvatarConfig::default()
    };
    let model = assemble(&config, false);
    assert!(!model.contains_part(Part::Hair));
    assert!(model.contains_part(Part::Hat));
    assert!(model.root.find("hair_top").is_none());
}

#[test]
fn test_hat_hides_crown_hair_only() {
    let config = AvatarConfig {
        hair_style: HairStyle::Long,
        has_hat: true,
        hat_style: HatStyle::Beanie,
        ..AvatarConfig::default()
    };
    let model = assemble(&config, false);
    assert!(model.contains_part(Part::Hair));
    assert!(model.root.find("hair_top").is_none());

    let bare = assemble(
        &AvatarConfig {
            has_hat: false,
            ..config
        },
        false,
    );
    assert!(bare.root.find("hair_top").is_some());
}

// ============================================================================
// Sign
// ============================================================================

#[test]
fn test_three_line_message_sign() {
    let message = format!("{}\n{}\n{}", "a".repeat(5), "b".repeat(40), "c".repeat(10));
    let (node, layout) = figure(&AvatarConfig::default(), &message, &SignStyle::default());
    assert!((layout.width - 2.5).abs() < 1e-6);
    assert!(layout.height >= 0.8);
    assert!((layout.height - (3.0 * 0.3 + 0.4)).abs() < 1e-5);
    let sign_meshes = node
        .flatten()
        .into_iter()
        .filter(|m| m.part == Some(Part::Sign))
        .count();
    assert_eq!(sign_meshes, 4);
}

// ============================================================================
// Animation
// ============================================================================

#[test]
fn test_posing_over_time_keeps_mesh_count() {
    let model = assemble(&AvatarConfig::default(), true);
    let rates = AnimationRates::default();
    let rest = model.flatten().len();
    let mut state = AnimationState::default();
    for frame in 0..120u16 {
        state = state.advance(f32::from(frame) / 60.0, &rates);
        assert_eq!(model.flatten_posed(&state).len(), rest);
        assert!(state.eye_scale_y > 0.0 && state.eye_scale_y <= 1.0);
    }
}

// ============================================================================
// Toggle authority
// ============================================================================

fn glasses_strategy() -> impl Strategy<Value = GlassesStyle> {
    proptest::sample::select(GlassesStyle::ALL.to_vec())
}

fn hat_strategy() -> impl Strategy<Value = HatStyle> {
    proptest::sample::select(HatStyle::ALL.to_vec())
}

fn facial_hair_strategy() -> impl Strategy<Value = FacialHairStyle> {
    proptest::sample::select(FacialHairStyle::ALL.to_vec())
}

fn hair_strategy() -> impl Strategy<Value = HairStyle> {
    proptest::sample::select(HairStyle::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_disabled_toggles_render_nothing(
        glasses in glasses_strategy(),
        hat in hat_strategy(),
        facial_hair in facial_hair_strategy(),
        hair in hair_strategy(),
    ) {
        let config = AvatarConfig {
            hair_style: hair,
            has_glasses: false,
            glasses_style: glasses,
            has_hat: false,
            hat_style: hat,
            has_earrings: false,
            has_facial_hair: false,
            facial_hair_style: facial_hair,
            ..AvatarConfig::default()
        };
        let model = assemble(&config, true);
        prop_assert!(!model.contains_part(Part::Glasses));
        prop_assert!(!model.contains_part(Part::Hat));
        prop_assert!(!model.contains_part(Part::Earrings));
        prop_assert!(!model.contains_part(Part::FacialHair));
    }

    #[test]
    fn prop_enabled_toggles_follow_style(
        glasses in glasses_strategy(),
        hat in hat_strategy(),
        facial_hair in facial_hair_strategy(),
    ) {
        let config = AvatarConfig {
            has_glasses: true,
            glasses_style: glasses,
            has_hat: true,
            hat_style: hat,
            has_earrings: true,
            has_facial_hair: true,
            facial_hair_style: facial_hair,
            ..AvatarConfig::default()
        };
        let model = assemble(&config, false);
        prop_assert!(model.contains_part(Part::Glasses));
        prop_assert!(model.contains_part(Part::Earrings));
        prop_assert_eq!(model.contains_part(Part::Hat), hat != HatStyle::None);
        prop_assert_eq!(
            model.contains_part(Part::FacialHair),
            facial_hair != FacialHairStyle::None
        );
    }
}
