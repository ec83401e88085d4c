//! Total repair of stored avatar records.
//!
//! Any JSON input, including `null`, arrays, legacy five-field records and
//! records with wrong-typed fields, produces a fully populated
//! [`AvatarConfig`]. Each field is judged on its own: present and well typed
//! keeps it, anything else takes the default. Booleans are checked by type,
//! so a stored `false` survives.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::AvatarConfig;

/// Keys carried by the original five-field schema.
const LEGACY_KEYS: [&str; 5] = ["skinColor", "hairColor", "eyeColor", "hairStyle", "hasGlasses"];

/// Keys introduced by the extended schema.
const EXTENDED_KEYS: [&str; 9] = [
    "faceShape",
    "expression",
    "glassesStyle",
    "hasHat",
    "hatStyle",
    "hasEarrings",
    "hasFacialHair",
    "facialHairStyle",
    "bodyStyle",
];

/// Which schema generation a stored record appears to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaGeneration {
    /// Not an object, or an object with no recognised keys.
    Empty,
    /// Only keys from the five-field schema.
    Legacy,
    /// At least one key from the extended schema.
    Extended,
}

/// Classify a stored record.
#[must_use]
pub fn detect_schema(input: &Value) -> SchemaGeneration {
    let Value::Object(map) = input else {
        return SchemaGeneration::Empty;
    };
    classify(map)
}

fn classify(map: &Map<String, Value>) -> SchemaGeneration {
    if EXTENDED_KEYS.iter().any(|k| map.contains_key(*k)) {
        SchemaGeneration::Extended
    } else if LEGACY_KEYS.iter().any(|k| map.contains_key(*k)) {
        SchemaGeneration::Legacy
    } else {
        SchemaGeneration::Empty
    }
}

/// Repair a possibly partial or legacy-shaped record into a valid config.
///
/// Never fails; the worst case is [`AvatarConfig::default`].
#[must_use]
pub fn normalize(input: Option<&Value>) -> AvatarConfig {
    let defaults = AvatarConfig::default();
    let Some(Value::Object(map)) = input else {
        tracing::debug!("avatar record missing or not an object, using defaults");
        return defaults;
    };

    if classify(map) == SchemaGeneration::Legacy {
        tracing::debug!("migrating legacy avatar record");
    }

    AvatarConfig {
        skin_color: color_field(map, "skinColor", defaults.skin_color),
        hair_color: color_field(map, "hairColor", defaults.hair_color),
        eye_color: color_field(map, "eyeColor", defaults.eye_color),
        hair_style: enum_field(map, "hairStyle", defaults.hair_style),
        face_shape: enum_field(map, "faceShape", defaults.face_shape),
        expression: enum_field(map, "expression", defaults.expression),
        has_glasses: bool_field(map, "hasGlasses", defaults.has_glasses),
        glasses_style: enum_field(map, "glassesStyle", defaults.glasses_style),
        has_hat: bool_field(map, "hasHat", defaults.has_hat),
        hat_style: enum_field(map, "hatStyle", defaults.hat_style),
        has_earrings: bool_field(map, "hasEarrings", defaults.has_earrings),
        has_facial_hair: bool_field(map, "hasFacialHair", defaults.has_facial_hair),
        facial_hair_style: enum_field(map, "facialHairStyle", defaults.facial_hair_style),
        body_style: enum_field(map, "bodyStyle", defaults.body_style),
    }
}

/// Parse and repair a raw JSON string. Unparseable text yields the defaults.
#[must_use]
pub fn normalize_str(raw: &str) -> AvatarConfig {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => normalize(Some(&value)),
        Err(e) => {
            tracing::warn!("unparseable avatar record, using defaults: {e}");
            AvatarConfig::default()
        }
    }
}

/// Colors are free-form: any non-blank string is kept verbatim.
fn color_field(map: &Map<String, Value>, key: &str, default: String) -> String {
    match map.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => default,
    }
}

fn bool_field(map: &Map<String, Value>, key: &str, default: bool) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn enum_field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, default: T) -> T {
    map.get(key)
        .and_then(|v| T::deserialize(v).ok())
        .unwrap_or(default)
}
