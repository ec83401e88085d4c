//! Geometry part builders.
//!
//! Each builder is a stateless function of the config and the shared
//! [`Materials`], returning a subtree tagged with its [`Part`](crate::Part).
//! Parts occupy disjoint pre-defined offsets, so the assembler may call them
//! in any order. Optional parts return `None` when their toggle is off.

pub mod accessories;
pub mod body;
pub mod face;
pub mod facial_hair;
pub mod hair;
pub mod head;

use crate::avatar::AvatarConfig;
use crate::mesh::Material;

/// Shared materials derived from the config colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Materials {
    /// Skin surfaces.
    pub skin: Material,
    /// Hair, eyebrows and facial hair.
    pub hair: Material,
    /// Irises.
    pub eye: Material,
    /// Toon outline shell.
    pub outline: Material,
}

impl Materials {
    /// Build the shared set for a config.
    #[must_use]
    pub fn for_config(config: &AvatarConfig) -> Self {
        Self {
            skin: Material::standard(config.skin_color.clone(), 0.6, 0.1),
            hair: Material::standard(config.hair_color.clone(), 0.8, 0.0),
            eye: Material::standard(config.eye_color.clone(), 0.3, 0.2),
            outline: Material::unlit("#2d2d2d").back_side(),
        }
    }
}

/// Deterministic pseudo-random value in `[0, 1)` for `(index, salt)`.
///
/// Replaces per-render randomness so the same config always yields the same
/// geometry.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jitter(index: u32, salt: u32) -> f32 {
    let mut h = index.wrapping_mul(0x9e37_79b9) ^ salt.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    (h >> 8) as f32 / (1u32 << 24) as f32
}
