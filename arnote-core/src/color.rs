//! Colors, swatch palettes and luminance bucketing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Skin swatches offered by the customizer, lightest first.
pub const SKIN_TONES: [&str; 6] = [
    "#ffe4c4", "#f5d0a9", "#deb887", "#c68642", "#8d5524", "#5c3317",
];

/// Hair swatches offered by the customizer.
pub const HAIR_COLORS: [&str; 10] = [
    "#d4a574", "#8b7355", "#6b4423", "#3d2314", "#1a1a1a", "#a0522d", "#9e9e9e", "#9333ea",
    "#ec4899", "#3b82f6",
];

/// Eye swatches offered by the customizer.
pub const EYE_COLORS: [&str; 6] = [
    "#3d2314", "#634e34", "#b8860b", "#3d5c3a", "#3b7ea1", "#6b7280",
];

/// Skin buckets used when mapping a sampled photo color, lightest first.
pub const SKIN_BUCKETS: [&str; 5] = ["#ffe4c4", "#deb887", "#c68642", "#8d5524", "#5c3317"];

/// Hair buckets used when mapping a sampled photo color, lightest first.
pub const HAIR_BUCKETS: [&str; 5] = ["#d4a574", "#8b7355", "#6b4423", "#3d2314", "#1a1a1a"];

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (leading `#` optional, case-insensitive).
    #[must_use]
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => Some(Self::new(
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            )),
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
                Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
            }
            _ => None,
        }
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Plain channel mean on a 0-255 scale.
    #[must_use]
    pub fn brightness(&self) -> f32 {
        (f32::from(self.r) + f32::from(self.g) + f32::from(self.b)) / 3.0
    }

    /// Perceptual luminance in `[0, 1]` (`0.299R + 0.587G + 0.114B`).
    #[must_use]
    pub fn luminance(&self) -> f32 {
        (0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b))
            / 255.0
    }

    /// RGBA float components in `[0, 1]`.
    #[must_use]
    pub fn to_rgba_f32(&self, alpha: f32) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            alpha.clamp(0.0, 1.0),
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Index of the bucket a color falls into for a palette of `len` entries
/// ordered lightest to darkest.
///
/// Returns `None` for an empty palette.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn palette_index(color: Rgb, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let darkness = 1.0 - color.luminance();
    let raw = (darkness * len as f32).floor().max(0.0) as usize;
    Some(raw.min(len - 1))
}

/// Map a color onto the bucket of `palette` selected by its luminance.
///
/// The same input always yields the same entry.
#[must_use]
pub fn map_to_palette<'a>(color: Rgb, palette: &[&'a str]) -> Option<&'a str> {
    palette_index(color, palette.len()).map(|i| palette[i])
}
