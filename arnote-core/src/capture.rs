//! Capture-to-config color sampling.
//!
//! A heuristic, not a face detector: two fixed proportional boxes of the
//! photo are averaged and the results are bucketed onto palettes by
//! luminance. The only guarantees are determinism and a fallback color when
//! nothing usable is found.

use serde::{Deserialize, Serialize};

use crate::avatar::{AvatarConfig, HairStyle, DEFAULT_EYE_COLOR, DEFAULT_SKIN_COLOR};
use crate::color::{map_to_palette, Rgb, HAIR_BUCKETS, SKIN_BUCKETS};

/// Hair color used when no hair pixels can be sampled.
pub const FALLBACK_HAIR_COLOR: &str = "#3d2314";

/// Darkest channel mean still sampled.
pub const MIN_BRIGHTNESS: f32 = 30.0;
/// Brightest channel mean still sampled.
pub const MAX_BRIGHTNESS: f32 = 240.0;

/// A box given as fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge fraction.
    pub x: f32,
    /// Top edge fraction.
    pub y: f32,
    /// Width fraction.
    pub width: f32,
    /// Height fraction.
    pub height: f32,
}

impl Region {
    /// Approximate face center.
    pub const FACE: Self = Self {
        x: 0.35,
        y: 0.35,
        width: 0.3,
        height: 0.2,
    };

    /// Approximate top of the head.
    pub const HAIR: Self = Self {
        x: 0.3,
        y: 0.05,
        width: 0.4,
        height: 0.15,
    };

    /// Pixel bounds `(x0, y0, x1, y1)` for an image, end exclusive.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn pixel_bounds(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let w = width as f32;
        let h = height as f32;
        let x0 = (w * self.x).floor().max(0.0) as u32;
        let y0 = (h * self.y).floor().max(0.0) as u32;
        let x1 = ((w * self.x).floor() + (w * self.width).floor()).max(0.0) as u32;
        let y1 = ((h * self.y).floor() + (h * self.height).floor()).max(0.0) as u32;
        (x0.min(width), y0.min(height), x1.min(width), y1.min(height))
    }
}

/// Borrowed RGBA8 pixel buffer, row-major.
#[derive(Debug, Clone, Copy)]
pub struct PixelView<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> PixelView<'a> {
    /// Wrap a buffer. Returns `None` when the length does not match.
    #[must_use]
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Image width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Mean color of the pixels in `region` whose brightness lies within
    /// `[MIN_BRIGHTNESS, MAX_BRIGHTNESS]`. `None` when no pixel qualifies.
    #[must_use]
    pub fn average(&self, region: Region) -> Option<Rgb> {
        let (x0, y0, x1, y1) = region.pixel_bounds(self.width, self.height);
        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for y in y0..y1 {
            let row = y as usize * self.width as usize;
            for x in x0..x1 {
                let i = (row + x as usize) * 4;
                let px = Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]);
                let brightness = px.brightness();
                if (MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&brightness) {
                    sum[0] += u64::from(px.r);
                    sum[1] += u64::from(px.g);
                    sum[2] += u64::from(px.b);
                    count += 1;
                }
            }
        }
        if count == 0 {
            return None;
        }
        let mean = |s: u64| u8::try_from((s + count / 2) / count).unwrap_or(u8::MAX);
        Some(Rgb::new(mean(sum[0]), mean(sum[1]), mean(sum[2])))
    }
}

/// Raw colors sampled from a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampledColors {
    /// Face region average.
    pub skin_tone: Rgb,
    /// Hair region average.
    pub hair_color: Rgb,
}

impl Default for SampledColors {
    /// Colors used when the photo cannot be read.
    fn default() -> Self {
        Self {
            skin_tone: fallback(DEFAULT_SKIN_COLOR),
            hair_color: fallback(FALLBACK_HAIR_COLOR),
        }
    }
}

fn fallback(hex: &str) -> Rgb {
    Rgb::parse_hex(hex).unwrap_or(Rgb::new(0, 0, 0))
}

/// Sample skin and hair colors. Each region falls back on its own.
#[must_use]
pub fn extract_colors(pixels: &PixelView<'_>) -> SampledColors {
    let defaults = SampledColors::default();
    let skin_tone = pixels.average(Region::FACE).unwrap_or_else(|| {
        tracing::debug!("no usable face pixels, using fallback skin tone");
        defaults.skin_tone
    });
    let hair_color = pixels.average(Region::HAIR).unwrap_or_else(|| {
        tracing::debug!("no usable hair pixels, using fallback hair color");
        defaults.hair_color
    });
    SampledColors {
        skin_tone,
        hair_color,
    }
}

/// Turn sampled colors into an avatar: palette-mapped skin and hair, brown
/// eyes, medium hair, everything else default.
#[must_use]
pub fn generate_avatar_config(colors: &SampledColors) -> AvatarConfig {
    let defaults = AvatarConfig::default();
    AvatarConfig {
        skin_color: map_to_palette(colors.skin_tone, &SKIN_BUCKETS)
            .map_or(defaults.skin_color.clone(), str::to_string),
        hair_color: map_to_palette(colors.hair_color, &HAIR_BUCKETS)
            .map_or(defaults.hair_color.clone(), str::to_string),
        eye_color: DEFAULT_EYE_COLOR.to_string(),
        hair_style: HairStyle::Medium,
        ..defaults
    }
}
