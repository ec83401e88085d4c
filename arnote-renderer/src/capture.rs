//! Photo color sampling.
//!
//! Decodes a captured photo and hands its pixels to
//! [`arnote_core::extract_colors`]. A photo that cannot be decoded yields the
//! fallback colors instead of an error.

use arnote_core::{extract_colors, generate_avatar_config, AvatarConfig, SampledColors};

use crate::image::{decode_image, DecodedImage};

/// Sample skin and hair colors from encoded photo bytes.
#[must_use]
pub fn sample_photo(bytes: &[u8]) -> SampledColors {
    match decode_image(bytes) {
        Ok(image) => sample_image(&image),
        Err(e) => {
            tracing::warn!("Photo could not be decoded, using fallback colors: {e}");
            SampledColors::default()
        }
    }
}

/// Sample skin and hair colors from a decoded image.
#[must_use]
pub fn sample_image(image: &DecodedImage) -> SampledColors {
    image
        .pixel_view()
        .map(|view| extract_colors(&view))
        .unwrap_or_default()
}

/// Build an avatar from a captured photo.
#[must_use]
pub fn avatar_from_photo(bytes: &[u8]) -> AvatarConfig {
    generate_avatar_config(&sample_photo(bytes))
}
