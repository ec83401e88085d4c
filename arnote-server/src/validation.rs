//! Input validation for untrusted data.
//!
//! All path and body input MUST be validated before use.

use arnote_core::store::{is_valid_id_char, MAX_RECORD_ID_LEN};
use thiserror::Error;

/// Maximum characters in a reminder message.
pub const MAX_MESSAGE_LEN: usize = 2000;
/// Maximum size of an uploaded photo.
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;
/// Maximum length of an image data URI in a request body.
pub const MAX_IMAGE_URI_LEN: usize = 8 * 1024 * 1024;
/// Largest accepted animation time in seconds.
pub const MAX_ANIMATION_TIME: f32 = 86_400.0;

/// Validation error types.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Identifier exceeds maximum length.
    #[error("id too long (max {MAX_RECORD_ID_LEN} chars)")]
    IdTooLong,
    /// Identifier is empty or contains invalid characters.
    #[error("id must be non-empty and contain only letters, digits, '-' or '_'")]
    IdInvalidChars,
    /// Message exceeds maximum length.
    #[error("message too long (max {MAX_MESSAGE_LEN} chars)")]
    MessageTooLong,
    /// Photo exceeds maximum size.
    #[error("photo too large (max {MAX_PHOTO_BYTES} bytes)")]
    PhotoTooLarge,
    /// Photo body is empty.
    #[error("photo body is empty")]
    PhotoEmpty,
    /// Image data URI exceeds maximum length.
    #[error("image too large (max {MAX_IMAGE_URI_LEN} bytes)")]
    ImageTooLarge,
    /// Animation time is negative, non-finite or too large.
    #[error("time must be between 0 and {MAX_ANIMATION_TIME} seconds")]
    InvalidTime,
    /// Sign width is non-finite or not positive.
    #[error("maxWidth must be a positive number")]
    InvalidWidth,
}

impl ValidationError {
    /// Short label used in metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IdTooLong | Self::IdInvalidChars => "id",
            Self::MessageTooLong => "message",
            Self::PhotoTooLarge | Self::PhotoEmpty => "photo",
            Self::ImageTooLarge => "image",
            Self::InvalidTime => "time",
            Self::InvalidWidth => "width",
        }
    }
}

/// Validate a profile or reminder identifier.
///
/// Valid identifiers:
/// - 1-64 characters
/// - ASCII alphanumeric, hyphen, underscore only
///
/// # Errors
///
/// Returns [`ValidationError::IdTooLong`] if the id exceeds 64 characters.
/// Returns [`ValidationError::IdInvalidChars`] if the id is empty or contains invalid characters.
pub fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.len() > MAX_RECORD_ID_LEN {
        return Err(ValidationError::IdTooLong);
    }
    if id.is_empty() || !id.chars().all(is_valid_id_char) {
        return Err(ValidationError::IdInvalidChars);
    }
    Ok(())
}

/// Validate a sign message.
///
/// # Errors
///
/// Returns [`ValidationError::MessageTooLong`] past 2000 characters.
pub fn validate_message(message: &str) -> Result<(), ValidationError> {
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(ValidationError::MessageTooLong);
    }
    Ok(())
}

/// Validate an uploaded photo body.
///
/// # Errors
///
/// Returns [`ValidationError::PhotoEmpty`] or [`ValidationError::PhotoTooLarge`].
pub fn validate_photo(bytes: &[u8]) -> Result<(), ValidationError> {
    if bytes.is_empty() {
        return Err(ValidationError::PhotoEmpty);
    }
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(ValidationError::PhotoTooLarge);
    }
    Ok(())
}

/// Validate an optional image data URI.
///
/// # Errors
///
/// Returns [`ValidationError::ImageTooLarge`] past 8 MiB.
pub fn validate_image_uri(uri: Option<&str>) -> Result<(), ValidationError> {
    match uri {
        Some(uri) if uri.len() > MAX_IMAGE_URI_LEN => Err(ValidationError::ImageTooLarge),
        _ => Ok(()),
    }
}

/// Validate an animation time.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTime`] unless `0 <= t <= 86400`.
pub fn validate_time(t: f32) -> Result<(), ValidationError> {
    if t.is_finite() && (0.0..=MAX_ANIMATION_TIME).contains(&t) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTime)
    }
}

/// Validate a sign width override.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidWidth`] for non-finite or non-positive values.
pub fn validate_width(width: f32) -> Result<(), ValidationError> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidWidth)
    }
}
