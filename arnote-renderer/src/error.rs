//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while producing raster output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Image bytes or a data URI could not be decoded.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The payload does not fit in a QR symbol.
    #[error("QR encoding failed: {0}")]
    QrEncode(String),

    /// SVG parsing or pixmap allocation failed.
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    /// The final image could not be encoded.
    #[error("Image encoding failed: {0}")]
    Encode(String),
}
