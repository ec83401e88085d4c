//! Image decoding for base images, center logos and captured photos.
//!
//! Accepts raw bytes or `data:` URIs (base64 or percent-encoded). Remote
//! URLs are not fetched here; callers resolve them to bytes first.

use arnote_core::PixelView;

use crate::error::{RenderError, RenderResult};

/// A decoded image as straight (non-premultiplied) RGBA.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    pub data: Vec<u8>,
    /// Detected source format.
    pub format: ImageFormat,
}

impl DecodedImage {
    /// Borrow the pixels for region sampling.
    #[must_use]
    pub fn pixel_view(&self) -> Option<PixelView<'_>> {
        PixelView::new(self.width, self.height, &self.data)
    }

    /// Convert to a premultiplied pixmap for compositing.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Rasterize`] for zero-sized images.
    pub fn to_pixmap(&self) -> RenderResult<tiny_skia::Pixmap> {
        let mut pixmap = tiny_skia::Pixmap::new(self.width, self.height).ok_or_else(|| {
            RenderError::Rasterize(format!(
                "cannot allocate {}x{} pixmap",
                self.width, self.height
            ))
        })?;
        for (dst, src) in pixmap
            .pixels_mut()
            .iter_mut()
            .zip(self.data.chunks_exact(4))
        {
            *dst = tiny_skia::ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(pixmap)
    }
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/webp" => Self::WebP,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }
        Self::Unknown
    }
}

/// Decode an image from raw bytes.
///
/// # Errors
///
/// Returns [`RenderError::Decode`] if the bytes are not a supported image.
pub fn decode_image(data: &[u8]) -> RenderResult<DecodedImage> {
    let format = ImageFormat::from_magic_bytes(data);

    let rgba = image::load_from_memory(data)
        .map_err(|e| RenderError::Decode(e.to_string()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(width, height, ?format, "decoded image");

    Ok(DecodedImage {
        width,
        height,
        data: rgba.into_raw(),
        format,
    })
}

/// Decode an image from a `data:` URI, e.g. `data:image/png;base64,iVBOR...`.
///
/// # Errors
///
/// Returns [`RenderError::Decode`] if the URI is malformed or the payload is
/// not a supported image.
pub fn decode_data_uri(uri: &str) -> RenderResult<DecodedImage> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Decode("not a data URI".to_string()))?;
    let (metadata, encoded) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Decode("invalid data URI: missing comma".to_string()))?;

    let bytes = if metadata.ends_with(";base64") {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| RenderError::Decode(format!("invalid base64: {e}")))?
    } else {
        percent_decode(encoded)?
    };

    let declared = metadata.split(';').next().map_or(ImageFormat::Unknown, ImageFormat::from_mime);
    let mut image = decode_image(&bytes)?;
    if image.format == ImageFormat::Unknown {
        image.format = declared;
    }
    Ok(image)
}

/// Decode an image source string as stored in a style record.
///
/// # Errors
///
/// Returns [`RenderError::Decode`] for anything but a decodable `data:` URI.
pub fn decode_source(source: &str) -> RenderResult<DecodedImage> {
    if source.starts_with("data:") {
        decode_data_uri(source)
    } else {
        Err(RenderError::Decode(
            "only data: URIs can be decoded locally".to_string(),
        ))
    }
}

fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| RenderError::Decode("invalid percent encoding".to_string()))?;
            result.push(byte);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }
    Ok(result)
}
