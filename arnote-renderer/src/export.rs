//! Composite QR export.
//!
//! Draws the layers planned by [`plan_export`] onto an offscreen tiny-skia
//! pixmap of the canvas size and encodes the result as PNG. A background
//! image that fails to decode becomes the flat fallback fill; a QR that
//! cannot be produced is left out. Neither aborts the export.

use std::time::Instant;

use arnote_core::qr::layers::{plan_export, Affine, Layer, Rect, FALLBACK_FILL};
use arnote_core::{CanvasSize, QrVisualConfig};

use crate::error::{RenderError, RenderResult};
use crate::image::{decode_source, DecodedImage};
use crate::qr::{color_or, render_qr};

/// Inputs of one export.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    /// Encoded QR content, normally from `qr_payload`.
    pub payload: &'a str,
    /// Visual style.
    pub config: &'a QrVisualConfig,
    /// Background image as a `data:` URI. Falls back to
    /// `config.base_image_url` when absent.
    pub base_image: Option<&'a str>,
    /// Center logo as a `data:` URI.
    pub center_logo: Option<&'a str>,
}

impl<'a> ExportRequest<'a> {
    /// Request with no images.
    #[must_use]
    pub fn new(payload: &'a str, config: &'a QrVisualConfig) -> Self {
        Self {
            payload,
            config,
            base_image: None,
            center_logo: None,
        }
    }

    /// Attach a background image.
    #[must_use]
    pub fn with_base_image(mut self, uri: &'a str) -> Self {
        self.base_image = Some(uri);
        self
    }

    /// Attach a center logo.
    #[must_use]
    pub fn with_center_logo(mut self, uri: &'a str) -> Self {
        self.center_logo = Some(uri);
        self
    }
}

/// Flattens a styled QR over its background into a single PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrExporter {
    canvas: CanvasSize,
}

impl QrExporter {
    /// Create an exporter for a canvas size.
    #[must_use]
    pub fn new(canvas: CanvasSize) -> Self {
        Self { canvas }
    }

    /// Output size.
    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Export to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the canvas cannot be allocated or the PNG
    /// cannot be encoded.
    pub fn export(&self, request: &ExportRequest<'_>) -> RenderResult<Vec<u8>> {
        let started = Instant::now();
        let pixmap = self.render(request)?;
        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
        tracing::debug!(
            bytes = png.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "exported QR composite"
        );
        Ok(png)
    }

    /// Render the composite without encoding it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Rasterize`] if the canvas cannot be allocated.
    pub fn render(&self, request: &ExportRequest<'_>) -> RenderResult<tiny_skia::Pixmap> {
        let mut canvas = tiny_skia::Pixmap::new(self.canvas.width, self.canvas.height)
            .ok_or_else(|| {
                RenderError::Rasterize(format!(
                    "cannot allocate {}x{} canvas",
                    self.canvas.width, self.canvas.height
                ))
            })?;

        let config = request.config;
        let base = request
            .base_image
            .or(config.base_image_url.as_deref())
            .and_then(|src| load_optional(src, "background image"))
            .and_then(|image| {
                image
                    .to_pixmap()
                    .inspect_err(|e| tracing::warn!("Ignoring background image: {e}"))
                    .ok()
            });
        let logo = request
            .center_logo
            .and_then(|src| load_optional(src, "center logo"));
        let qr = render_qr(request.payload, config, logo.as_ref())
            .inspect_err(|e| tracing::warn!("Skipping QR layer: {e}"))
            .ok();

        for layer in plan_export(config, self.canvas, base.is_some(), qr.is_some()) {
            match layer {
                Layer::Fill { color, rect } => fill(&mut canvas, &color, rect),
                Layer::BaseImage { rect } => {
                    if let Some(base) = &base {
                        draw_stretched(&mut canvas, base, rect, to_skia(Affine::identity()), 1.0);
                    }
                }
                Layer::Qr {
                    rect,
                    transform,
                    opacity,
                } => {
                    if let Some(qr) = &qr {
                        draw_stretched(&mut canvas, qr, rect, to_skia(transform), opacity);
                    }
                }
            }
        }
        Ok(canvas)
    }
}

fn load_optional(source: &str, what: &str) -> Option<DecodedImage> {
    decode_source(source)
        .inspect_err(|e| tracing::warn!("Ignoring {what}: {e}"))
        .ok()
}

fn to_skia(t: Affine) -> tiny_skia::Transform {
    tiny_skia::Transform::from_row(t.a, t.b, t.c, t.d, t.e, t.f)
}

fn fill(canvas: &mut tiny_skia::Pixmap, color: &str, rect: Rect) {
    let rgb = color_or(color, FALLBACK_FILL);
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(rgb.r, rgb.g, rgb.b, 255);
    if let Some(area) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) {
        canvas.fill_rect(area, &paint, tiny_skia::Transform::identity(), None);
    }
}

/// Draw `source` stretched over `rect`, then mapped by `transform`.
#[allow(clippy::cast_precision_loss)]
fn draw_stretched(
    canvas: &mut tiny_skia::Pixmap,
    source: &tiny_skia::Pixmap,
    rect: Rect,
    transform: tiny_skia::Transform,
    opacity: f32,
) {
    let transform = transform.pre_translate(rect.x, rect.y).pre_scale(
        rect.width / source.width() as f32,
        rect.height / source.height() as f32,
    );
    let paint = tiny_skia::PixmapPaint {
        opacity,
        quality: tiny_skia::FilterQuality::Bilinear,
        ..tiny_skia::PixmapPaint::default()
    };
    canvas.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use arnote_core::Position;

    const PAYLOAD: &str = "https://app.example/ar/abc123";

    fn rgb_at(pixmap: &tiny_skia::Pixmap, x: u32, y: u32) -> (u8, u8, u8) {
        let px = pixmap.pixel(x, y).expect("pixel").demultiply();
        (px.red(), px.green(), px.blue())
    }

    #[test]
    fn test_fallback_fill_outside_qr() {
        let config = QrVisualConfig::default();
        let pixmap = QrExporter::default()
            .render(&ExportRequest::new(PAYLOAD, &config))
            .expect("render");
        assert_eq!((pixmap.width(), pixmap.height()), (600, 400));
        assert_eq!(rgb_at(&pixmap, 599, 399), (0xf5, 0xf5, 0xf5));
        assert_eq!(rgb_at(&pixmap, 52, 52), (0x7c, 0x3a, 0xed));
    }

    #[test]
    fn test_bad_background_falls_back_to_fill() {
        let config = QrVisualConfig::default();
        let request =
            ExportRequest::new(PAYLOAD, &config).with_base_image("data:image/png;base64,AAAA");
        let pixmap = QrExporter::default().render(&request).expect("render");
        assert_eq!(rgb_at(&pixmap, 0, 0), (0xf5, 0xf5, 0xf5));
    }

    #[test]
    fn test_unencodable_payload_skips_qr() {
        let config = QrVisualConfig::default();
        let payload = "x".repeat(5000);
        let pixmap = QrExporter::default()
            .render(&ExportRequest::new(&payload, &config))
            .expect("render");
        assert_eq!(rgb_at(&pixmap, 52, 52), (0xf5, 0xf5, 0xf5));
    }

    #[test]
    fn test_rotation_keeps_center() {
        let mut config = QrVisualConfig::default();
        config.position = Position::new(200.0, 100.0);
        config.set_rotation(45.0);
        let pixmap = QrExporter::default()
            .render(&ExportRequest::new(PAYLOAD, &config))
            .expect("render");
        // The unrotated top-left corner is outside the rotated square.
        assert_eq!(rgb_at(&pixmap, 201, 101), (0xf5, 0xf5, 0xf5));
    }

    #[test]
    fn test_png_magic() {
        let config = QrVisualConfig::default();
        let png = QrExporter::new(CanvasSize::new(120, 80))
            .export(&ExportRequest::new(PAYLOAD, &config))
            .expect("export");
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }
}
