//! QR symbol rendering.
//!
//! The payload is encoded with [`qrcode`], turned into an SVG of dark
//! modules and rasterized through usvg/resvg. Styling only changes how the
//! modules are painted; the encoded payload is exactly the string passed in.

use std::fmt::Write;

use arnote_core::qr::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use arnote_core::{ErrorCorrection, QrVisualConfig, Rgb};
use qrcode::{EcLevel, QrCode};

use crate::error::{RenderError, RenderResult};
use crate::image::DecodedImage;

/// Largest symbol side, in pixels, that [`render_qr`] will rasterize.
pub const MAX_QR_SIDE: u32 = 4096;

/// Module-aligned square cleared for the center logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleArea {
    /// First column.
    pub x: usize,
    /// First row.
    pub y: usize,
    /// Columns covered.
    pub width: usize,
    /// Rows covered.
    pub height: usize,
}

impl ModuleArea {
    /// Modules covered by a centered logo of `logo_px` on a symbol drawn at
    /// `size_px`. Partially covered modules are included.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn centered(modules: usize, size_px: f32, logo_px: u32) -> Self {
        let cells = modules as f32;
        let scale = cells / size_px.max(1.0);
        let side = (logo_px as f32 * scale).min(cells);
        let origin = (cells - side) / 2.0;
        let start = origin.floor().max(0.0);
        let span = (side + origin - start).ceil();
        let start = start as usize;
        let span = (span as usize).min(modules - start);
        Self {
            x: start,
            y: start,
            width: span,
            height: span,
        }
    }

    /// Whether module `(x, y)` lies inside the area.
    #[must_use]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x..self.x + self.width).contains(&x) && (self.y..self.y + self.height).contains(&y)
    }
}

/// Dark/light module grid of one QR symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Encode `payload` at the given error-correction level.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::QrEncode`] if the payload is too long.
    pub fn encode(payload: &str, level: ErrorCorrection) -> RenderResult<Self> {
        let ec = match level {
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::High => EcLevel::H,
        };
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ec)
            .map_err(|e| RenderError::QrEncode(e.to_string()))?;
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        Ok(Self {
            width: code.width(),
            modules,
        })
    }

    /// Modules per side.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the module at column `x`, row `y` is dark.
    #[must_use]
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// Number of dark modules.
    #[must_use]
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| **m).count()
    }

    /// Clear every module inside `area`.
    pub fn excavate(&mut self, area: ModuleArea) {
        for y in area.y..(area.y + area.height).min(self.width) {
            for x in area.x..(area.x + area.width).min(self.width) {
                self.modules[y * self.width + x] = false;
            }
        }
    }

    /// SVG drawing of the symbol at `size_px`, no quiet zone.
    #[must_use]
    pub fn to_svg(&self, size_px: u32, foreground: Rgb, background: Rgb) -> String {
        let n = self.width;
        let mut svg = String::with_capacity(64 + self.modules.len() * 4);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size_px}\" height=\"{size_px}\" viewBox=\"0 0 {n} {n}\" shape-rendering=\"crispEdges\">"
        );
        let _ = write!(
            svg,
            "<rect width=\"{n}\" height=\"{n}\" fill=\"{}\"/>",
            background.to_hex()
        );
        let _ = write!(svg, "<path fill=\"{}\" d=\"", foreground.to_hex());
        for y in 0..n {
            for x in 0..n {
                if self.modules[y * n + x] {
                    let _ = write!(svg, "M{x} {y}h1v1h-1z");
                }
            }
        }
        svg.push_str("\"/></svg>");
        svg
    }
}

/// Render the styled QR for `payload` as a square pixmap of `config.size`.
///
/// With a center logo the symbol uses level H, clears the modules under the
/// logo and paints the logo centered at [`QrVisualConfig::logo_pixels`].
///
/// # Errors
///
/// Returns [`RenderError`] if the payload cannot be encoded, the side exceeds
/// [`MAX_QR_SIDE`] or the symbol cannot be rasterized. A logo that fails to
/// convert is skipped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_qr(
    payload: &str,
    config: &QrVisualConfig,
    logo: Option<&DecodedImage>,
) -> RenderResult<tiny_skia::Pixmap> {
    let side = config.size.round().max(1.0) as u32;
    if side > MAX_QR_SIDE {
        return Err(RenderError::Rasterize(format!(
            "QR side {side}px exceeds {MAX_QR_SIDE}px"
        )));
    }
    let level = ErrorCorrection::for_logo(logo.is_some());
    let mut matrix = QrMatrix::encode(payload, level)?;
    let logo_px = config.logo_pixels();
    if logo.is_some() {
        matrix.excavate(ModuleArea::centered(matrix.width(), config.size, logo_px));
    }

    let foreground = color_or(&config.foreground, DEFAULT_FOREGROUND);
    let background = color_or(&config.background, DEFAULT_BACKGROUND);
    let mut pixmap = rasterize_svg(&matrix.to_svg(side, foreground, background))?;

    if let Some(logo) = logo {
        match logo.to_pixmap() {
            Ok(logo_pixmap) => draw_logo(&mut pixmap, &logo_pixmap, side, logo_px),
            Err(e) => tracing::warn!("Skipping center logo: {e}"),
        }
    }
    Ok(pixmap)
}

#[allow(clippy::cast_precision_loss)]
fn draw_logo(target: &mut tiny_skia::Pixmap, logo: &tiny_skia::Pixmap, side: u32, logo_px: u32) {
    if logo_px == 0 {
        return;
    }
    let dest = logo_px as f32;
    let offset = (side as f32 - dest) / 2.0;
    let transform = tiny_skia::Transform::from_row(
        dest / logo.width() as f32,
        0.0,
        0.0,
        dest / logo.height() as f32,
        offset,
        offset,
    );
    let paint = tiny_skia::PixmapPaint {
        quality: tiny_skia::FilterQuality::Bilinear,
        ..tiny_skia::PixmapPaint::default()
    };
    target.draw_pixmap(0, 0, logo.as_ref(), &paint, transform, None);
}

pub(crate) fn color_or(value: &str, fallback: &str) -> Rgb {
    Rgb::parse_hex(value)
        .or_else(|| Rgb::parse_hex(fallback))
        .unwrap_or(Rgb::new(0, 0, 0))
}

/// Rasterize an SVG string to a tiny-skia pixmap at its intrinsic size.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn rasterize_svg(svg: &str) -> RenderResult<tiny_skia::Pixmap> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| RenderError::Rasterize(format!("SVG parsing failed: {e}")))?;

    let px_w = tree.size().width().round() as u32;
    let px_h = tree.size().height().round() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
        .ok_or_else(|| RenderError::Rasterize("failed to create pixmap".to_string()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(pixmap)
}
