//! Export layer planning.
//!
//! The raster backend draws the returned layers in order. The background
//! (image or flat fill) always comes first and the QR last.

use serde::Serialize;

use super::{CanvasSize, QrVisualConfig};

/// Fill used when no background image is available.
pub const FALLBACK_FILL: &str = "#f5f5f5";

/// 2D affine transform in canvas convention:
/// `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Affine {
    /// X scale.
    pub a: f32,
    /// Y skew.
    pub b: f32,
    /// X skew.
    pub c: f32,
    /// Y scale.
    pub d: f32,
    /// X translation.
    pub e: f32,
    /// Y translation.
    pub f: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    /// No-op transform.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Pure translation.
    #[must_use]
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::identity()
        }
    }

    /// Clockwise rotation (y down) about the origin, in degrees.
    #[must_use]
    pub fn rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self` followed by `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Rotation about `(cx, cy)`: translate to the center, rotate, translate
    /// back.
    #[must_use]
    pub fn rotate_about(degrees: f32, cx: f32, cy: f32) -> Self {
        Self::translate(-cx, -cy)
            .then(&Self::rotate(degrees))
            .then(&Self::translate(cx, cy))
    }

    /// Map a point.
    #[must_use]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// The full canvas.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn canvas(canvas: CanvasSize) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: canvas.width as f32,
            height: canvas.height as f32,
        }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One drawing step of an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum Layer {
    /// Flat color over `rect`.
    Fill {
        /// Hex color.
        color: String,
        /// Area to fill.
        rect: Rect,
    },
    /// Background image stretched over `rect`.
    BaseImage {
        /// Destination.
        rect: Rect,
    },
    /// QR image drawn into `rect`, transformed and faded.
    Qr {
        /// Destination before the transform.
        rect: Rect,
        /// Rotation about the QR center.
        transform: Affine,
        /// Layer opacity in `[0, 1]`.
        opacity: f32,
    },
}

/// Plan an export.
///
/// `has_base_image` says whether a background image decoded; without one
/// the canvas is filled with [`FALLBACK_FILL`]. `has_qr` says whether the QR
/// source is drawable; without one the QR layer is skipped.
#[must_use]
pub fn plan_export(
    config: &QrVisualConfig,
    canvas: CanvasSize,
    has_base_image: bool,
    has_qr: bool,
) -> Vec<Layer> {
    let full = Rect::canvas(canvas);
    let mut layers = Vec::with_capacity(2);
    if has_base_image {
        layers.push(Layer::BaseImage { rect: full });
    } else {
        layers.push(Layer::Fill {
            color: FALLBACK_FILL.to_string(),
            rect: full,
        });
    }

    if has_qr {
        let rect = Rect {
            x: config.position.x,
            y: config.position.y,
            width: config.size,
            height: config.size,
        };
        let (cx, cy) = rect.center();
        layers.push(Layer::Qr {
            rect,
            transform: Affine::rotate_about(config.rotation, cx, cy),
            opacity: config.opacity.clamp(0.0, 1.0),
        });
    }
    layers
}
