//! # Arnote Renderer
//!
//! Raster side of Arnote: QR symbols, composite export and photo sampling.
//!
//! ## Export Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ qrcode matrix│──▶│ SVG (usvg)   │──▶│ resvg pixmap │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │ layer plan
//! ┌──────────────┐   ┌──────────────┐   ┌──────▼───────┐
//! │ data: URIs   │──▶│ image decode │──▶│ tiny-skia    │──▶ PNG
//! └──────────────┘   └──────────────┘   └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capture;
pub mod error;
pub mod export;
pub mod image;
pub mod qr;

pub use capture::{avatar_from_photo, sample_image, sample_photo};
pub use error::{RenderError, RenderResult};
pub use export::{ExportRequest, QrExporter};
pub use image::{decode_data_uri, decode_image, decode_source, DecodedImage, ImageFormat};
pub use qr::{render_qr, ModuleArea, QrMatrix, MAX_QR_SIDE};

/// Renderer version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
