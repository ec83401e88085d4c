//! # Arnote Core
//!
//! Domain logic for location reminders viewed through a QR code: the
//! procedural 3D avatar shown in the AR overlay and the QR visual
//! compositor used to style printable codes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 arnote-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Avatar            │  QR Compositor         │
//! │  - Config/normalize│  - Visual config       │
//! │  - Part builders   │  - Drag state machine  │
//! │  - Assembler       │  - Export layer plan   │
//! │  - Animation       │  - Payload URL         │
//! ├─────────────────────────────────────────────┤
//! │  AR Scene          │  Sessions              │
//! │  - Sign layout     │  - Editors + store     │
//! │  - Camera/orbit    │  - Lifecycle guards    │
//! │  - Capture colors  │  - Analytics           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure mapping from configuration to data. Rendering
//! backends consume the flattened [`MeshInstance`] lists and export
//! [`Layer`](qr::layers::Layer) plans.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analytics;
pub mod animation;
pub mod ar;
pub mod assembler;
pub mod avatar;
pub mod camera;
pub mod capture;
pub mod color;
pub mod editor;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod mesh;
pub mod parts;
pub mod qr;
pub mod sign;
pub mod spatial;
pub mod store;

pub use analytics::{AnalyticsOverview, QrDetail, ReminderInfo, ViewMode, Visit};
pub use animation::{AnimationRates, AnimationState, AnimationTarget};
pub use ar::{figure, ArViewer, ScaleControl};
pub use assembler::{assemble, assemble_with, AssembleOptions, AvatarModel};
pub use avatar::{
    detect_schema, normalize, normalize_str, AvatarConfig, AvatarPatch, BodyStyle, Expression,
    FaceShape, FacialHairStyle, GlassesStyle, HairStyle, HatStyle, SchemaGeneration,
};
pub use camera::{CameraError, CameraSession, CameraState, FacingMode, VideoConstraints};
pub use capture::{extract_colors, generate_avatar_config, PixelView, SampledColors};
pub use color::{map_to_palette, Rgb};
pub use editor::{AvatarEditor, QrEditor};
pub use error::{StoreError, StoreResult};
pub use event::{DragAction, InputEvent, PointerPhase, TouchEvent, TouchPhase, TouchPoint};
pub use lifecycle::{Mount, MountHandle, ReleaseHub, ReleaseSubscription};
pub use mesh::{Material, MeshInstance, Node, Part, Primitive, Transform3D};
pub use qr::compositor::QrCompositor;
pub use qr::payload::{download_filename, qr_payload};
pub use qr::{CanvasSize, ErrorCorrection, Position, QrStylePatch, QrVisualConfig};
pub use sign::{layout, sign_node, SignLayout, SignStyle};
pub use spatial::{Camera, Mat4, OrbitControls, OrbitLimits, Vec3};
pub use store::{ConfigStore, MemoryStore, RecordKey, RecordKind};

/// Core library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
