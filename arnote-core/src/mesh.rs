//! Mesh nodes - the building blocks of the procedural scene graph.
//!
//! Builders return [`Node`] trees of primitives with local transforms and
//! materials. A rendering backend walks the tree itself or consumes the
//! flattened [`MeshInstance`] list produced by [`Node::flatten`].

use serde::{Deserialize, Serialize};

use crate::animation::AnimationTarget;
use crate::spatial::{Mat4, Vec3};

/// A parametric primitive shape, centred on its local origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    /// Full sphere.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// Upper part of a sphere, from the pole down to `theta_length` radians.
    Dome {
        /// Radius.
        radius: f32,
        /// Polar sweep in radians (`PI / 2` is a hemisphere).
        theta_length: f32,
    },
    /// Cylinder with hemispherical caps, aligned to Y.
    Capsule {
        /// Cap and body radius.
        radius: f32,
        /// Length of the straight section.
        length: f32,
    },
    /// Cylinder or truncated cone aligned to Y.
    Cylinder {
        /// Top radius.
        radius_top: f32,
        /// Bottom radius.
        radius_bottom: f32,
        /// Height.
        height: f32,
        /// Whether the end caps are omitted.
        open_ended: bool,
    },
    /// Cone aligned to Y, apex up.
    Cone {
        /// Base radius.
        radius: f32,
        /// Height.
        height: f32,
    },
    /// Ring in the XY plane.
    Torus {
        /// Distance from center to tube center.
        radius: f32,
        /// Tube radius.
        tube: f32,
        /// Swept angle in radians.
        arc: f32,
    },
    /// Axis-aligned box.
    Cuboid {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
        /// Extent along Z.
        depth: f32,
    },
    /// Box with rounded edges.
    RoundedBox {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
        /// Extent along Z.
        depth: f32,
        /// Edge radius.
        radius: f32,
    },
    /// Flat disc in the XY plane.
    Circle {
        /// Radius.
        radius: f32,
    },
    /// Flat rectangle in the XY plane.
    Plane {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
    },
    /// Centred text block in the XY plane.
    Text {
        /// Text content, lines separated by `\n`.
        content: String,
        /// Glyph height in scene units.
        font_size: f32,
        /// Wrapping width in scene units.
        max_width: f32,
    },
}

/// Which faces of a primitive are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Outward faces.
    #[default]
    Front,
    /// Inward faces; used for toon outlines.
    Back,
}

/// Lighting model of a material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    /// Physically based (roughness/metalness).
    #[default]
    Standard,
    /// Flat color, unaffected by lights.
    Unlit,
}

/// Self-illumination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emissive {
    /// Emitted color.
    pub color: String,
    /// Emission strength.
    pub intensity: f32,
}

/// Surface appearance of a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color, passed through verbatim from the config.
    pub color: String,
    /// Surface roughness in `[0, 1]`.
    pub roughness: f32,
    /// Metalness in `[0, 1]`.
    pub metalness: f32,
    /// Opacity in `[0, 1]`; below one the mesh is transparent.
    pub opacity: f32,
    /// Optional self-illumination.
    pub emissive: Option<Emissive>,
    /// Rendered faces.
    pub side: Side,
    /// Lighting model.
    pub shading: Shading,
}

impl Material {
    /// Physically based material.
    #[must_use]
    pub fn standard(color: impl Into<String>, roughness: f32, metalness: f32) -> Self {
        Self {
            color: color.into(),
            roughness,
            metalness,
            opacity: 1.0,
            emissive: None,
            side: Side::Front,
            shading: Shading::Standard,
        }
    }

    /// Unlit material.
    #[must_use]
    pub fn unlit(color: impl Into<String>) -> Self {
        Self {
            shading: Shading::Unlit,
            ..Self::standard(color, 1.0, 0.0)
        }
    }

    /// Set opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Add self-illumination in the base color.
    #[must_use]
    pub fn with_emissive(mut self, intensity: f32) -> Self {
        self.emissive = Some(Emissive {
            color: self.color.clone(),
            intensity,
        });
        self
    }

    /// Render inward faces only.
    #[must_use]
    pub fn back_side(mut self) -> Self {
        self.side = Side::Back;
        self
    }

    /// Whether the material needs blending.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Local transform of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    /// Translation.
    pub position: Vec3,
    /// XYZ Euler rotation in radians.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            scale: Vec3::one(),
        }
    }
}

impl Transform3D {
    /// Local matrix (`T * Rx * Ry * Rz * S`).
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_trs(self.position, self.rotation, self.scale)
    }
}

/// Avatar or scene part a subtree belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    /// Head volume, chin, cheeks and ears.
    Head,
    /// Eyes, eyebrows, nose, mouth and blush.
    Face,
    /// Hair pieces.
    Hair,
    /// Glasses frame and lenses.
    Glasses,
    /// Hat.
    Hat,
    /// Earrings.
    Earrings,
    /// Beard, goatee, mustache or stubble.
    FacialHair,
    /// Neck, torso, arms and hands.
    Body,
    /// AR message placard.
    Sign,
    /// Floating group holding the avatar and the sign.
    Figure,
}

/// Content of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// A drawable primitive.
    Mesh {
        /// Shape.
        primitive: Primitive,
        /// Appearance.
        material: Material,
    },
    /// A transform-only container.
    Group {
        /// Child nodes, in draw order.
        children: Vec<Node>,
    },
}

/// A scene graph node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Stable descriptive name.
    pub name: &'static str,
    /// Local transform.
    pub transform: Transform3D,
    /// Mesh or group content.
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Part tag, inherited by descendants when flattened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<Part>,
    /// Per-frame animation hook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anim: Option<AnimationTarget>,
}

impl Node {
    /// Create a mesh node at the origin.
    #[must_use]
    pub fn mesh(name: &'static str, primitive: Primitive, material: Material) -> Self {
        Self {
            name,
            transform: Transform3D::default(),
            kind: NodeKind::Mesh {
                primitive,
                material,
            },
            part: None,
            anim: None,
        }
    }

    /// Create a group node at the origin.
    #[must_use]
    pub fn group(name: &'static str, children: Vec<Node>) -> Self {
        Self {
            name,
            transform: Transform3D::default(),
            kind: NodeKind::Group { children },
            part: None,
            anim: None,
        }
    }

    /// Set local position.
    #[must_use]
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vec3::new(x, y, z);
        self
    }

    /// Set local XYZ Euler rotation.
    #[must_use]
    pub fn rotate(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vec3::new(x, y, z);
        self
    }

    /// Set local per-axis scale.
    #[must_use]
    pub fn scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.scale = Vec3::new(x, y, z);
        self
    }

    /// Tag this subtree with a part.
    #[must_use]
    pub fn tagged(mut self, part: Part) -> Self {
        self.part = Some(part);
        self
    }

    /// Attach an animation hook.
    #[must_use]
    pub fn animated(mut self, target: AnimationTarget) -> Self {
        self.anim = Some(target);
        self
    }

    /// Child nodes; empty for meshes.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Group { children } => children,
            NodeKind::Mesh { .. } => &[],
        }
    }

    /// Mutable child nodes; `None` for meshes.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Group { children } => Some(children),
            NodeKind::Mesh { .. } => None,
        }
    }

    /// Number of mesh nodes in this subtree.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        match &self.kind {
            NodeKind::Mesh { .. } => 1,
            NodeKind::Group { children } => children.iter().map(Node::mesh_count).sum(),
        }
    }

    /// Depth-first search by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(name))
    }

    /// Depth-first search for the first node carrying an animation hook.
    #[must_use]
    pub fn find_anim(&self, target: AnimationTarget) -> Option<&Node> {
        if self.anim == Some(target) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find_anim(target))
    }

    /// Resolve world matrices and inherited part tags into a draw list.
    #[must_use]
    pub fn flatten(&self) -> Vec<MeshInstance> {
        let mut out = Vec::with_capacity(self.mesh_count());
        self.flatten_into(&Mat4::identity(), None, &mut out);
        out
    }

    fn flatten_into(&self, parent: &Mat4, part: Option<Part>, out: &mut Vec<MeshInstance>) {
        let world = parent.mul(&self.transform.matrix());
        let part = self.part.or(part);
        match &self.kind {
            NodeKind::Mesh {
                primitive,
                material,
            } => out.push(MeshInstance {
                part,
                name: self.name,
                primitive: primitive.clone(),
                material: material.clone(),
                world,
            }),
            NodeKind::Group { children } => {
                for child in children {
                    child.flatten_into(&world, part, out);
                }
            }
        }
    }
}

/// A mesh with its resolved world transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshInstance {
    /// Part tag inherited from the nearest tagged ancestor.
    pub part: Option<Part>,
    /// Node name.
    pub name: &'static str,
    /// Shape.
    pub primitive: Primitive,
    /// Appearance.
    pub material: Material,
    /// Column-major world matrix.
    pub world: Mat4,
}

impl MeshInstance {
    /// World-space origin of the mesh.
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.world.position()
    }
}
