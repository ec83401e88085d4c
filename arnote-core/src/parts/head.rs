//! Head volume with chin, cheeks and ears.

use crate::avatar::{AvatarConfig, FaceShape};
use crate::mesh::{Node, Part, Primitive};

use super::Materials;

const HEAD_RADIUS: f32 = 0.75;

/// Non-uniform head scale per face shape.
#[must_use]
pub fn head_scale(shape: FaceShape) -> (f32, f32, f32) {
    match shape {
        FaceShape::Round => (1.1, 1.0, 1.0),
        FaceShape::Oval => (0.95, 1.1, 0.95),
        FaceShape::Square => (1.15, 0.95, 1.05),
        FaceShape::Heart => (1.0, 1.05, 0.95),
    }
}

/// Chin radius and vertical offset per face shape.
#[must_use]
pub fn chin(shape: FaceShape) -> (f32, f32) {
    match shape {
        FaceShape::Round => (0.3, -0.5),
        FaceShape::Oval => (0.25, -0.55),
        FaceShape::Square => (0.35, -0.45),
        FaceShape::Heart => (0.2, -0.52),
    }
}

/// Right-cheek offset per face shape; the left cheek mirrors it.
#[must_use]
pub fn cheek_offset(shape: FaceShape) -> (f32, f32, f32) {
    match shape {
        FaceShape::Round => (0.47, -0.05, 0.35),
        FaceShape::Oval => (0.43, -0.08, 0.33),
        FaceShape::Square => (0.48, -0.1, 0.34),
        FaceShape::Heart => (0.45, 0.0, 0.35),
    }
}

/// Build the head subtree.
#[must_use]
pub fn build(config: &AvatarConfig, materials: &Materials) -> Node {
    let (sx, sy, sz) = head_scale(config.face_shape);
    let (chin_size, chin_y) = chin(config.face_shape);
    let (cx, cy, cz) = cheek_offset(config.face_shape);
    let skin = &materials.skin;
    let sphere = |radius| Primitive::Sphere { radius };

    let mut children = vec![
        Node::mesh("head_outline", sphere(HEAD_RADIUS), materials.outline.clone())
            .scale(sx * 1.03, sy * 1.03, sz * 1.03),
        Node::mesh("head", sphere(HEAD_RADIUS), skin.clone()).scale(sx, sy, sz),
        Node::mesh("chin", sphere(chin_size), skin.clone()).at(0.0, chin_y, 0.2),
    ];
    for (name, x) in [("cheek_left", -cx), ("cheek_right", cx)] {
        children.push(
            Node::mesh(name, sphere(0.22), skin.clone())
                .at(x, cy, cz)
                .scale(0.7, 0.6, 0.6),
        );
    }
    for (name, x) in [("ear_left", -0.68), ("ear_right", 0.68)] {
        children.push(Node::mesh(name, sphere(0.12), skin.clone()).at(x, 0.05, 0.0));
    }

    Node::group("head_root", children)
        .at(0.0, 1.6, 0.0)
        .tagged(Part::Head)
}
