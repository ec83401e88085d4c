//! Eyes, eyebrows, nose, mouth and blush, varied per expression.

use std::f32::consts::PI;

use crate::animation::AnimationTarget;
use crate::avatar::{AvatarConfig, Expression};
use crate::mesh::{Material, Node, Part, Primitive};

use super::Materials;

/// Eye proportions for an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeShape {
    /// Vertical squash of the whole eye.
    pub scale_y: f32,
    /// Vertical offset of iris and pupil.
    pub pupil_y: f32,
    /// Iris size multiplier.
    pub iris_scale: f32,
    /// Left eye drawn closed.
    pub left_wink: bool,
}

/// Eyebrow pose for an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrowShape {
    /// Roll of the left brow; the right brow mirrors it.
    pub rotation: f32,
    /// Height above the face center.
    pub y: f32,
    /// Horizontal stretch.
    pub scale: f32,
}

/// Eye proportions per expression.
#[must_use]
pub fn eye_shape(expression: Expression) -> EyeShape {
    let (scale_y, pupil_y, iris_scale) = match expression {
        Expression::Happy => (0.75, 0.02, 1.1),
        Expression::Surprised => (1.3, 0.0, 0.9),
        Expression::Wink | Expression::Neutral => (1.0, 0.0, 1.0),
    };
    EyeShape {
        scale_y,
        pupil_y,
        iris_scale,
        left_wink: expression == Expression::Wink,
    }
}

/// Eyebrow pose per expression.
#[must_use]
pub fn brow_shape(expression: Expression) -> BrowShape {
    let (rotation, y, scale) = match expression {
        Expression::Happy => (-0.15, 0.38, 1.1),
        Expression::Surprised => (0.2, 0.45, 1.2),
        Expression::Wink => (-0.1, 0.38, 1.0),
        Expression::Neutral => (0.0, 0.35, 1.0),
    };
    BrowShape { rotation, y, scale }
}

fn sphere(radius: f32) -> Primitive {
    Primitive::Sphere { radius }
}

fn eye(
    name: &'static str,
    x: f32,
    shape: EyeShape,
    closed: bool,
    config: &AvatarConfig,
    materials: &Materials,
) -> Node {
    let white = Material::standard("#ffffff", 0.2, 0.0);
    let mut children = vec![Node::mesh("eye_white", sphere(0.18), white).scale(
        1.0,
        shape.scale_y,
        0.85,
    )];

    if closed {
        children.push(
            Node::mesh(
                "eye_wink",
                Primitive::Torus {
                    radius: 0.1,
                    tube: 0.025,
                    arc: PI,
                },
                Material::standard(config.skin_color.clone(), 1.0, 0.0),
            )
            .rotate(0.0, 0.0, 0.1),
        );
    } else {
        let py = shape.pupil_y;
        let sparkle = |intensity| Material::standard("#ffffff", 1.0, 0.0).with_emissive(intensity);
        children.extend([
            Node::mesh("iris", sphere(0.11), materials.eye.clone())
                .at(0.0, py, 0.1)
                .scale(shape.iris_scale, shape.scale_y * shape.iris_scale, 1.0),
            Node::mesh(
                "pupil",
                sphere(0.055),
                Material::standard("#1a1a1a", 0.1, 0.0),
            )
            .at(0.0, py, 0.14)
            .scale(1.0, shape.scale_y, 1.0),
            Node::mesh("highlight", sphere(0.035), sparkle(0.8))
                .at(0.04, py + 0.04, 0.17)
                .scale(1.0, shape.scale_y, 1.0),
            Node::mesh("sparkle", sphere(0.018), sparkle(0.6))
                .at(-0.03, py - 0.02, 0.16)
                .scale(1.0, shape.scale_y, 1.0),
        ]);
    }

    Node::group(name, children).at(x, 0.08, 0.55)
}

fn mouth(expression: Expression) -> Node {
    let lip = Material::standard("#e07070", 0.4, 0.0);
    let (scale, children) = match expression {
        Expression::Happy => (
            1.3,
            vec![
                Node::mesh(
                    "smile",
                    Primitive::Torus {
                        radius: 0.1,
                        tube: 0.03,
                        arc: PI,
                    },
                    lip,
                )
                .rotate(PI, 0.0, 0.0),
                Node::mesh(
                    "teeth",
                    Primitive::Cuboid {
                        width: 0.12,
                        height: 0.04,
                        depth: 0.02,
                    },
                    Material::standard("#ffffff", 1.0, 0.0),
                )
                .at(0.0, 0.02, 0.01),
            ],
        ),
        Expression::Surprised => (
            1.2,
            vec![
                Node::mesh(
                    "open_lips",
                    Primitive::Torus {
                        radius: 0.07,
                        tube: 0.025,
                        arc: 2.0 * PI,
                    },
                    lip,
                ),
                Node::mesh(
                    "open_inside",
                    Primitive::Circle { radius: 0.05 },
                    Material::standard("#3d1f1f", 1.0, 0.0),
                )
                .at(0.0, 0.0, -0.01),
            ],
        ),
        Expression::Wink => (
            1.1,
            vec![Node::group(
                "smirk",
                vec![Node::mesh(
                    "smirk_lips",
                    Primitive::Torus {
                        radius: 0.08,
                        tube: 0.025,
                        arc: PI,
                    },
                    lip,
                )
                .rotate(PI, 0.0, 0.0)],
            )
            .rotate(0.0, 0.0, 0.2)],
        ),
        Expression::Neutral => (
            1.0,
            vec![Node::mesh(
                "flat_lips",
                Primitive::Capsule {
                    radius: 0.025,
                    length: 0.08,
                },
                lip,
            )],
        ),
    };
    Node::group("mouth", children)
        .at(0.0, -0.3, 0.55)
        .scale(scale, scale, 1.0)
}

/// Build the facial features. With `animated`, the eye groups carry blink
/// hooks.
#[must_use]
pub fn build(config: &AvatarConfig, materials: &Materials, animated: bool) -> Node {
    let shape = eye_shape(config.expression);
    let brow = brow_shape(config.expression);

    let mut left = eye("eye_left", -0.22, shape, shape.left_wink, config, materials);
    let mut right = eye("eye_right", 0.22, shape, false, config, materials);
    if animated {
        left = left.animated(AnimationTarget::LeftEye);
        right = right.animated(AnimationTarget::RightEye);
    }

    let brow_capsule = Primitive::Capsule {
        radius: 0.035,
        length: 0.12,
    };
    let mut children = vec![
        left,
        right,
        Node::mesh("brow_left", brow_capsule.clone(), materials.hair.clone())
            .at(-0.22, brow.y, 0.58)
            .rotate(0.0, 0.0, brow.rotation)
            .scale(brow.scale, 1.0, 1.0),
        Node::mesh("brow_right", brow_capsule, materials.hair.clone())
            .at(0.22, brow.y, 0.58)
            .rotate(0.0, 0.0, -brow.rotation)
            .scale(brow.scale, 1.0, 1.0),
        Node::group(
            "nose",
            vec![Node::mesh("nose_tip", sphere(0.07), materials.skin.clone())],
        )
        .at(0.0, -0.08, 0.62),
        mouth(config.expression),
    ];

    if config.expression == Expression::Happy {
        let blush = Material::standard("#ffb0b0", 1.0, 0.0).with_opacity(0.4);
        for (name, x) in [("blush_left", -0.4), ("blush_right", 0.4)] {
            children.push(
                Node::mesh(name, Primitive::Circle { radius: 0.08 }, blush.clone())
                    .at(x, -0.05, 0.5),
            );
        }
    }

    Node::group("face_root", children)
        .at(0.0, 1.6, 0.0)
        .tagged(Part::Face)
}
