//! Neck, torso, shoulders, arms and hands.

use std::f32::consts::PI;

use crate::animation::AnimationTarget;
use crate::avatar::{AvatarConfig, BodyStyle};
use crate::mesh::{Material, Node, Part, Primitive};

use super::Materials;

/// Width and size multipliers for a body build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proportions {
    /// Torso top radius.
    pub torso_width: f32,
    /// Torso bottom radius.
    pub torso_width_bottom: f32,
    /// Shoulder capsule length.
    pub shoulder_width: f32,
    /// Shoulder capsule radius.
    pub shoulder_size: f32,
    /// Arm radius.
    pub arm_size: f32,
}

impl Proportions {
    /// Fixed tuple for a body style.
    #[must_use]
    pub fn for_style(style: BodyStyle) -> Self {
        let (torso_width, torso_width_bottom, shoulder_width, shoulder_size, arm_size) =
            match style {
                BodyStyle::Slim => (0.28, 0.32, 0.7, 0.12, 0.07),
                BodyStyle::Average => (0.32, 0.38, 0.82, 0.15, 0.08),
                BodyStyle::Athletic => (0.38, 0.42, 0.95, 0.18, 0.1),
            };
        Self {
            torso_width,
            torso_width_bottom,
            shoulder_width,
            shoulder_size,
            arm_size,
        }
    }
}

/// One arm; `side` is -1 for left and +1 for right.
fn arm(side: f32, p: Proportions, skin: &Material, shirt: &Material) -> Node {
    let hand = Node::group(
        "hand",
        vec![
            Node::mesh("palm", Primitive::Sphere { radius: p.arm_size * 1.4 }, skin.clone()),
            Node::mesh(
                "thumb",
                Primitive::Capsule {
                    radius: 0.025,
                    length: 0.04,
                },
                skin.clone(),
            )
            .at(-side * 0.06, 0.02, 0.04)
            .rotate(0.0, 0.0, side * 0.5),
        ],
    )
    .at(side * 0.08, -0.45, 0.08);

    Node::group(
        if side < 0.0 { "arm_left" } else { "arm_right" },
        vec![
            Node::mesh(
                "upper_arm",
                Primitive::Capsule {
                    radius: p.arm_size,
                    length: 0.18,
                },
                shirt.clone(),
            )
            .rotate(0.0, 0.0, -side * 0.2),
            Node::mesh(
                "forearm",
                Primitive::Capsule {
                    radius: p.arm_size * 0.9,
                    length: 0.16,
                },
                skin.clone(),
            )
            .at(side * 0.05, -0.28, 0.04)
            .rotate(0.15, 0.0, -side * 0.15),
            hand,
        ],
    )
    .at(side * 0.45, 0.62, 0.0)
}

/// Build the body. With `animated`, the root carries the breathing hook.
#[must_use]
pub fn build(config: &AvatarConfig, materials: &Materials, animated: bool) -> Node {
    let p = Proportions::for_style(config.body_style);
    let skin = &materials.skin;
    let shirt = Material::standard("#6366f1", 0.7, 0.0);
    let torso = Primitive::Cylinder {
        radius_top: p.torso_width,
        radius_bottom: p.torso_width_bottom,
        height: 0.7,
        open_ended: false,
    };

    let children = vec![
        Node::mesh(
            "neck",
            Primitive::Cylinder {
                radius_top: 0.12,
                radius_bottom: 0.15,
                height: 0.12,
                open_ended: false,
            },
            skin.clone(),
        )
        .at(0.0, 1.0, 0.0),
        Node::mesh("torso_outline", torso.clone(), materials.outline.clone())
            .at(0.0, 0.55, 0.0)
            .scale(1.03, 1.03, 1.03),
        Node::mesh("torso", torso, shirt.clone()).at(0.0, 0.55, 0.0),
        Node::mesh(
            "collar",
            Primitive::Torus {
                radius: 0.15,
                tube: 0.04,
                arc: 2.0 * PI,
            },
            shirt.clone(),
        )
        .at(0.0, 0.92, 0.0),
        Node::mesh(
            "shoulders",
            Primitive::Capsule {
                radius: p.shoulder_size,
                length: p.shoulder_width,
            },
            shirt.clone(),
        )
        .at(0.0, 0.8, 0.0)
        .rotate(0.0, 0.0, PI / 2.0),
        arm(-1.0, p, skin, &shirt),
        arm(1.0, p, skin, &shirt),
    ];

    let root = Node::group("body_root", children).tagged(Part::Body);
    if animated {
        root.animated(AnimationTarget::Torso)
    } else {
        root
    }
}
