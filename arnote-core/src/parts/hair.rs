//! Hair styles.
//!
//! Pieces covering the crown live in a `hair_top` subgroup that is left out
//! when a hat is worn; sides and back always render.

use std::f32::consts::PI;

use crate::avatar::{AvatarConfig, HairStyle};
use crate::mesh::{Material, Node, Part, Primitive};

use super::{jitter, Materials};

const BASE_Y: f32 = 1.6;

fn sphere(radius: f32) -> Primitive {
    Primitive::Sphere { radius }
}

fn hemisphere(radius: f32) -> Primitive {
    Primitive::Dome {
        radius,
        theta_length: PI / 2.0,
    }
}

fn capsule(radius: f32, length: f32) -> Primitive {
    Primitive::Capsule { radius, length }
}

/// Crown and side/back pieces of a style.
struct Pieces {
    top: Vec<Node>,
    rest: Vec<Node>,
}

#[allow(clippy::cast_precision_loss)]
fn short(hair: &Material) -> Pieces {
    let mut top = vec![Node::mesh("short_cap", hemisphere(0.65), hair.clone()).at(0.0, 0.5, -0.05)];
    for i in 0..10u32 {
        let angle = i as f32 * PI / 5.0;
        top.push(
            Node::mesh(
                "short_bump",
                sphere(0.15 + jitter(i, 2) * 0.06),
                hair.clone(),
            )
            .at(
                angle.cos() * 0.4,
                0.55 + jitter(i, 1) * 0.12,
                angle.sin() * 0.4 - 0.1,
            ),
        );
    }
    let rest = [-0.62, 0.62]
        .into_iter()
        .map(|x| Node::mesh("sideburn", capsule(0.1, 0.18), hair.clone()).at(x, 0.05, -0.1))
        .collect();
    Pieces { top, rest }
}

fn medium(hair: &Material) -> Pieces {
    let top = vec![
        Node::mesh("medium_cap", hemisphere(0.7), hair.clone()).at(0.0, 0.45, -0.1),
        Node::mesh("medium_volume", sphere(0.48), hair.clone()).at(0.0, 0.6, 0.0),
    ];
    let mut rest: Vec<Node> = [-0.58, 0.58]
        .into_iter()
        .map(|x| Node::mesh("medium_side", capsule(0.22, 0.3), hair.clone()).at(x, -0.02, -0.1))
        .collect();
    rest.push(Node::mesh("medium_back", capsule(0.4, 0.35), hair.clone()).at(0.0, 0.02, -0.5));
    Pieces { top, rest }
}

fn long(hair: &Material) -> Pieces {
    let top = vec![Node::mesh("long_cap", hemisphere(0.7), hair.clone()).at(0.0, 0.45, -0.1)];
    let mut rest = Vec::with_capacity(5);
    for x in [-0.6, 0.6] {
        rest.push(Node::mesh("long_side", capsule(0.24, 0.9), hair.clone()).at(x, -0.35, -0.1));
    }
    rest.push(Node::mesh("long_back", capsule(0.48, 0.9), hair.clone()).at(0.0, -0.25, -0.55));
    for x in [-0.35, 0.35] {
        rest.push(
            Node::mesh("long_strand", capsule(0.14, 0.55), hair.clone()).at(x, -0.55, -0.4),
        );
    }
    Pieces { top, rest }
}

#[allow(clippy::cast_precision_loss)]
fn curly(hair: &Material) -> Pieces {
    let mut top: Vec<Node> = (0..14u32)
        .map(|i| {
            let angle = i as f32 / 14.0 * PI * 2.0;
            let radius = 0.4 + (i % 3) as f32 * 0.12;
            Node::mesh(
                "curl_puff",
                sphere(0.18 + (i % 2) as f32 * 0.06),
                hair.clone(),
            )
            .at(
                angle.cos() * radius,
                0.5 + (i as f32 * 2.0).sin() * 0.12,
                angle.sin() * radius - 0.1,
            )
        })
        .collect();
    top.push(Node::mesh("curl_center", sphere(0.42), hair.clone()).at(0.0, 0.6, 0.0));

    let rest = (0..8u32)
        .map(|i| {
            let x = if i < 4 { -0.6 } else { 0.6 };
            Node::mesh("side_curl", sphere(0.14), hair.clone()).at(
                x,
                0.12 - (i % 4) as f32 * 0.22,
                -0.05,
            )
        })
        .collect();
    Pieces { top, rest }
}

fn ponytail(hair: &Material) -> Pieces {
    let top = vec![Node::mesh("ponytail_cap", hemisphere(0.68), hair.clone()).at(0.0, 0.4, -0.1)];
    let mut rest = vec![
        Node::mesh("ponytail_base", sphere(0.22), hair.clone()).at(0.0, 0.25, -0.6),
        Node::mesh("ponytail_tail", capsule(0.15, 0.65), hair.clone())
            .at(0.0, -0.25, -0.65)
            .rotate(0.35, 0.0, 0.0),
        Node::mesh(
            "hair_tie",
            Primitive::Torus {
                radius: 0.12,
                tube: 0.035,
                arc: 2.0 * PI,
            },
            Material::standard("#ff6b9d", 1.0, 0.0),
        )
        .at(0.0, 0.08, -0.6),
    ];
    for x in [-0.55, 0.55] {
        rest.push(
            Node::mesh("ponytail_side", sphere(0.24), hair.clone())
                .at(x, 0.02, -0.2)
                .scale(0.85, 1.0, 0.65),
        );
    }
    Pieces { top, rest }
}

#[allow(clippy::cast_precision_loss)]
fn mohawk(hair: &Material, skin_color: &str) -> Pieces {
    let mut top: Vec<Node> = (0..8u32)
        .map(|i| {
            let step = i as f32;
            Node::mesh(
                "mohawk_spike",
                Primitive::Cone {
                    radius: 0.1,
                    height: 0.3 + step * 0.025,
                },
                hair.clone(),
            )
            .at(0.0, 0.55 + step * 0.025, -0.32 + step * 0.1)
            .rotate(-0.35, 0.0, 0.0)
        })
        .collect();
    top.push(Node::mesh("mohawk_ridge", capsule(0.14, 0.55), hair.clone()).at(0.0, 0.5, -0.1));

    let shaved = Material::standard(skin_color, 0.85, 0.0);
    let rest = [-0.6, 0.6]
        .into_iter()
        .map(|x| {
            Node::mesh("shaved_side", sphere(0.18), shaved.clone())
                .at(x, 0.12, -0.1)
                .scale(1.0, 1.25, 1.0)
        })
        .collect();
    Pieces { top, rest }
}

/// Build the hair subtree, or `None` when bald.
///
/// `hat_present` drops the crown pieces so they do not poke through the hat.
#[must_use]
pub fn build(config: &AvatarConfig, materials: &Materials, hat_present: bool) -> Option<Node> {
    let hair = &materials.hair;
    let pieces = match config.hair_style {
        HairStyle::Bald => return None,
        HairStyle::Short => short(hair),
        HairStyle::Medium => medium(hair),
        HairStyle::Long => long(hair),
        HairStyle::Curly => curly(hair),
        HairStyle::Ponytail => ponytail(hair),
        HairStyle::Mohawk => mohawk(hair, &config.skin_color),
    };

    let mut children = Vec::with_capacity(pieces.rest.len() + 1);
    if !hat_present {
        children.push(Node::group("hair_top", pieces.top));
    }
    children.extend(pieces.rest);

    Some(
        Node::group("hair_root", children)
            .at(0.0, BASE_Y, 0.0)
            .tagged(Part::Hair),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hair(style: HairStyle, hat: bool) -> Option<Node> {
        let config = AvatarConfig {
            hair_style: style,
            ..AvatarConfig::default()
        };
        build(&config, &Materials::for_config(&config), hat)
    }

    #[test]
    fn test_bald_renders_nothing() {
        assert!(hair(HairStyle::Bald, false).is_none());
        assert!(hair(HairStyle::Bald, true).is_none());
    }

    #[test]
    fn test_every_other_style_renders() {
        for style in HairStyle::ALL {
            if style != HairStyle::Bald {
                let node = hair(style, false).expect("hair");
                assert!(node.mesh_count() > 0, "{style:?}");
                assert!(node.find("hair_top").is_some(), "{style:?}");
            }
        }
    }

    #[test]
    fn test_hat_suppresses_only_crown() {
        for style in HairStyle::ALL {
            let (Some(bare), Some(hatted)) = (hair(style, false), hair(style, true)) else {
                continue;
            };
            assert!(hatted.find("hair_top").is_none(), "{style:?}");
            assert!(hatted.mesh_count() > 0, "{style:?} keeps sides");
            let crown = bare.find("hair_top").map_or(0, Node::mesh_count);
            assert_eq!(bare.mesh_count() - crown, hatted.mesh_count());
        }
    }

    #[test]
    fn test_short_hair_is_deterministic() {
        assert_eq!(hair(HairStyle::Short, false), hair(HairStyle::Short, false));
    }

    #[test]
    fn test_piece_counts() {
        assert_eq!(hair(HairStyle::Short, false).map(|n| n.mesh_count()), Some(13));
        assert_eq!(hair(HairStyle::Curly, false).map(|n| n.mesh_count()), Some(23));
        assert_eq!(hair(HairStyle::Mohawk, false).map(|n| n.mesh_count()), Some(11));
    }

    #[test]
    fn test_mohawk_sides_use_skin() {
        let node = hair(HairStyle::Mohawk, true).expect("mohawk");
        let flat = node.flatten();
        assert!(flat
            .iter()
            .any(|m| m.name == "shaved_side" && m.material.color == "#deb887"));
    }
}
