//! Glasses, hats and earrings, each gated by its toggle.

use std::f32::consts::PI;

use crate::avatar::{AvatarConfig, GlassesStyle, HatStyle};
use crate::mesh::{Material, Node, Part, Primitive};

const FULL_TURN: f32 = 2.0 * PI;

fn frame_material() -> Material {
    Material::standard("#1a1a2e", 0.2, 0.8)
}

fn lens_material() -> Material {
    Material::standard("#88ccff", 0.1, 0.3).with_opacity(0.3)
}

fn bar(width: f32, height: f32, depth: f32) -> Primitive {
    Primitive::Cuboid {
        width,
        height,
        depth,
    }
}

fn ring(radius: f32, tube: f32) -> Primitive {
    Primitive::Torus {
        radius,
        tube,
        arc: FULL_TURN,
    }
}

/// Temple arms mirrored at `±x`, yawed outward by `yaw`.
fn arms(x: f32, y: f32, z: f32, yaw: f32, size: (f32, f32, f32)) -> [Node; 2] {
    let frame = frame_material();
    [
        Node::mesh("arm_left", bar(size.0, size.1, size.2), frame.clone())
            .at(-x, y, z)
            .rotate(0.0, -yaw, 0.0),
        Node::mesh("arm_right", bar(size.0, size.1, size.2), frame)
            .at(x, y, z)
            .rotate(0.0, yaw, 0.0),
    ]
}

fn round_glasses() -> Vec<Node> {
    let mut nodes = Vec::new();
    for x in [-0.2, 0.2] {
        nodes.push(Node::mesh("rim", ring(0.14, 0.02), frame_material()).at(x, 0.0, 0.0));
        nodes.push(
            Node::mesh("lens", Primitive::Circle { radius: 0.12 }, lens_material()).at(x, 0.0, 0.0),
        );
    }
    nodes.push(Node::mesh("bridge", bar(0.08, 0.02, 0.02), frame_material()).at(0.0, 0.0, 0.02));
    nodes.extend(arms(0.38, 0.0, -0.1, 0.4, (0.35, 0.02, 0.02)));
    nodes
}

fn square_glasses() -> Vec<Node> {
    let mut nodes = Vec::new();
    for x in [-0.2, 0.2] {
        nodes.push(Node::mesh("rim", bar(0.28, 0.2, 0.02), frame_material()).at(x, 0.0, 0.0));
        nodes.push(
            Node::mesh("rim_inner", bar(0.24, 0.16, 0.01), frame_material()).at(x, 0.0, 0.0),
        );
        nodes.push(
            Node::mesh(
                "lens",
                Primitive::Plane {
                    width: 0.22,
                    height: 0.14,
                },
                lens_material(),
            )
            .at(x, 0.0, 0.01),
        );
    }
    nodes.push(Node::mesh("bridge", bar(0.06, 0.03, 0.02), frame_material()).at(0.0, 0.0, 0.02));
    nodes.extend(arms(0.4, 0.0, -0.1, 0.35, (0.4, 0.025, 0.025)));
    nodes
}

fn cat_eye_glasses() -> Vec<Node> {
    let mut nodes = Vec::new();
    // sign: -1 for the left lens, +1 for the right.
    for sign in [-1.0f32, 1.0] {
        nodes.push(
            Node::group(
                "cat_eye_lens",
                vec![
                    Node::mesh("rim", ring(0.13, 0.025), frame_material())
                        .rotate(0.0, 0.0, -sign * 0.2),
                    Node::mesh("wing", bar(0.08, 0.03, 0.02), frame_material())
                        .at(sign * 0.1, 0.08, 0.0)
                        .rotate(0.0, 0.0, -sign * 0.5),
                    Node::mesh("lens", Primitive::Circle { radius: 0.11 }, lens_material()),
                ],
            )
            .at(sign * 0.2, 0.0, 0.0),
        );
    }
    nodes.push(Node::mesh("bridge", bar(0.06, 0.02, 0.02), frame_material()).at(0.0, -0.02, 0.02));
    nodes.extend(arms(0.38, 0.05, -0.1, 0.4, (0.35, 0.02, 0.02)));
    nodes
}

fn aviator_glasses() -> Vec<Node> {
    let mut nodes = Vec::new();
    for x in [-0.22, 0.22] {
        nodes.push(
            Node::group(
                "aviator_lens",
                vec![
                    Node::mesh("rim", ring(0.15, 0.015), frame_material()),
                    Node::mesh(
                        "teardrop",
                        Primitive::Dome {
                            radius: 0.08,
                            theta_length: PI / 2.0,
                        },
                        frame_material(),
                    )
                    .at(0.0, -0.08, 0.0),
                    Node::mesh("lens", Primitive::Circle { radius: 0.13 }, lens_material())
                        .at(0.0, -0.02, 0.0),
                ],
            )
            .at(x, 0.0, 0.0),
        );
    }
    nodes.push(Node::mesh("bridge", bar(0.1, 0.015, 0.015), frame_material()).at(0.0, 0.03, 0.02));
    nodes.push(
        Node::mesh("bridge_lower", bar(0.08, 0.015, 0.015), frame_material()).at(0.0, -0.02, 0.02),
    );
    nodes.extend(arms(0.42, 0.0, -0.12, 0.35, (0.4, 0.02, 0.02)));
    nodes
}

/// Glasses subtree, or `None` when the toggle is off.
#[must_use]
pub fn glasses(config: &AvatarConfig) -> Option<Node> {
    let style = config.effective_glasses()?;
    let (y, children) = match style {
        GlassesStyle::Round => (1.55, round_glasses()),
        GlassesStyle::Square => (1.55, square_glasses()),
        GlassesStyle::CatEye => (1.55, cat_eye_glasses()),
        GlassesStyle::Aviator => (1.53, aviator_glasses()),
    };
    Some(
        Node::group("glasses_root", children)
            .at(0.0, y, 0.55)
            .tagged(Part::Glasses),
    )
}

fn felt(color: &str, roughness: f32) -> Material {
    Material::standard(color, roughness, 0.0)
}

fn cap() -> (f32, Vec<Node>) {
    (
        2.0,
        vec![
            Node::mesh(
                "cap_dome",
                Primitive::Dome {
                    radius: 0.55,
                    theta_length: PI / 2.0,
                },
                felt("#2563eb", 0.8),
            )
            .at(0.0, 0.0, -0.05),
            Node::mesh(
                "cap_band",
                Primitive::Cylinder {
                    radius_top: 0.56,
                    radius_bottom: 0.56,
                    height: 0.08,
                    open_ended: true,
                },
                felt("#1d4ed8", 0.7),
            )
            .at(0.0, -0.02, 0.0),
            Node::mesh("cap_brim", bar(0.5, 0.03, 0.35), felt("#1e40af", 0.6))
                .at(0.0, -0.02, 0.35)
                .rotate(-0.2, 0.0, 0.0),
            Node::mesh(
                "cap_button",
                Primitive::Sphere { radius: 0.05 },
                felt("#1e40af", 0.5),
            )
            .at(0.0, 0.52, -0.05),
        ],
    )
}

fn beanie() -> (f32, Vec<Node>) {
    (
        2.0,
        vec![
            Node::mesh(
                "beanie_body",
                Primitive::Dome {
                    radius: 0.58,
                    theta_length: 0.6 * PI,
                },
                felt("#dc2626", 0.9),
            )
            .at(0.0, 0.1, -0.05),
            Node::mesh(
                "beanie_band",
                Primitive::Cylinder {
                    radius_top: 0.58,
                    radius_bottom: 0.56,
                    height: 0.15,
                    open_ended: false,
                },
                felt("#b91c1c", 0.95),
            )
            .at(0.0, -0.1, 0.0),
            Node::mesh("beanie_fold", ring(0.57, 0.03), felt("#991b1b", 0.9)).at(0.0, -0.05, 0.0),
            Node::mesh(
                "beanie_pom",
                Primitive::Sphere { radius: 0.12 },
                felt("#fef3c7", 1.0),
            )
            .at(0.0, 0.6, -0.05),
        ],
    )
}

fn cowboy() -> (f32, Vec<Node>) {
    let leather = felt("#92400e", 0.7);
    (
        2.1,
        vec![
            Node::mesh(
                "cowboy_crown",
                Primitive::Cylinder {
                    radius_top: 0.35,
                    radius_bottom: 0.45,
                    height: 0.35,
                    open_ended: false,
                },
                felt("#92400e", 0.8),
            )
            .at(0.0, 0.15, 0.0),
            Node::mesh(
                "cowboy_dent",
                Primitive::Sphere { radius: 0.25 },
                felt("#78350f", 0.8),
            )
            .at(0.0, 0.3, 0.0),
            Node::mesh(
                "cowboy_brim",
                Primitive::Cylinder {
                    radius_top: 0.75,
                    radius_bottom: 0.7,
                    height: 0.05,
                    open_ended: false,
                },
                leather.clone(),
            ),
            Node::mesh("brim_curve_front", bar(0.3, 0.02, 0.15), leather.clone())
                .at(0.0, 0.02, 0.5)
                .rotate(0.3, 0.0, 0.0),
            Node::mesh("brim_curve_back", bar(0.3, 0.02, 0.15), leather)
                .at(0.0, 0.02, -0.5)
                .rotate(-0.3, 0.0, 0.0),
            Node::mesh(
                "cowboy_band",
                Primitive::Cylinder {
                    radius_top: 0.46,
                    radius_bottom: 0.46,
                    height: 0.06,
                    open_ended: false,
                },
                felt("#1f2937", 0.6),
            )
            .at(0.0, 0.05, 0.0),
        ],
    )
}

/// Hat subtree, or `None` when the toggle is off or the style is none.
#[must_use]
pub fn hat(config: &AvatarConfig) -> Option<Node> {
    let (y, children) = match config.effective_hat()? {
        HatStyle::None => return None,
        HatStyle::Cap => cap(),
        HatStyle::Beanie => beanie(),
        HatStyle::Cowboy => cowboy(),
    };
    Some(
        Node::group("hat_root", children)
            .at(0.0, y, 0.0)
            .tagged(Part::Hat),
    )
}

/// Gold hoops at both ears, or `None` when the toggle is off.
#[must_use]
pub fn earrings(config: &AvatarConfig) -> Option<Node> {
    if !config.has_earrings {
        return None;
    }
    let gold = Material::standard("#ffd700", 0.3, 0.9);
    let hoops = [-0.65, 0.65]
        .into_iter()
        .map(|x| {
            Node::group(
                "earring",
                vec![Node::mesh("hoop", ring(0.06, 0.015), gold.clone())],
            )
            .at(x, -0.05, 0.0)
        })
        .collect();
    Some(
        Node::group("earrings_root", hoops)
            .at(0.0, 1.5, 0.0)
            .tagged(Part::Earrings),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glasses_gated_by_toggle() {
        for style in GlassesStyle::ALL {
            let off = AvatarConfig {
                has_glasses: false,
                glasses_style: style,
                ..AvatarConfig::default()
            };
            assert!(glasses(&off).is_none());
            let on = AvatarConfig {
                has_glasses: true,
                ..off
            };
            assert!(glasses(&on).is_some_and(|n| n.part == Some(Part::Glasses)));
        }
    }

    #[test]
    fn test_glasses_styles_differ() {
        let counts: Vec<usize> = GlassesStyle::ALL
            .iter()
            .map(|s| {
                let config = AvatarConfig {
                    has_glasses: true,
                    glasses_style: *s,
                    ..AvatarConfig::default()
                };
                glasses(&config).map_or(0, |n| n.mesh_count())
            })
            .collect();
        assert_eq!(counts, vec![7, 9, 9, 10]);
    }

    #[test]
    fn test_lenses_are_transparent() {
        let config = AvatarConfig {
            has_glasses: true,
            glasses_style: GlassesStyle::Aviator,
            ..AvatarConfig::default()
        };
        let flat = glasses(&config).expect("glasses").flatten();
        let lenses: Vec<_> = flat.iter().filter(|m| m.name == "lens").collect();
        assert_eq!(lenses.len(), 2);
        assert!(lenses.iter().all(|m| m.material.is_transparent()));
    }

    #[test]
    fn test_hat_gating() {
        let styled_off = AvatarConfig {
            has_hat: false,
            hat_style: HatStyle::Cowboy,
            ..AvatarConfig::default()
        };
        assert!(hat(&styled_off).is_none());
        let on_none = AvatarConfig {
            has_hat: true,
            hat_style: HatStyle::None,
            ..AvatarConfig::default()
        };
        assert!(hat(&on_none).is_none());
    }

    #[test]
    fn test_hat_silhouettes() {
        let build = |style| {
            hat(&AvatarConfig {
                has_hat: true,
                hat_style: style,
                ..AvatarConfig::default()
            })
            .expect("hat")
        };
        assert!(build(HatStyle::Cap).find("cap_brim").is_some());
        assert!(build(HatStyle::Beanie).find("beanie_pom").is_some());
        let cowboy = build(HatStyle::Cowboy);
        assert!(cowboy.find("cowboy_brim").is_some());
        assert!((cowboy.transform.position.y - 2.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_earrings() {
        assert!(earrings(&AvatarConfig::default()).is_none());
        let config = AvatarConfig {
            has_earrings: true,
            ..AvatarConfig::default()
        };
        assert_eq!(earrings(&config).map(|n| n.mesh_count()), Some(2));
    }
}
