//! Beard, goatee, mustache and stubble.

use std::f32::consts::PI;

use crate::avatar::{AvatarConfig, FacialHairStyle};
use crate::mesh::{Material, Node, Part, Primitive};

use super::{jitter, Materials};

const JAW_DOTS: u32 = 30;
const LIP_DOTS: u32 = 10;

fn capsule(radius: f32, length: f32) -> Primitive {
    Primitive::Capsule { radius, length }
}

fn beard(hair: &Material) -> Vec<Node> {
    let mut nodes = vec![
        Node::mesh(
            "beard_cover",
            Primitive::Dome {
                radius: 0.3,
                theta_length: PI / 2.0,
            },
            hair.clone(),
        )
        .at(0.0, -0.4, 0.35)
        .scale(1.2, 1.0, 0.8),
        Node::mesh("beard_chin", Primitive::Sphere { radius: 0.2 }, hair.clone())
            .at(0.0, -0.55, 0.25),
    ];
    for sign in [-1.0f32, 1.0] {
        nodes.push(
            Node::mesh("beard_side", capsule(0.1, 0.25), hair.clone()).at(sign * 0.4, -0.2, 0.2),
        );
        nodes.push(
            Node::mesh("beard_jaw", capsule(0.08, 0.2), hair.clone())
                .at(sign * 0.35, -0.35, 0.25)
                .rotate(0.0, 0.0, -sign * 0.3),
        );
        nodes.push(
            Node::mesh("beard_mustache", capsule(0.03, 0.1), hair.clone())
                .at(sign * 0.08, -0.22, 0.52)
                .rotate(0.0, 0.0, -sign * 0.2),
        );
    }
    nodes
}

fn goatee(hair: &Material) -> Vec<Node> {
    let mut nodes = vec![
        Node::mesh("goatee_chin", Primitive::Sphere { radius: 0.15 }, hair.clone())
            .at(0.0, -0.45, 0.4),
        Node::mesh("goatee_tuft", capsule(0.08, 0.12), hair.clone()).at(0.0, -0.55, 0.32),
        Node::mesh("soul_patch", Primitive::Sphere { radius: 0.06 }, hair.clone())
            .at(0.0, -0.35, 0.48),
    ];
    for sign in [-1.0f32, 1.0] {
        nodes.push(
            Node::mesh("goatee_mustache", capsule(0.025, 0.08), hair.clone())
                .at(sign * 0.06, -0.22, 0.52)
                .rotate(0.0, 0.0, -sign * 0.15),
        );
    }
    nodes
}

fn mustache(hair: &Material) -> Vec<Node> {
    let mut nodes =
        vec![Node::mesh("mustache_center", capsule(0.035, 0.02), hair.clone()).at(0.0, -0.2, 0.52)];
    for sign in [-1.0f32, 1.0] {
        nodes.push(
            Node::mesh("mustache_side", capsule(0.03, 0.12), hair.clone())
                .at(sign * 0.1, -0.2, 0.5)
                .rotate(0.0, 0.0, -sign * 0.4),
        );
        nodes.push(
            Node::mesh("mustache_tip", capsule(0.02, 0.04), hair.clone())
                .at(sign * 0.18, -0.18, 0.45)
                .rotate(0.0, 0.0, -sign * 0.8),
        );
    }
    nodes
}

/// Scattered translucent dots along the jaw and upper lip.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn stubble(hair_color: &str) -> Vec<Node> {
    let dot = Material::standard(hair_color, 1.0, 0.0).with_opacity(0.7);
    let jaw = (0..JAW_DOTS).map(|i| {
        let angle = i as f32 / JAW_DOTS as f32 * PI;
        let radius = 0.3 + jitter(i, 11) * 0.15;
        (
            angle.cos() * radius * 0.8,
            -0.35 - jitter(i, 12) * 0.2,
            0.35 + angle.sin() * 0.15,
        )
    });
    let lip = (0..LIP_DOTS).map(|i| ((i as f32 - 5.0) * 0.03, -0.22, 0.5));

    jaw.chain(lip)
        .enumerate()
        .map(|(i, (x, y, z))| {
            let size = 0.012 + jitter(i as u32, 13) * 0.005;
            Node::mesh("stubble_dot", Primitive::Sphere { radius: size }, dot.clone()).at(x, y, z)
        })
        .collect()
}

/// Facial hair subtree, or `None` when the toggle is off or the style is
/// none.
#[must_use]
pub fn build(config: &AvatarConfig, materials: &Materials) -> Option<Node> {
    let hair = &materials.hair;
    let children = match config.effective_facial_hair()? {
        FacialHairStyle::None => return None,
        FacialHairStyle::Beard => beard(hair),
        FacialHairStyle::Goatee => goatee(hair),
        FacialHairStyle::Mustache => mustache(hair),
        FacialHairStyle::Stubble => stubble(&config.hair_color),
    };
    Some(
        Node::group("facial_hair_root", children)
            .at(0.0, 1.5, 0.0)
            .tagged(Part::FacialHair),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facial_hair(enabled: bool, style: FacialHairStyle) -> Option<Node> {
        let config = AvatarConfig {
            has_facial_hair: enabled,
            facial_hair_style: style,
            ..AvatarConfig::default()
        };
        build(&config, &Materials::for_config(&config))
    }

    #[test]
    fn test_toggle_off_renders_nothing() {
        for style in FacialHairStyle::ALL {
            assert!(facial_hair(false, style).is_none());
        }
        assert!(facial_hair(true, FacialHairStyle::None).is_none());
    }

    #[test]
    fn test_style_piece_counts() {
        let count = |s| facial_hair(true, s).map(|n| n.mesh_count());
        assert_eq!(count(FacialHairStyle::Beard), Some(8));
        assert_eq!(count(FacialHairStyle::Goatee), Some(5));
        assert_eq!(count(FacialHairStyle::Mustache), Some(5));
        assert_eq!(count(FacialHairStyle::Stubble), Some(40));
    }

    #[test]
    fn test_stubble_is_small_translucent_and_stable() {
        let a = facial_hair(true, FacialHairStyle::Stubble).expect("stubble");
        let b = facial_hair(true, FacialHairStyle::Stubble).expect("stubble");
        assert_eq!(a, b);
        for mesh in a.flatten() {
            assert!(mesh.material.is_transparent());
            assert_eq!(mesh.material.color, "#4a3728");
            match mesh.primitive {
                Primitive::Sphere { radius } => assert!((0.012..0.017).contains(&radius)),
                ref other => panic!("unexpected primitive {other:?}"),
            }
        }
    }
}
