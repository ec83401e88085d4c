//! Procedural avatar assembly.
//!
//! [`assemble`] is a pure mapping from an [`AvatarConfig`] to a scene graph.
//! Animation is applied afterwards by posing the tree with an
//! [`AnimationState`].

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationState, AnimationTarget};
use crate::avatar::AvatarConfig;
use crate::mesh::{MeshInstance, Node, Part};
use crate::parts::{self, Materials};

/// Switches for [`assemble_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssembleOptions {
    /// Attach blink and breathing hooks.
    pub animated: bool,
    /// Attach the constant-rate yaw hook to the root.
    pub idle_rotation: bool,
}

/// An assembled avatar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarModel {
    /// Root group holding every part.
    pub root: Node,
    /// Whether animation hooks were attached.
    pub animated: bool,
}

impl AvatarModel {
    /// Static draw list.
    #[must_use]
    pub fn flatten(&self) -> Vec<MeshInstance> {
        self.root.flatten()
    }

    /// Draw list posed for one frame.
    #[must_use]
    pub fn flatten_posed(&self, state: &AnimationState) -> Vec<MeshInstance> {
        self.root.posed(state).flatten()
    }

    /// Whether any mesh belongs to `part`.
    #[must_use]
    pub fn contains_part(&self, part: Part) -> bool {
        self.part_mesh_count(part) > 0
    }

    /// Number of meshes belonging to `part`.
    #[must_use]
    pub fn part_mesh_count(&self, part: Part) -> usize {
        self.flatten().iter().filter(|m| m.part == Some(part)).count()
    }
}

/// Assemble an avatar, optionally with idle animation hooks.
#[must_use]
pub fn assemble(config: &AvatarConfig, animated: bool) -> AvatarModel {
    assemble_with(
        config,
        AssembleOptions {
            animated,
            idle_rotation: false,
        },
    )
}

/// Assemble an avatar with explicit options.
#[must_use]
pub fn assemble_with(config: &AvatarConfig, options: AssembleOptions) -> AvatarModel {
    let materials = Materials::for_config(config);
    let hat_present = config.effective_hat().is_some();

    let mut children = vec![
        parts::body::build(config, &materials, options.animated),
        parts::head::build(config, &materials),
        parts::face::build(config, &materials, options.animated),
    ];
    children.extend(parts::hair::build(config, &materials, hat_present));
    children.extend(parts::facial_hair::build(config, &materials));
    children.extend(parts::accessories::glasses(config));
    children.extend(parts::accessories::hat(config));
    children.extend(parts::accessories::earrings(config));

    tracing::debug!(
        parts = children.len(),
        animated = options.animated,
        hat_present,
        "assembled avatar"
    );

    let mut root = Node::group("avatar", children);
    if options.idle_rotation {
        root = root.animated(AnimationTarget::IdleRotation);
    }
    AvatarModel {
        root,
        animated: options.animated,
    }
}
