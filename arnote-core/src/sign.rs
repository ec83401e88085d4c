//! AR message placard.
//!
//! Sizing is a linear character-count heuristic, not real text metrics. A
//! single very long unbroken line is clamped to the maximum width and may
//! overflow the board; callers that need reflow insert explicit line breaks.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationTarget;
use crate::mesh::{Material, Node, Part, Primitive};

/// Sizing constants for the sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignStyle {
    /// Widest allowed text block.
    pub max_width: f32,
    /// Narrowest text block.
    pub min_width: f32,
    /// Estimated width per character.
    pub char_width: f32,
    /// Height per line.
    pub line_height: f32,
    /// Vertical padding added to the line stack.
    pub padding: f32,
    /// Shortest text block.
    pub min_height: f32,
    /// Glyph height.
    pub font_size: f32,
}

impl Default for SignStyle {
    fn default() -> Self {
        Self {
            max_width: 2.5,
            min_width: 1.5,
            char_width: 0.12,
            line_height: 0.3,
            padding: 0.4,
            min_height: 0.8,
            font_size: 0.15,
        }
    }
}

/// Computed dimensions of a message sign.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignLayout {
    /// Message split on `\n`.
    pub lines: Vec<String>,
    /// Character count of the longest line.
    pub longest_line: usize,
    /// Text block width.
    pub width: f32,
    /// Text block height.
    pub height: f32,
    /// Glyph height.
    pub font_size: f32,
}

impl SignLayout {
    /// Board size (text block plus margin).
    #[must_use]
    pub fn board_size(&self) -> (f32, f32) {
        (self.width + 0.3, self.height + 0.2)
    }

    /// Frame size (board plus border).
    #[must_use]
    pub fn frame_size(&self) -> (f32, f32) {
        (self.width + 0.4, self.height + 0.3)
    }

    /// Vertical offset of the pole below the sign center.
    #[must_use]
    pub fn pole_offset(&self) -> f32 {
        -(self.height / 2.0 + 0.4)
    }
}

/// Estimate sign dimensions for `message`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn layout(message: &str, style: &SignStyle) -> SignLayout {
    let lines: Vec<String> = message.split('\n').map(str::to_string).collect();
    let longest_line = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = (longest_line as f32 * style.char_width)
        .max(style.min_width)
        .min(style.max_width);
    let height = (lines.len() as f32 * style.line_height + style.padding).max(style.min_height);
    SignLayout {
        lines,
        longest_line,
        width,
        height,
        font_size: style.font_size,
    }
}

/// Frame, board, text and pole, swaying as a group.
#[must_use]
pub fn sign_node(message: &str, layout: &SignLayout) -> Node {
    let (board_w, board_h) = layout.board_size();
    let (frame_w, frame_h) = layout.frame_size();

    let children = vec![
        Node::mesh(
            "sign_board",
            Primitive::RoundedBox {
                width: board_w,
                height: board_h,
                depth: 0.1,
                radius: 0.05,
            },
            Material::standard("#ffffff", 0.3, 0.1),
        )
        .at(0.0, 0.0, -0.05),
        Node::mesh(
            "sign_frame",
            Primitive::RoundedBox {
                width: frame_w,
                height: frame_h,
                depth: 0.08,
                radius: 0.06,
            },
            Material::standard("#7c3aed", 0.4, 0.2),
        )
        .at(0.0, 0.0, -0.1),
        Node::mesh(
            "sign_text",
            Primitive::Text {
                content: message.to_string(),
                font_size: layout.font_size,
                max_width: layout.width,
            },
            Material::standard("#1a1a2e", 1.0, 0.0),
        )
        .at(0.0, 0.0, 0.01),
        Node::mesh(
            "sign_pole",
            Primitive::Cylinder {
                radius_top: 0.04,
                radius_bottom: 0.05,
                height: 0.6,
                open_ended: false,
            },
            Material::standard("#8B4513", 0.8, 0.0),
        )
        .at(0.0, layout.pole_offset(), -0.05),
    ];

    Node::group("sign_root", children)
        .at(0.0, -0.3, 0.5)
        .tagged(Part::Sign)
        .animated(AnimationTarget::SignSway)
}
