//! Input events for the QR canvas editor.

use serde::{Deserialize, Serialize};

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position in canvas coordinates.
    pub x: f32,
    /// Y position in canvas coordinates.
    pub y: f32,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    /// The touch point when exactly one finger is down.
    #[must_use]
    pub fn single_touch(&self) -> Option<&TouchPoint> {
        match self.touches.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// Phase of a mouse pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released over the element.
    Up,
    /// Pointer left the element.
    Leave,
}

/// All input events the canvas can receive, in canvas-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InputEvent {
    /// Raw touch event.
    Touch(TouchEvent),

    /// Pointer (mouse) event.
    Pointer {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
        /// Event phase.
        phase: PointerPhase,
    },
}

/// What an input event means to a drag interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragAction {
    /// Press at a point.
    Press {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Move to a point.
    Move {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Release or cancel.
    Release,
}

impl InputEvent {
    /// Mouse event helper.
    #[must_use]
    pub fn pointer(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::Pointer { x, y, phase }
    }

    /// Single-finger touch helper.
    #[must_use]
    pub fn touch(phase: TouchPhase, x: f32, y: f32) -> Self {
        Self::Touch(TouchEvent::new(phase, vec![TouchPoint::new(0, x, y)]))
    }

    /// Interpret for dragging. Touch presses and moves require exactly one
    /// finger; any touch end or cancel releases.
    #[must_use]
    pub fn drag_action(&self) -> Option<DragAction> {
        match self {
            Self::Pointer { x, y, phase } => Some(match phase {
                PointerPhase::Down => DragAction::Press { x: *x, y: *y },
                PointerPhase::Move => DragAction::Move { x: *x, y: *y },
                PointerPhase::Up | PointerPhase::Leave => DragAction::Release,
            }),
            Self::Touch(touch) => match touch.phase {
                TouchPhase::Start => touch
                    .single_touch()
                    .map(|p| DragAction::Press { x: p.x, y: p.y }),
                TouchPhase::Move => touch
                    .single_touch()
                    .map(|p| DragAction::Move { x: p.x, y: p.y }),
                TouchPhase::End | TouchPhase::Cancel => Some(DragAction::Release),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_actions() {
        assert_eq!(
            InputEvent::pointer(PointerPhase::Down, 1.0, 2.0).drag_action(),
            Some(DragAction::Press { x: 1.0, y: 2.0 })
        );
        assert_eq!(
            InputEvent::pointer(PointerPhase::Leave, 0.0, 0.0).drag_action(),
            Some(DragAction::Release)
        );
    }

    #[test]
    fn test_multi_touch_is_not_a_drag() {
        let two = InputEvent::Touch(TouchEvent::new(
            TouchPhase::Start,
            vec![TouchPoint::new(0, 1.0, 1.0), TouchPoint::new(1, 5.0, 5.0)],
        ));
        assert_eq!(two.drag_action(), None);
        let moved = InputEvent::Touch(TouchEvent::new(TouchPhase::Move, vec![]));
        assert_eq!(moved.drag_action(), None);
    }

    #[test]
    fn test_touch_end_always_releases() {
        let end = InputEvent::Touch(TouchEvent::new(TouchPhase::End, vec![]));
        assert_eq!(end.drag_action(), Some(DragAction::Release));
        let cancel = InputEvent::touch(TouchPhase::Cancel, 3.0, 3.0);
        assert_eq!(cancel.drag_action(), Some(DragAction::Release));
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(InputEvent::pointer(PointerPhase::Move, 4.0, 5.0))
            .expect("serialize");
        assert_eq!(json["type"], "pointer");
        assert_eq!(json["data"]["phase"], "move");
    }
}
