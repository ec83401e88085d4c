//! Drag-to-reposition state machine for the QR canvas.
//!
//! A press only starts a drag inside the QR square. Moves are clamped so the
//! whole square stays on the canvas. Any release, including one delivered by
//! the window-level [`ReleaseHub`], ends the drag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::event::{DragAction, InputEvent};
use crate::lifecycle::{ReleaseHub, ReleaseSubscription};

use super::{CanvasSize, Position, QrVisualConfig};

/// Clamp a top-left corner so a square of side `size` stays on `canvas`.
#[must_use]
pub fn clamp_position(canvas: CanvasSize, size: f32, position: Position) -> Position {
    let max = canvas.max_origin(size);
    Position {
        x: position.x.clamp(0.0, max.x),
        y: position.y.clamp(0.0, max.y),
    }
}

/// Private drag state of one QR canvas.
#[derive(Debug)]
pub struct QrCompositor {
    canvas: CanvasSize,
    dragging: Arc<AtomicBool>,
    offset: Position,
    release: Option<ReleaseSubscription>,
}

impl QrCompositor {
    /// Compositor without a window-level release listener.
    #[must_use]
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            dragging: Arc::new(AtomicBool::new(false)),
            offset: Position::new(0.0, 0.0),
            release: None,
        }
    }

    /// Compositor that also stops dragging on any release dispatched by
    /// `hub`. The listener is removed when the compositor is dropped.
    #[must_use]
    pub fn attached(canvas: CanvasSize, hub: &ReleaseHub) -> Self {
        let mut compositor = Self::new(canvas);
        let flag = Arc::clone(&compositor.dragging);
        compositor.release = Some(hub.subscribe(move || flag.store(false, Ordering::SeqCst)));
        compositor
    }

    /// Canvas dimensions.
    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging.load(Ordering::SeqCst)
    }

    /// Whether a window-level release listener is registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.release.is_some()
    }

    /// Feed an input event. Returns the new position when it changed.
    pub fn handle_input(
        &mut self,
        config: &QrVisualConfig,
        event: &InputEvent,
    ) -> Option<Position> {
        match event.drag_action()? {
            DragAction::Press { x, y } => {
                self.press(config, x, y);
                None
            }
            DragAction::Move { x, y } => self.drag_to(config, x, y),
            DragAction::Release => {
                self.release();
                None
            }
        }
    }

    /// Start a drag if `(x, y)` is inside the QR square. Returns whether a
    /// drag started.
    pub fn press(&mut self, config: &QrVisualConfig, x: f32, y: f32) -> bool {
        if !config.contains(x, y) {
            return false;
        }
        self.offset = Position::new(x - config.position.x, y - config.position.y);
        self.dragging.store(true, Ordering::SeqCst);
        tracing::trace!(x, y, "qr drag started");
        true
    }

    /// Move the QR while dragging, keeping the press offset.
    pub fn drag_to(&mut self, config: &QrVisualConfig, x: f32, y: f32) -> Option<Position> {
        if !self.is_dragging() || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let target = Position::new(x - self.offset.x, y - self.offset.y);
        Some(clamp_position(self.canvas, config.size, target))
    }

    /// Stop dragging. Always safe to call.
    pub fn release(&mut self) {
        self.dragging.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{PointerPhase, TouchEvent, TouchPhase, TouchPoint};
    use proptest::prelude::*;

    fn down(x: f32, y: f32) -> InputEvent {
        InputEvent::pointer(PointerPhase::Down, x, y)
    }

    fn mv(x: f32, y: f32) -> InputEvent {
        InputEvent::pointer(PointerPhase::Move, x, y)
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let config = QrVisualConfig::default();
        let mut compositor = QrCompositor::new(CanvasSize::default());
        assert_eq!(compositor.handle_input(&config, &down(60.0, 70.0)), None);
        assert!(compositor.is_dragging());
        let pos = compositor.handle_input(&config, &mv(110.0, 120.0));
        assert_eq!(pos, Some(Position::new(100.0, 100.0)));
    }

    #[test]
    fn test_drag_clamps_to_canvas() {
        let config = QrVisualConfig::default();
        let mut compositor = QrCompositor::new(CanvasSize::default());
        compositor.handle_input(&config, &down(50.0, 50.0));
        assert_eq!(
            compositor.handle_input(&config, &mv(-500.0, 9000.0)),
            Some(Position::new(0.0, 250.0))
        );
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let config = QrVisualConfig::default();
        let mut compositor = QrCompositor::new(CanvasSize::default());
        compositor.handle_input(&config, &down(10.0, 10.0));
        assert!(!compositor.is_dragging());
        assert_eq!(compositor.handle_input(&config, &mv(300.0, 300.0)), None);
    }

    #[test]
    fn test_press_on_edge_starts_drag() {
        let config = QrVisualConfig::default();
        let mut compositor = QrCompositor::new(CanvasSize::default());
        assert!(compositor.press(&config, 200.0, 200.0));
    }

    #[test]
    fn test_leave_and_up_release() {
        let config = QrVisualConfig::default();
        let mut compositor = QrCompositor::new(CanvasSize::default());
        for phase in [PointerPhase::Up, PointerPhase::Leave] {
            compositor.handle_input(&config, &down(60.0, 60.0));
            compositor.handle_input(&config, &InputEvent::pointer(phase, 0.0, 0.0));
            assert!(!compositor.is_dragging(), "{phase:?}");
        }
    }

    #[test]
    fn test_multi_touch_does_not_drag() {
        let config = QrVisualConfig::default();
        let mut compositor = QrCompositor::new(CanvasSize::default());
        let pinch = InputEvent::Touch(TouchEvent::new(
            TouchPhase::Start,
            vec![TouchPoint::new(0, 60.0, 60.0), TouchPoint::new(1, 80.0, 80.0)],
        ));
        compositor.handle_input(&config, &pinch);
        assert!(!compositor.is_dragging());

        compositor.handle_input(&config, &InputEvent::touch(TouchPhase::Start, 60.0, 60.0));
        assert!(compositor.is_dragging());
        let end = InputEvent::Touch(TouchEvent::new(TouchPhase::End, vec![]));
        compositor.handle_input(&config, &end);
        assert!(!compositor.is_dragging());
    }

    #[test]
    fn test_window_release_stops_drag() {
        let hub = ReleaseHub::new();
        let config = QrVisualConfig::default();
        let mut compositor = QrCompositor::attached(CanvasSize::default(), &hub);
        assert!(compositor.is_attached());
        compositor.press(&config, 60.0, 60.0);
        hub.dispatch_release();
        assert!(!compositor.is_dragging());
        assert_eq!(compositor.drag_to(&config, 100.0, 100.0), None);
    }

    #[test]
    fn test_dropping_compositor_unsubscribes() {
        let hub = ReleaseHub::new();
        let compositor = QrCompositor::attached(CanvasSize::default(), &hub);
        assert_eq!(hub.subscriber_count(), 1);
        drop(compositor);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_oversized_qr_pins_to_origin() {
        let config = QrVisualConfig {
            size: 300.0,
            position: Position::new(0.0, 0.0),
            ..QrVisualConfig::default()
        };
        let mut compositor = QrCompositor::new(CanvasSize::new(200, 200));
        compositor.press(&config, 10.0, 10.0);
        assert_eq!(
            compositor.drag_to(&config, 90.0, 90.0),
            Some(Position::new(0.0, 0.0))
        );
    }

    proptest! {
        #[test]
        fn prop_drag_stays_on_canvas(
            size in 50.0f32..=300.0,
            grab in 0.0f32..=1.0,
            moves in proptest::collection::vec((-2000.0f32..2000.0, -2000.0f32..2000.0), 1..20),
        ) {
            let canvas = CanvasSize::default();
            let mut config = QrVisualConfig { size, ..QrVisualConfig::default() };
            let mut compositor = QrCompositor::new(canvas);
            let start = config.position.x + grab * size;
            prop_assert!(compositor.press(&config, start, start));
            for (x, y) in moves {
                if let Some(p) = compositor.drag_to(&config, x, y) {
                    prop_assert!(p.x >= 0.0 && p.x <= 600.0 - size);
                    prop_assert!(p.y >= 0.0 && p.y <= 400.0 - size);
                    config.position = p;
                }
            }
        }

        #[test]
        fn prop_outside_press_is_a_no_op(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            mx in -1000.0f32..1000.0,
            my in -1000.0f32..1000.0,
        ) {
            let config = QrVisualConfig::default();
            prop_assume!(!config.contains(x, y));
            let mut compositor = QrCompositor::new(CanvasSize::default());
            prop_assert_eq!(compositor.handle_input(&config, &down(x, y)), None);
            prop_assert!(!compositor.is_dragging());
            prop_assert_eq!(compositor.handle_input(&config, &mv(mx, my)), None);
        }
    }
}
