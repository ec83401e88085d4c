//! Idle animation driven by elapsed time.
//!
//! The host frame loop calls [`AnimationState::advance`] once per frame with
//! the total elapsed seconds, then poses the static tree with
//! [`Node::posed`]. Every cycle reads only elapsed time, so blink, breathing,
//! sign sway and figure float are independent of each other and of callback
//! order.

use serde::{Deserialize, Serialize};

use crate::mesh::{Node, NodeKind};

/// Frequencies and amplitudes of the idle cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationRates {
    /// Angular frequency of the blink carrier (rad/s).
    pub blink_frequency: f32,
    /// Carrier level above which the eyes close.
    pub blink_threshold: f32,
    /// Eye height while closed.
    pub blink_closed: f32,
    /// Fraction of the remaining distance covered per frame.
    pub blink_lerp: f32,
    /// Angular frequency of breathing (rad/s).
    pub breathe_frequency: f32,
    /// Torso scale amplitude.
    pub breathe_amplitude: f32,
    /// Idle yaw speed (rad/s).
    pub idle_speed: f32,
    /// Angular frequency of the sign sway (rad/s).
    pub sway_frequency: f32,
    /// Sign roll amplitude (rad).
    pub sway_amplitude: f32,
    /// Angular frequency of the figure float (rad/s).
    pub float_frequency: f32,
    /// Figure vertical amplitude.
    pub float_amplitude: f32,
    /// Angular frequency of the figure yaw wobble (rad/s).
    pub float_yaw_frequency: f32,
    /// Figure yaw amplitude (rad).
    pub float_yaw_amplitude: f32,
}

impl Default for AnimationRates {
    fn default() -> Self {
        Self {
            blink_frequency: 0.5,
            blink_threshold: 0.95,
            blink_closed: 0.1,
            blink_lerp: 0.3,
            breathe_frequency: 1.5,
            breathe_amplitude: 0.015,
            idle_speed: 0.5,
            sway_frequency: 0.5,
            sway_amplitude: 0.02,
            float_frequency: 0.8,
            float_amplitude: 0.1,
            float_yaw_frequency: 0.3,
            float_yaw_amplitude: 0.1,
        }
    }
}

/// Animation hooks attached to nodes by the builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationTarget {
    /// Left eye group; Y scale follows the blink.
    LeftEye,
    /// Right eye group; Y scale follows the blink.
    RightEye,
    /// Body root; X/Z scale follows breathing.
    Torso,
    /// Avatar root; yaw accumulates at a constant rate.
    IdleRotation,
    /// Sign group; rolls back and forth.
    SignSway,
    /// Figure group; bobs and wobbles.
    Float,
}

/// Snapshot of every idle cycle at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    /// Seconds since the animation started.
    pub elapsed: f32,
    /// Current eye height multiplier.
    pub eye_scale_y: f32,
    /// Current breathing offset.
    pub breathe: f32,
    /// Accumulated idle yaw (rad).
    pub idle_yaw: f32,
    /// Current sign roll (rad).
    pub sway: f32,
    /// Current figure vertical offset.
    pub float_offset: f32,
    /// Current figure yaw (rad).
    pub float_yaw: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            eye_scale_y: 1.0,
            breathe: 0.0,
            idle_yaw: 0.0,
            sway: 0.0,
            float_offset: 0.0,
            float_yaw: 0.0,
        }
    }
}

impl AnimationState {
    /// Produce the state for a new frame at `elapsed` seconds.
    ///
    /// Idle yaw accumulates by the elapsed delta, so it is frame-rate
    /// independent; a clock that runs backwards adds nothing. The blink is
    /// eased toward its target by a fixed fraction per call.
    #[must_use]
    pub fn advance(self, elapsed: f32, rates: &AnimationRates) -> Self {
        if !elapsed.is_finite() {
            return self;
        }
        let delta = (elapsed - self.elapsed).max(0.0);

        let closing = (elapsed * rates.blink_frequency).sin() > rates.blink_threshold;
        let target = if closing { rates.blink_closed } else { 1.0 };
        let eye_scale_y = lerp(self.eye_scale_y, target, rates.blink_lerp);

        Self {
            elapsed,
            eye_scale_y,
            breathe: (elapsed * rates.breathe_frequency).sin() * rates.breathe_amplitude,
            idle_yaw: self.idle_yaw + delta * rates.idle_speed,
            sway: (elapsed * rates.sway_frequency).sin() * rates.sway_amplitude,
            float_offset: (elapsed * rates.float_frequency).sin() * rates.float_amplitude,
            float_yaw: (elapsed * rates.float_yaw_frequency).sin() * rates.float_yaw_amplitude,
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Node {
    /// Copy of this tree with every animation hook applied for `state`.
    #[must_use]
    pub fn posed(&self, state: &AnimationState) -> Node {
        let mut node = self.clone();
        node.pose_in_place(state);
        node
    }

    fn pose_in_place(&mut self, state: &AnimationState) {
        if let Some(target) = self.anim {
            let t = &mut self.transform;
            match target {
                AnimationTarget::LeftEye | AnimationTarget::RightEye => {
                    t.scale.y *= state.eye_scale_y;
                }
                AnimationTarget::Torso => {
                    t.scale.x *= 1.0 + state.breathe;
                    t.scale.z *= 1.0 + state.breathe * 0.5;
                }
                AnimationTarget::IdleRotation => t.rotation.y += state.idle_yaw,
                AnimationTarget::SignSway => t.rotation.z = state.sway,
                AnimationTarget::Float => {
                    t.position.y += state.float_offset;
                    t.rotation.y = state.float_yaw;
                }
            }
        }
        if let NodeKind::Group { children } = &mut self.kind {
            for child in children {
                child.pose_in_place(state);
            }
        }
    }
}
