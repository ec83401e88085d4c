//! AR scene host: the floating figure (avatar plus sign) and the viewer
//! controls layered over the live camera feed.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationTarget;
use crate::assembler::assemble;
use crate::avatar::AvatarConfig;
use crate::camera::{CameraSession, VideoConstraints};
use crate::mesh::{Node, Part};
use crate::sign::{layout, sign_node, SignLayout, SignStyle};
use crate::spatial::{Camera, OrbitControls, OrbitLimits};

/// Uniform avatar scale driven by slider and +/- buttons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleControl {
    value: f32,
    /// Smallest scale.
    pub min: f32,
    /// Largest scale.
    pub max: f32,
    /// Button and slider increment.
    pub step: f32,
    /// Value restored by [`reset`](Self::reset).
    pub initial: f32,
}

impl Default for ScaleControl {
    fn default() -> Self {
        Self {
            value: 1.0,
            min: 0.5,
            max: 2.0,
            step: 0.1,
            initial: 1.0,
        }
    }
}

impl ScaleControl {
    /// Current scale.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Set from the slider; snapped to the step and clamped.
    pub fn set(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        let snapped = self.min + ((value - self.min) / self.step).round() * self.step;
        self.value = round_to_hundredths(snapped.clamp(self.min, self.max));
    }

    /// One step larger, clamped at the maximum.
    pub fn increase(&mut self) {
        self.set(self.value + self.step);
    }

    /// One step smaller, clamped at the minimum.
    pub fn decrease(&mut self) {
        self.set(self.value - self.step);
    }

    /// Restore the initial scale.
    pub fn reset(&mut self) {
        self.value = self.initial;
    }
}

fn round_to_hundredths(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// Build the floating figure: an animated avatar holding a message sign.
#[must_use]
pub fn figure(config: &AvatarConfig, message: &str, style: &SignStyle) -> (Node, SignLayout) {
    let sign_layout = layout(message, style);
    let avatar = assemble(config, true).root;
    let sign = sign_node(message, &sign_layout);
    let node = Node::group("figure", vec![avatar, sign])
        .tagged(Part::Figure)
        .animated(AnimationTarget::Float);
    (node, sign_layout)
}

/// Viewer state for one AR session.
#[derive(Debug, Clone)]
pub struct ArViewer {
    /// Perspective camera.
    pub camera: Camera,
    /// Orbit around the figure.
    pub orbit: OrbitControls,
    /// Avatar scale.
    pub scale: ScaleControl,
    /// Live camera feed acquisition.
    pub session: CameraSession,
}

impl Default for ArViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl ArViewer {
    /// Fresh session with the rear camera requested.
    #[must_use]
    pub fn new() -> Self {
        let camera = Camera::ar_viewer();
        let orbit = OrbitControls::from_camera(&camera, OrbitLimits::default());
        Self {
            camera,
            orbit,
            scale: ScaleControl::default(),
            session: CameraSession::new(VideoConstraints::ar_viewer()),
        }
    }

    /// Orbit by a drag delta (radians) and update the camera.
    pub fn orbit_by(&mut self, delta_azimuth: f32, delta_polar: f32) {
        self.orbit.rotate(delta_azimuth, delta_polar);
        self.orbit.apply_to(&mut self.camera);
    }

    /// Zoom by a pinch factor and update the camera.
    pub fn zoom_by(&mut self, factor: f32) {
        self.orbit.dolly(factor);
        self.orbit.apply_to(&mut self.camera);
    }

    /// Figure scaled by the current control value, ready to render.
    #[must_use]
    pub fn scene(&self, config: &AvatarConfig, message: &str, style: &SignStyle) -> Node {
        let (node, _) = figure(config, message, style);
        let s = self.scale.value();
        node.scale(s, s, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_bounds() {
        let mut scale = ScaleControl::default();
        for _ in 0..30 {
            scale.increase();
        }
        assert!((scale.value() - 2.0).abs() < 1e-6);
        for _ in 0..30 {
            scale.decrease();
        }
        assert!((scale.value() - 0.5).abs() < 1e-6);
        scale.reset();
        assert!((scale.value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_snaps_to_step() {
        let mut scale = ScaleControl::default();
        scale.set(1.234);
        assert!((scale.value() - 1.2).abs() < 1e-6);
        scale.set(f32::NAN);
        assert!((scale.value() - 1.2).abs() < 1e-6);
        scale.set(9.0);
        assert!((scale.value() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_steps_do_not_drift() {
        let mut scale = ScaleControl::default();
        scale.increase();
        scale.increase();
        scale.increase();
        assert!((scale.value() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_figure_holds_avatar_and_sign() {
        let (node, l) = figure(&AvatarConfig::default(), "Hello", &SignStyle::default());
        assert_eq!(node.anim, Some(AnimationTarget::Float));
        assert!(node.find("avatar").is_some());
        assert!(node.find("sign_root").is_some());
        assert!(node.find_anim(AnimationTarget::LeftEye).is_some());
        assert!((l.width - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_viewer_orbit_is_clamped() {
        let mut viewer = ArViewer::new();
        viewer.zoom_by(100.0);
        let d = viewer.camera.position.sub(&viewer.camera.target).length();
        assert!(d <= 8.0 + 1e-4);
        viewer.orbit_by(0.0, 10.0);
        assert!(viewer.orbit.polar <= std::f32::consts::PI / 1.5 + 1e-5);
    }

    #[test]
    fn test_scene_applies_scale() {
        let mut viewer = ArViewer::new();
        viewer.scale.set(1.5);
        let node = viewer.scene(&AvatarConfig::default(), "Hi", &SignStyle::default());
        assert!((node.transform.scale.x - 1.5).abs() < 1e-6);
    }
}
