//! Spatial math for the procedural avatar and the AR viewer.
//!
//! Vectors, column-major 4x4 matrices, a perspective camera and orbit
//! controls. Rotations use the XYZ Euler convention of retained-mode scene
//! graphs, so a node's local matrix is `T * Rx * Ry * Rz * S`.
//!
//! ```text
//!              +Y
//!               │   polar angle measured from +Y
//!               │  ╱
//!               │ ╱  camera
//!               │╱
//!        target ●────── +X
//!              ╱
//!             ╱ azimuth measured from +Z toward +X
//!           +Z
//! ```

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// A 3D vector for positions, Euler angles and scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Vector with all components set to one (identity scale).
    #[must_use]
    pub const fn one() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Vector with all components set to `v`.
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Unit vector pointing up (Y+).
    #[must_use]
    pub const fn up() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    /// Calculate the length (magnitude) of the vector.
    #[must_use]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Normalize the vector to unit length.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len)
        } else {
            *self
        }
    }

    /// Cross product of two vectors.
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Subtract two vectors.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Add two vectors.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Scale vector by a scalar.
    #[must_use]
    pub fn scale(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    /// Component-wise product.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Mirror across the YZ plane (negate X).
    #[must_use]
    pub const fn mirror_x(&self) -> Self {
        Self::new(-self.x, self.y, self.z)
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::zero()
    }
}

/// A 4x4 matrix for transformations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    /// Matrix data in column-major order.
    pub data: [f32; 16],
}

impl Mat4 {
    /// Create identity matrix.
    #[must_use]
    pub fn identity() -> Self {
        #[rustfmt::skip]
        let data = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { data }
    }

    /// Translation matrix.
    #[must_use]
    pub fn translation(t: Vec3) -> Self {
        let mut m = Self::identity();
        m.data[12] = t.x;
        m.data[13] = t.y;
        m.data[14] = t.z;
        m
    }

    /// Non-uniform scale matrix.
    #[must_use]
    pub fn scaling(s: Vec3) -> Self {
        let mut m = Self::identity();
        m.data[0] = s.x;
        m.data[5] = s.y;
        m.data[10] = s.z;
        m
    }

    /// Rotation about the X axis.
    #[must_use]
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let data = [
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   s,   0.0,
            0.0, -s,  c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { data }
    }

    /// Rotation about the Y axis.
    #[must_use]
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let data = [
            c,   0.0, -s,  0.0,
            0.0, 1.0, 0.0, 0.0,
            s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { data }
    }

    /// Rotation about the Z axis.
    #[must_use]
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let data = [
            c,   s,   0.0, 0.0,
            -s,  c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { data }
    }

    /// Compose translation, XYZ Euler rotation and scale.
    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self::translation(position)
            .mul(&Self::rotation_x(rotation.x))
            .mul(&Self::rotation_y(rotation.y))
            .mul(&Self::rotation_z(rotation.z))
            .mul(&Self::scaling(scale))
    }

    /// Create a look-at view matrix.
    #[must_use]
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = target.sub(&eye).normalize();
        let s = f.cross(&up).normalize();
        let u = s.cross(&f);

        #[rustfmt::skip]
        let data = [
            s.x,  u.x,  -f.x, 0.0,
            s.y,  u.y,  -f.y, 0.0,
            s.z,  u.z,  -f.z, 0.0,
            -s.dot(&eye), -u.dot(&eye), f.dot(&eye), 1.0,
        ];
        Self { data }
    }

    /// Create a perspective projection matrix.
    #[must_use]
    pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y_radians / 2.0).tan();
        let nf = 1.0 / (near - far);

        #[rustfmt::skip]
        let data = [
            f / aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (far + near) * nf, -1.0,
            0.0, 0.0, 2.0 * far * near * nf, 0.0,
        ];
        Self { data }
    }

    /// Multiply two matrices.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut result = [0.0f32; 16];

        for row in 0..4 {
            for col in 0..4 {
                for k in 0..4 {
                    result[col * 4 + row] += self.data[k * 4 + row] * other.data[col * 4 + k];
                }
            }
        }

        Self { data: result }
    }

    /// Transform a point (w = 1).
    #[must_use]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let d = &self.data;
        Vec3::new(
            d[0] * p.x + d[4] * p.y + d[8] * p.z + d[12],
            d[1] * p.x + d[5] * p.y + d[9] * p.z + d[13],
            d[2] * p.x + d[6] * p.y + d[10] * p.z + d[14],
        )
    }

    /// Translation component.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.data[12], self.data[13], self.data[14])
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Camera for 3D rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up direction (usually Y+).
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::zero(),
            up: Vec3::up(),
            fov: std::f32::consts::FRAC_PI_4,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Camera used by the AR overlay: slightly above ground, 50° field of view.
    #[must_use]
    pub fn ar_viewer() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 5.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            fov: 50f32.to_radians(),
            ..Self::new()
        }
    }

    /// Camera used by the customizer preview.
    #[must_use]
    pub fn avatar_preview() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 4.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            fov: 45f32.to_radians(),
            ..Self::new()
        }
    }

    /// Create view matrix for this camera.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Create projection matrix for this camera.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(self.fov, aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds applied by [`OrbitControls`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitLimits {
    /// Closest allowed distance to the target.
    pub min_distance: f32,
    /// Farthest allowed distance from the target.
    pub max_distance: f32,
    /// Smallest polar angle (radians from +Y).
    pub min_polar: f32,
    /// Largest polar angle (radians from +Y).
    pub max_polar: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 3.0,
            max_distance: 8.0,
            min_polar: PI / 4.0,
            max_polar: PI / 1.5,
        }
    }
}

/// Spherical orbit around a target, clamped to [`OrbitLimits`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitControls {
    /// Orbit center.
    pub target: Vec3,
    /// Distance from the target.
    pub distance: f32,
    /// Polar angle from +Y in radians.
    pub polar: f32,
    /// Azimuth around Y in radians, zero on +Z.
    pub azimuth: f32,
    /// Clamping bounds.
    pub limits: OrbitLimits,
}

impl OrbitControls {
    /// Derive orbit parameters from a camera and clamp them.
    #[must_use]
    pub fn from_camera(camera: &Camera, limits: OrbitLimits) -> Self {
        let offset = camera.position.sub(&camera.target);
        let distance = offset.length();
        let polar = if distance > 0.0 {
            (offset.y / distance).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };
        let azimuth = offset.x.atan2(offset.z);
        let mut controls = Self {
            target: camera.target,
            distance,
            polar,
            azimuth,
            limits,
        };
        controls.clamp();
        controls
    }

    /// Rotate by the given azimuth and polar deltas (radians).
    pub fn rotate(&mut self, delta_azimuth: f32, delta_polar: f32) {
        self.azimuth += delta_azimuth;
        self.polar += delta_polar;
        self.clamp();
    }

    /// Multiply the distance by `factor` (below 1 zooms in).
    pub fn dolly(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance *= factor;
        }
        self.clamp();
    }

    /// Shift the target by a world-space offset.
    pub fn pan(&mut self, offset: Vec3) {
        self.target = self.target.add(&offset);
    }

    /// Current camera position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        Vec3::new(
            self.distance * sin_polar * self.azimuth.sin(),
            self.distance * self.polar.cos(),
            self.distance * sin_polar * self.azimuth.cos(),
        )
        .add(&self.target)
    }

    /// Write the orbit position and target into a camera.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.target = self.target;
    }

    fn clamp(&mut self) {
        self.distance = self
            .distance
            .clamp(self.limits.min_distance, self.limits.max_distance);
        self.polar = self.polar.clamp(self.limits.min_polar, self.limits.max_polar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    // ===========================================
    // Vec3
    // ===========================================

    #[test]
    fn test_vec3_length() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert!(approx_eq(v.length(), 5.0));
    }

    #[test]
    fn test_vec3_normalize_zero() {
        let n = Vec3::zero().normalize();
        assert!(approx_eq(n.length(), 0.0));
    }

    #[test]
    fn test_vec3_cross() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert!(vec_approx_eq(x.cross(&y), Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_vec3_mirror_x() {
        let v = Vec3::new(0.22, 0.08, 0.55).mirror_x();
        assert!(vec_approx_eq(v, Vec3::new(-0.22, 0.08, 0.55)));
    }

    // ===========================================
    // Mat4
    // ===========================================

    #[test]
    fn test_mat4_mul_identity() {
        let t = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.mul(&Mat4::identity()), t);
    }

    #[test]
    fn test_translation_moves_point() {
        let m = Mat4::translation(Vec3::new(0.0, 1.6, 0.0));
        let p = m.transform_point(Vec3::new(0.5, 0.0, 0.0));
        assert!(vec_approx_eq(p, Vec3::new(0.5, 1.6, 0.0)));
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let m = Mat4::rotation_y(PI / 2.0);
        let p = m.transform_point(Vec3::new(0.0, 0.0, 1.0));
        assert!(vec_approx_eq(p, Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let m = Mat4::rotation_z(PI / 2.0);
        let p = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(vec_approx_eq(p, Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_from_trs_applies_scale_before_translation() {
        let m = Mat4::from_trs(Vec3::new(1.0, 0.0, 0.0), Vec3::zero(), Vec3::splat(2.0));
        let p = m.transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert!(vec_approx_eq(p, Vec3::new(3.0, 2.0, 2.0)));
    }

    #[test]
    fn test_mat4_look_at() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::zero(), Vec3::up());
        let p = view.transform_point(Vec3::zero());
        assert!(approx_eq(p.z, -5.0));
    }

    // ===========================================
    // Camera and orbit
    // ===========================================

    #[test]
    fn test_ar_viewer_camera() {
        let cam = Camera::ar_viewer();
        assert!(vec_approx_eq(cam.position, Vec3::new(0.0, 1.0, 5.0)));
        assert!(approx_eq(cam.fov, 50f32.to_radians()));
    }

    #[test]
    fn test_orbit_from_ar_camera_round_trips_position() {
        let cam = Camera::ar_viewer();
        let orbit = OrbitControls::from_camera(&cam, OrbitLimits::default());
        assert!(approx_eq(orbit.distance, 5.0));
        assert!(approx_eq(orbit.polar, PI / 2.0));
        assert!(vec_approx_eq(orbit.position(), cam.position));
    }

    #[test]
    fn test_orbit_distance_is_clamped() {
        let mut orbit = OrbitControls::from_camera(&Camera::ar_viewer(), OrbitLimits::default());
        orbit.dolly(0.1);
        assert!(approx_eq(orbit.distance, 3.0));
        orbit.dolly(100.0);
        assert!(approx_eq(orbit.distance, 8.0));
    }

    #[test]
    fn test_orbit_polar_is_clamped() {
        let mut orbit = OrbitControls::from_camera(&Camera::ar_viewer(), OrbitLimits::default());
        orbit.rotate(0.3, -10.0);
        assert!(approx_eq(orbit.polar, PI / 4.0));
        orbit.rotate(0.0, 10.0);
        assert!(approx_eq(orbit.polar, PI / 1.5));
    }

    #[test]
    fn test_orbit_ignores_invalid_dolly() {
        let mut orbit = OrbitControls::from_camera(&Camera::ar_viewer(), OrbitLimits::default());
        orbit.dolly(f32::NAN);
        orbit.dolly(-2.0);
        assert!(approx_eq(orbit.distance, 5.0));
    }

    #[test]
    fn test_orbit_pan_moves_target_and_position() {
        let mut orbit = OrbitControls::from_camera(&Camera::ar_viewer(), OrbitLimits::default());
        let before = orbit.position();
        orbit.pan(Vec3::new(1.0, 0.0, 0.0));
        let mut cam = Camera::ar_viewer();
        orbit.apply_to(&mut cam);
        assert!(approx_eq(cam.position.x - before.x, 1.0));
        assert!(approx_eq(cam.target.x, 1.0));
    }
}
