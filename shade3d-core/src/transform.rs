//! Rotation matrices and the accumulated rotation state
use crate::math::Mat4;

/// Angular speed of the tumble, in radians per second.
pub const ANGULAR_SPEED: f64 = 1.0;

/// Accumulated rotation angle (in radians).
///
/// The angle only ever grows: it is advanced by elapsed wall-clock time each
/// frame, so the spin rate does not depend on the frame rate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    theta: f64,
}

impl RotationState {
    pub fn new(theta: f64) -> Self {
        Self { theta }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Advance by `elapsed` seconds. Negative or non-finite input is ignored.
    pub fn advance(&mut self, elapsed: f64) {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.theta += ANGULAR_SPEED * elapsed;
        }
    }

    /// The Z and X rotation matrices for the current angle. X turns at half
    /// the rate of Z.
    pub fn matrices(&self) -> (Mat4, Mat4) {
        (
            Transform::rotation_z(self.theta),
            Transform::rotation_x(self.theta * 0.5),
        )
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation about the Z axis, in row-vector layout.
    pub fn rotation_z(theta: f64) -> Mat4 {
        let (s, c) = theta.sin_cos();
        #[rustfmt::skip]
        let m = Mat4::new(
            c,   s,   0.0, 0.0,
            -s,  c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    /// Rotation about the X axis, in row-vector layout.
    pub fn rotation_x(theta: f64) -> Mat4 {
        let (s, c) = theta.sin_cos();
        #[rustfmt::skip]
        let m = Mat4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   s,   0.0,
            0.0, -s,  c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }
}
