//! Perspective projection and screen mapping
use nalgebra::Point2;

use crate::config::{Viewport, FAR_PLANE, FOV_DEGREES, NEAR_PLANE};
use crate::math::{transform_point, Mat4, Vec3};

/// Perspective projection built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    near: f64,
    far: f64,
    fov_degrees: f64,
    /// Height over width
    aspect: f64,
    matrix: Mat4,
    viewport: Viewport,
}

impl Projection {
    /// The projection used by the renderer: fixed planes and field of view,
    /// aspect taken from the viewport.
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::new(NEAR_PLANE, FAR_PLANE, FOV_DEGREES, viewport)
    }

    pub fn new(near: f64, far: f64, fov_degrees: f64, viewport: Viewport) -> Self {
        let aspect = viewport.aspect_ratio();
        let fov_rad = 1.0 / (fov_degrees * 0.5).to_radians().tan();
        let depth = far / (far - near);

        #[rustfmt::skip]
        let matrix = Mat4::new(
            aspect * fov_rad, 0.0,     0.0,           0.0,
            0.0,              fov_rad, 0.0,           0.0,
            0.0,              0.0,     depth,         1.0,
            0.0,              0.0,     -depth * near, 0.0,
        );

        Self {
            near,
            far,
            fov_degrees,
            aspect,
            matrix,
            viewport,
        }
    }

    pub fn near(&self) -> f64 {
        self.near
    }

    pub fn far(&self) -> f64 {
        self.far
    }

    pub fn fov_degrees(&self) -> f64 {
        self.fov_degrees
    }

    /// Height over width of the viewport the matrix was built for.
    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Project a camera-space point into normalized device coordinates.
    pub fn project(&self, point: &Vec3) -> Vec3 {
        transform_point(point, &self.matrix)
    }

    /// Map a normalized point from `[-1, 1]` into viewport pixels.
    pub fn to_screen(&self, ndc: &Vec3) -> Point2<f64> {
        Point2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.width as f64,
            (ndc.y + 1.0) * 0.5 * self.viewport.height as f64,
        )
    }

    /// Project a camera-space point straight to viewport pixels.
    pub fn project_to_screen(&self, point: &Vec3) -> Point2<f64> {
        self.to_screen(&self.project(point))
    }
}
