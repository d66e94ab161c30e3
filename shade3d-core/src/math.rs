//! Vector and matrix primitives
//!
//! Points are treated as row vectors `[x, y, z, 1]` multiplied on the left of
//! a 4x4 matrix, so translation lives in the bottom row and the perspective
//! `w` is read from the last column.

use nalgebra::{Matrix4, RowVector4, Vector3};

/// A 3-component vector; addition, subtraction, `cross`, `dot` and `norm`
/// come from nalgebra.
pub type Vec3 = Vector3<f64>;

/// A homogeneous 4x4 transform in row-vector layout.
pub type Mat4 = Matrix4<f64>;

/// Normalize `v` in place. A zero-length vector is left as it is.
pub fn normalize(v: &mut Vec3) {
    // `None` means the norm was zero and nothing was touched.
    let _ = v.try_normalize_mut(0.0);
}

/// Return a normalized copy of `v`, or `v` itself when it has zero length.
pub fn normalized(mut v: Vec3) -> Vec3 {
    normalize(&mut v);
    v
}

/// Transform a point by `m`, dividing through by `w` unless it is zero.
pub fn transform_point(v: &Vec3, m: &Mat4) -> Vec3 {
    let h = RowVector4::new(v.x, v.y, v.z, 1.0) * m;
    let out = Vec3::new(h[0], h[1], h[2]);
    if h[3] != 0.0 {
        out / h[3]
    } else {
        out
    }
}
