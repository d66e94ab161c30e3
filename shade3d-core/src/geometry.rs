//! Geometry primitives: triangles and indexed meshes

use serde::Deserialize;

use crate::math::{normalize, Vec3};

/// How a triangle's painter's-order depth is derived from its vertices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthKey {
    /// `p1.z + p2.z + p3.z / 3`, the historical key. Only the last term is
    /// divided, so the first two vertices dominate the ordering.
    #[default]
    Legacy,
    /// `(p1.z + p2.z + p3.z) / 3`, the true centroid depth.
    Centroid,
}

/// A triangle with its vertex positions stored by value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
}

impl Triangle {
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self { p1, p2, p3 }
    }

    /// Calculate the face normal from the triangle's vertices.
    ///
    /// Collinear vertices give a zero cross product, which is returned as
    /// the zero vector rather than NaN.
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.p2 - self.p1;
        let edge2 = self.p3 - self.p1;

        let mut normal = edge1.cross(&edge2);
        normalize(&mut normal);
        normal
    }

    pub fn sort_key(&self, key: DepthKey) -> f64 {
        match key {
            DepthKey::Legacy => self.p1.z + self.p2.z + self.p3.z / 3.0,
            DepthKey::Centroid => (self.p1.z + self.p2.z + self.p3.z) / 3.0,
        }
    }

    /// Apply `f` to each vertex, producing a new triangle.
    pub fn map(&self, mut f: impl FnMut(&Vec3) -> Vec3) -> Self {
        Self::new(f(&self.p1), f(&self.p2), f(&self.p3))
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.p1, self.p2, self.p3]
    }
}

/// Three indices into a mesh's vertex arena
pub type Face = [usize; 3];

/// A 3D mesh: a vertex arena plus faces that index into it.
///
/// Shared vertices are stored once. Face order is kept exactly as loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Build a mesh from parts that are already known to be consistent.
    ///
    /// Callers must ensure every face index is below `vertices.len()`.
    pub(crate) fn from_parts(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        debug_assert!(faces.iter().flatten().all(|&i| i < vertices.len()));
        Self { vertices, faces }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Resolve the face at `index` into a triangle.
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        self.faces.get(index).map(|face| self.resolve(face))
    }

    /// Iterate over the mesh's triangles in face order.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        self.faces.iter().map(|face| self.resolve(face))
    }

    fn resolve(&self, &[a, b, c]: &Face) -> Triangle {
        Triangle::new(self.vertices[a], self.vertices[b], self.vertices[c])
    }

    /// The unit cube spanning `0..=1` on every axis, wound so that faces
    /// point outwards.
    pub fn unit_cube() -> Self {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];

        let faces = vec![
            // South
            [0, 1, 2],
            [0, 2, 3],
            // East
            [3, 2, 4],
            [3, 4, 5],
            // North
            [5, 4, 6],
            [5, 6, 7],
            // West
            [7, 6, 1],
            [7, 1, 0],
            // Top
            [1, 6, 4],
            [1, 4, 2],
            // Bottom
            [5, 7, 0],
            [5, 0, 3],
        ];

        Self::from_parts(vertices, faces)
    }
}
