//! The per-frame transform, visibility and ordering pipeline
//!
//! Each frame every face of the mesh is rotated, pushed in front of the
//! camera, back-face culled, depth sorted, shaded and projected. Nothing is
//! carried over between frames: a [`Frame`] is built from scratch and
//! consumed once.

use std::io;
use std::vec;

use tracing::trace;

use crate::config::{SceneConfig, CAMERA_OFFSET, CAMERA_POSITION};
use crate::geometry::{DepthKey, Mesh, Triangle};
use crate::math::{transform_point, Vec3};
use crate::projection::Projection;
use crate::shading::{Light, ShadeMapping};
use crate::surface::{Color, DisplaySurface, ScreenTriangle};
use crate::transform::RotationState;

pub const OUTLINE_COLOR: Color = Color::BLACK;
pub const OUTLINE_WIDTH: u32 = 1;

/// Everything that stays fixed while frames are produced.
#[derive(Debug, Clone)]
pub struct Scene {
    projection: Projection,
    light: Light,
    camera: Vec3,
    camera_offset: f64,
    depth_key: DepthKey,
    shade_mapping: ShadeMapping,
}

/// A triangle that survived culling, in camera space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTriangle {
    pub triangle: Triangle,
    pub normal: Vec3,
}

/// The two draw calls for one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub points: ScreenTriangle,
    pub fill: Color,
    /// The depth key the triangle was sorted by
    pub depth: f64,
}

impl DrawCommand {
    /// Fill the polygon, then outline it on top.
    pub fn submit<S: DisplaySurface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        surface.fill_polygon(&self.points, self.fill)?;
        surface.stroke_polygon(&self.points, OUTLINE_COLOR, OUTLINE_WIDTH)
    }
}

impl Scene {
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            light: Light::default(),
            camera: Vec3::from(CAMERA_POSITION),
            camera_offset: CAMERA_OFFSET,
            depth_key: DepthKey::default(),
            shade_mapping: ShadeMapping::default(),
        }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(Projection::for_viewport(config.viewport))
            .with_depth_key(config.depth_key)
            .with_shade_mapping(config.shade_mapping)
    }

    pub fn with_depth_key(mut self, depth_key: DepthKey) -> Self {
        self.depth_key = depth_key;
        self
    }

    pub fn with_shade_mapping(mut self, shade_mapping: ShadeMapping) -> Self {
        self.shade_mapping = shade_mapping;
        self
    }

    pub fn with_camera_offset(mut self, camera_offset: f64) -> Self {
        self.camera_offset = camera_offset;
        self
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    /// Rotate and translate every face, keeping only those facing the
    /// camera. Output follows mesh order.
    pub fn visible_triangles<'a>(
        &'a self,
        mesh: &'a Mesh,
        rotation: &RotationState,
    ) -> impl Iterator<Item = CameraTriangle> + 'a {
        let (rot_z, rot_x) = rotation.matrices();

        mesh.triangles().filter_map(move |tri| {
            let rotated = tri
                .map(|p| transform_point(p, &rot_z))
                .map(|p| transform_point(p, &rot_x));

            let translated = rotated.map(|p| p + Vec3::new(0.0, 0.0, self.camera_offset));
            let normal = translated.normal();

            let facing = normal.dot(&(translated.p1 - self.camera));
            trace!(?translated, facing, "camera space triangle");

            (facing < 0.0).then_some(CameraTriangle {
                triangle: translated,
                normal,
            })
        })
    }

    /// Build this frame's ordered draw list.
    pub fn frame(&self, mesh: &Mesh, rotation: &RotationState) -> Frame<'_> {
        let mut visible: Vec<CameraTriangle> = self.visible_triangles(mesh, rotation).collect();
        let culled = mesh.triangle_count() - visible.len();

        sort_back_to_front(&mut visible, self.depth_key);

        Frame {
            scene: self,
            queue: visible.into_iter(),
            culled,
        }
    }

    /// Shade and project a single camera-space triangle.
    pub fn draw_command(&self, visible: &CameraTriangle) -> DrawCommand {
        let fill = self.light.shade(&visible.normal, self.shade_mapping);
        let [p1, p2, p3] = visible
            .triangle
            .vertices()
            .map(|p| self.projection.project_to_screen(&p));
        trace!(?p1, ?p2, ?p3, ?fill, "screen space triangle");

        DrawCommand {
            points: [p1, p2, p3],
            fill,
            depth: visible.triangle.sort_key(self.depth_key),
        }
    }
}

/// Stable sort, farthest key first. Equal keys keep mesh order.
pub fn sort_back_to_front(triangles: &mut [CameraTriangle], key: DepthKey) {
    triangles.sort_by(|a, b| {
        b.triangle
            .sort_key(key)
            .total_cmp(&a.triangle.sort_key(key))
    });
}

/// One frame's drawable triangles, farthest first.
///
/// The iterator is lazy: shading and projection happen as each command is
/// pulled. It cannot be restarted.
#[derive(Debug)]
pub struct Frame<'a> {
    scene: &'a Scene,
    queue: vec::IntoIter<CameraTriangle>,
    culled: usize,
}

impl Frame<'_> {
    /// Number of faces rejected by the back-face test.
    pub fn culled(&self) -> usize {
        self.culled
    }

    /// Submit every remaining command to `surface`, returning how many
    /// triangles were drawn.
    pub fn submit<S: DisplaySurface + ?Sized>(self, surface: &mut S) -> io::Result<usize> {
        let mut drawn = 0;
        for command in self {
            command.submit(surface)?;
            drawn += 1;
        }
        Ok(drawn)
    }
}

impl Iterator for Frame<'_> {
    type Item = DrawCommand;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue
            .next()
            .map(|visible| self.scene.draw_command(&visible))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.queue.size_hint()
    }
}

impl ExactSizeIterator for Frame<'_> {}
