//! shade3d core library - the software rendering pipeline
//!
//! Holds everything between a model file on disk and a list of shaded,
//! depth-ordered screen-space polygons: vector math, OBJ loading, rotation
//! and projection transforms, back-face culling, painter's ordering, flat
//! shading and the frame driver that feeds a [`DisplaySurface`].

pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod math;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod shading;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use config::{SceneConfig, Viewport};
pub use driver::{FrameDriver, FrameState, FrameStats};
pub use error::{ConfigError, Error, LoadError, Result};
pub use geometry::{DepthKey, Face, Mesh, Triangle};
pub use math::{Mat4, Vec3};
pub use pipeline::{DrawCommand, Frame, Scene};
pub use projection::Projection;
pub use shading::{Light, ShadeMapping};
pub use surface::{Color, DisplaySurface, FrameClock, RecordingSurface};
pub use transform::{RotationState, Transform};
