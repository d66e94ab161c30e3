//! The frame driver: startup, the fixed-rate loop and teardown
use tracing::{debug, error, info};

use crate::config::{SceneConfig, TARGET_FPS};
use crate::error::{Error, Result};
use crate::geometry::Mesh;
use crate::obj::load_obj;
use crate::pipeline::Scene;
use crate::surface::{Color, DisplaySurface, FrameClock};
use crate::transform::RotationState;

/// Lifecycle of a [`FrameDriver`]. `Terminated` and `Aborted` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Init,
    Running,
    Terminated,
    Aborted,
}

/// Running totals kept by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub drawn: u64,
    pub culled: u64,
}

/// Owns the scene, mesh, rotation and surface, and drives one frame per
/// tick until the surface reports a quit request.
pub struct FrameDriver<S: DisplaySurface, C: FrameClock> {
    state: FrameState,
    config: SceneConfig,
    scene: Scene,
    mesh: Option<Mesh>,
    surface: Option<S>,
    clock: C,
    rotation: RotationState,
    stats: FrameStats,
}

impl<S: DisplaySurface, C: FrameClock> FrameDriver<S, C> {
    /// Build the projection. The mesh is not loaded until [`start`](Self::start).
    pub fn new(config: SceneConfig, clock: C) -> Self {
        let scene = Scene::from_config(&config);
        debug!(projection = ?scene.projection().matrix(), "built projection matrix");

        Self {
            state: FrameState::Init,
            config,
            scene,
            mesh: None,
            surface: None,
            clock,
            rotation: RotationState::default(),
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Load the mesh and open the surface, moving to `Running`.
    ///
    /// An invalid config or a load failure moves to `Aborted` and the
    /// surface is never opened.
    pub fn start<F>(&mut self, open_surface: F) -> Result<()>
    where
        F: FnOnce(&SceneConfig) -> std::io::Result<S>,
    {
        if self.state != FrameState::Init {
            return Err(Error::NotRunning(self.state));
        }

        if let Err(e) = self.config.validate() {
            error!("invalid configuration: {e}");
            self.state = FrameState::Aborted;
            return Err(e.into());
        }

        let mesh = match &self.config.model {
            Some(path) => load_obj(path),
            None => {
                info!("no model configured, using the unit cube");
                Ok(Mesh::unit_cube())
            }
        };

        let mesh = match mesh {
            Ok(mesh) => mesh,
            Err(e) => {
                error!("unable to load model: {e}");
                self.state = FrameState::Aborted;
                return Err(e.into());
            }
        };

        let surface = match open_surface(&self.config) {
            Ok(surface) => surface,
            Err(e) => {
                error!("unable to open display surface: {e}");
                self.state = FrameState::Aborted;
                return Err(e.into());
            }
        };

        info!(
            triangles = mesh.triangle_count(),
            width = self.config.viewport.width,
            height = self.config.viewport.height,
            "renderer running"
        );
        self.mesh = Some(mesh);
        self.surface = Some(surface);
        self.state = FrameState::Running;
        Ok(())
    }

    /// Run one loop iteration. Returns `false` once quit has been requested,
    /// after the surface has been torn down.
    pub fn step(&mut self) -> Result<bool> {
        let (Some(mesh), Some(surface)) = (&self.mesh, &mut self.surface) else {
            return Err(Error::NotRunning(self.state));
        };
        if self.state != FrameState::Running {
            return Err(Error::NotRunning(self.state));
        }

        if surface.poll_quit()? {
            info!(frames = self.stats.frames, "quit requested");
            // Terminated even if teardown fails; the surface is not reused
            self.state = FrameState::Terminated;
            surface.teardown()?;
            return Ok(false);
        }

        surface.clear(Color::BLACK)?;
        let frame = self.scene.frame(mesh, &self.rotation);
        let culled = frame.culled();
        let drawn = frame.submit(surface)?;
        surface.present()?;

        self.stats.frames += 1;
        self.stats.drawn += drawn as u64;
        self.stats.culled += culled as u64;
        debug!(
            frame = self.stats.frames,
            theta = self.rotation.theta(),
            drawn,
            culled,
            "frame presented"
        );

        let elapsed = self.clock.tick(TARGET_FPS);
        self.rotation.advance(elapsed);
        Ok(true)
    }

    /// Step until quit is requested.
    pub fn run(&mut self) -> Result<FrameStats> {
        while self.step()? {}
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Viewport;
    use crate::error::{ConfigError, LoadError};
    use crate::surface::{FixedClock, RecordingSurface, ScreenTriangle};
    use std::io;

    /// Asks to quit straight away, then fails to restore itself.
    struct BrokenTeardown;

    impl DisplaySurface for BrokenTeardown {
        fn clear(&mut self, _color: Color) -> io::Result<()> {
            Ok(())
        }

        fn fill_polygon(&mut self, _points: &ScreenTriangle, _color: Color) -> io::Result<()> {
            Ok(())
        }

        fn stroke_polygon(
            &mut self,
            _points: &ScreenTriangle,
            _color: Color,
            _stroke_width: u32,
        ) -> io::Result<()> {
            Ok(())
        }

        fn present(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn poll_quit(&mut self) -> io::Result<bool> {
            Ok(true)
        }

        fn teardown(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "terminal gone"))
        }
    }

    fn driver(config: SceneConfig) -> FrameDriver<RecordingSurface, FixedClock> {
        FrameDriver::new(config, FixedClock::new(0.5))
    }

    #[test]
    fn test_missing_model_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = SceneConfig {
            model: Some(dir.path().join("ship.obj")),
            ..SceneConfig::default()
        };

        let mut driver = driver(config);
        assert_eq!(driver.state(), FrameState::Init);

        let mut opened = false;
        let err = driver
            .start(|_| {
                opened = true;
                Ok(RecordingSurface::new(None))
            })
            .unwrap_err();

        assert!(matches!(err, Error::Load(LoadError::MissingModelFile(_))));
        assert_eq!(driver.state(), FrameState::Aborted);
        assert!(!opened);
        assert!(matches!(driver.step(), Err(Error::NotRunning(FrameState::Aborted))));
    }

    #[test]
    fn test_empty_viewport_aborts() {
        let config = SceneConfig {
            viewport: Viewport::new(0, 0),
            ..SceneConfig::default()
        };

        let mut driver = driver(config);
        let mut opened = false;
        let err = driver
            .start(|_| {
                opened = true;
                Ok(RecordingSurface::new(None))
            })
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidViewport {
                width: 0,
                height: 0
            })
        ));
        assert_eq!(driver.state(), FrameState::Aborted);
        assert!(!opened);
    }

    #[test]
    fn test_failed_teardown_still_terminates() {
        let mut driver: FrameDriver<BrokenTeardown, FixedClock> =
            FrameDriver::new(SceneConfig::default(), FixedClock::new(0.5));
        driver.start(|_| Ok(BrokenTeardown)).unwrap();

        assert!(matches!(driver.step(), Err(Error::Surface(_))));
        assert_eq!(driver.state(), FrameState::Terminated);
        assert!(matches!(
            driver.step(),
            Err(Error::NotRunning(FrameState::Terminated))
        ));
    }

    #[test]
    fn test_step_before_start() {
        let mut driver = driver(SceneConfig::default());
        assert!(matches!(driver.step(), Err(Error::NotRunning(FrameState::Init))));
    }

    #[test]
    fn test_run_until_quit() {
        let mut driver = driver(SceneConfig::default());
        driver
            .start(|_| Ok(RecordingSurface::new(Some(3))))
            .unwrap();
        assert_eq!(driver.state(), FrameState::Running);

        let stats = driver.run().unwrap();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.drawn + stats.culled, 3 * 12);
        assert_eq!(driver.state(), FrameState::Terminated);
        assert!(driver.surface().unwrap().is_torn_down());
        assert!((driver.rotation().theta() - 1.5).abs() < 1e-12);

        // Terminated is final
        assert!(driver.step().is_err());
        assert!(driver.start(|_| Ok(RecordingSurface::new(None))).is_err());
    }

    #[test]
    fn test_first_frame_draws_front_face() {
        let mut driver = driver(SceneConfig::default());
        driver
            .start(|_| Ok(RecordingSurface::new(Some(1))))
            .unwrap();
        assert!(driver.step().unwrap());
        assert!(!driver.step().unwrap());

        let stats = driver.stats();
        assert_eq!(stats.drawn, 2);
        assert_eq!(stats.culled, 10);
    }
}
