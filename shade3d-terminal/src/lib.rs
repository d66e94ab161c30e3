//! Terminal display surface for the shade3d renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::Point2;
use shade3d_core::surface::{FixedClock, ScreenTriangle};
use shade3d_core::{
    Color, DisplaySurface, FrameDriver, FrameStats, RecordingSurface, SceneConfig, Viewport,
};
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod clock;
pub mod renderer;

pub use clock::WallClock;
pub use renderer::CellCanvas;

/// Draws into a cell grid sized to the terminal and flushes it to stdout.
///
/// Viewport pixel coordinates are scaled down to terminal cells; the top row
/// is kept for a status line.
pub struct TerminalSurface {
    viewport: Viewport,
    canvas: CellCanvas,
    stdout: Stdout,
    active: bool,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalSurface {
    /// Enter raw mode and the alternate screen.
    pub fn initialize(viewport: Viewport) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;

        terminal::enable_raw_mode()?;
        let mut stdout = stdout();
        enter_alternate_screen(&mut stdout, terminal::disable_raw_mode)?;
        debug!(columns, rows, "entered alternate screen");

        Ok(Self {
            viewport,
            canvas: CellCanvas::new(columns as usize, (rows as usize).saturating_sub(1)),
            stdout,
            active: true,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    fn to_cells(&self, points: &ScreenTriangle) -> ScreenTriangle {
        let sx = self.canvas.width() as f64 / self.viewport.width as f64;
        let sy = self.canvas.height() as f64 / self.viewport.height as f64;
        points.map(|p| Point2::new(p.x * sx, p.y * sy))
    }

    fn sample_fps(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        let window = now - self.last_fps_sample;
        if window.as_secs() >= 1 {
            self.fps = self.frame_count as f32 / window.as_secs_f32();
            self.frame_count = 0;
            self.last_fps_sample = now;
        }
    }
}

/// Switch `out` to the alternate screen with the cursor hidden. On failure
/// `restore` undoes raw mode, since no surface exists yet for `Drop` to clean
/// up.
fn enter_alternate_screen<W, F>(out: &mut W, restore: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce() -> io::Result<()>,
{
    if let Err(e) = execute!(out, terminal::EnterAlternateScreen, cursor::Hide) {
        let _ = restore();
        return Err(e);
    }
    Ok(())
}

impl DisplaySurface for TerminalSurface {
    fn clear(&mut self, color: Color) -> io::Result<()> {
        self.canvas.clear(color);
        Ok(())
    }

    fn fill_polygon(&mut self, points: &ScreenTriangle, color: Color) -> io::Result<()> {
        let cells = self.to_cells(points);
        self.canvas.fill_triangle(&cells, color);
        Ok(())
    }

    /// Outlines are one cell wide whatever the requested width.
    fn stroke_polygon(
        &mut self,
        points: &ScreenTriangle,
        color: Color,
        _stroke_width: u32,
    ) -> io::Result<()> {
        let cells = self.to_cells(points);
        self.canvas.stroke_triangle(&cells, color);
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.sample_fps();

        queue!(
            self.stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(TermColor::Yellow),
            terminal::Clear(terminal::ClearType::CurrentLine),
            Print(format!("shade3d | FPS: {:.1} | Q/Esc quit", self.fps)),
            ResetColor,
            cursor::MoveTo(0, 1)
        )?;
        self.canvas.draw(&mut self.stdout)?;
        self.stdout.flush()
    }

    fn poll_quit(&mut self) -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    ..
                }) => match code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    _ => {}
                },
                Event::Resize(columns, rows) => {
                    debug!(columns, rows, "terminal resized");
                    self.canvas
                        .resize(columns as usize, (rows as usize).saturating_sub(1));
                    execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
                }
                _ => {}
            }
        }
        Ok(false)
    }

    fn teardown(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode()?;
        execute!(self.stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        debug!("left alternate screen");
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        // Restore the terminal if the frame loop bailed out early
        let _ = self.teardown();
    }
}

/// Render to the terminal until the user quits.
pub fn run_interactive(config: SceneConfig) -> shade3d_core::Result<FrameStats> {
    let mut driver = FrameDriver::new(config, WallClock::new());
    driver.start(|config| TerminalSurface::initialize(config.viewport))?;
    driver.run()
}

/// Render `frames` frames into memory without touching the terminal.
pub fn run_headless(config: SceneConfig, frames: u64) -> shade3d_core::Result<FrameStats> {
    let step = 1.0 / shade3d_core::config::TARGET_FPS as f64;
    let mut driver = FrameDriver::new(config, FixedClock::new(step));
    driver.start(|_| Ok(RecordingSurface::new(Some(frames)).latest_frame_only()))?;

    let stats = driver.run()?;
    info!(
        frames = stats.frames,
        drawn = stats.drawn,
        culled = stats.culled,
        theta = driver.rotation().theta(),
        "headless run finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_failed_screen_switch_restores_raw_mode() {
        let mut restored = false;
        let err = enter_alternate_screen(&mut ClosedPipe, || {
            restored = true;
            Ok(())
        })
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(restored);

        let mut restored = false;
        let mut out = Vec::new();
        enter_alternate_screen(&mut out, || {
            restored = true;
            Ok(())
        })
        .unwrap();
        assert!(!restored);
        assert!(!out.is_empty());
    }

    #[test]
    fn test_headless_run() {
        let stats = run_headless(SceneConfig::default(), 30).unwrap();
        assert_eq!(stats.frames, 30);
        assert_eq!(stats.drawn + stats.culled, 30 * 12);
        assert!(stats.drawn > 0);
    }

    #[test]
    fn test_headless_missing_model() {
        let config = SceneConfig {
            model: Some("does/not/exist.obj".into()),
            ..SceneConfig::default()
        };
        assert!(matches!(
            run_headless(config, 1),
            Err(shade3d_core::Error::Load(shade3d_core::LoadError::MissingModelFile(_)))
        ));
    }
}
