//! The display-surface and frame-clock seams
//!
//! The core never rasterizes anything itself. Each frame it hands screen
//! space polygons to a [`DisplaySurface`] and asks a [`FrameClock`] how much
//! time has passed.

use std::io;

use nalgebra::Point2;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::gray(0);
    pub const WHITE: Color = Color::gray(255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }
}

/// Three points in viewport pixel coordinates
pub type ScreenTriangle = [Point2<f64>; 3];

/// A 2D raster target. Created by the implementor's constructor with the
/// viewport size, released with [`DisplaySurface::teardown`].
pub trait DisplaySurface {
    fn clear(&mut self, color: Color) -> io::Result<()>;

    fn fill_polygon(&mut self, points: &ScreenTriangle, color: Color) -> io::Result<()>;

    fn stroke_polygon(
        &mut self,
        points: &ScreenTriangle,
        color: Color,
        stroke_width: u32,
    ) -> io::Result<()>;

    fn present(&mut self) -> io::Result<()>;

    /// Whether the user asked to quit since the last poll.
    fn poll_quit(&mut self) -> io::Result<bool>;

    fn teardown(&mut self) -> io::Result<()>;
}

/// Paces the frame loop.
pub trait FrameClock {
    /// Wait until the next frame is due at `target_fps` and return the
    /// seconds elapsed since the previous tick.
    fn tick(&mut self, target_fps: u32) -> f64;
}

/// A clock that never sleeps and always reports the same step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    pub step: f64,
}

impl FixedClock {
    pub fn new(step: f64) -> Self {
        Self { step }
    }
}

impl FrameClock for FixedClock {
    fn tick(&mut self, _target_fps: u32) -> f64 {
        self.step
    }
}

/// A single call made against a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Fill(ScreenTriangle, Color),
    Stroke(ScreenTriangle, Color, u32),
    Present,
}

/// An in-memory surface that records every call made against it.
///
/// It reports a quit request once `frame_limit` frames have been presented,
/// which makes it usable for headless runs as well as tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
    frames: u64,
    frame_limit: Option<u64>,
    torn_down: bool,
    keep_history: bool,
}

impl RecordingSurface {
    /// Record every call, quitting after `frame_limit` presented frames.
    pub fn new(frame_limit: Option<u64>) -> Self {
        Self {
            frame_limit,
            keep_history: true,
            ..Self::default()
        }
    }

    /// Only keep the calls of the most recent frame.
    pub fn latest_frame_only(mut self) -> Self {
        self.keep_history = false;
        self
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Calls made since the most recent clear.
    pub fn last_frame(&self) -> &[DrawCall] {
        let start = self
            .calls
            .iter()
            .rposition(|call| matches!(call, DrawCall::Clear(_)))
            .unwrap_or(0);
        &self.calls[start..]
    }
}

impl DisplaySurface for RecordingSurface {
    fn clear(&mut self, color: Color) -> io::Result<()> {
        if !self.keep_history {
            self.calls.clear();
        }
        self.calls.push(DrawCall::Clear(color));
        Ok(())
    }

    fn fill_polygon(&mut self, points: &ScreenTriangle, color: Color) -> io::Result<()> {
        self.calls.push(DrawCall::Fill(*points, color));
        Ok(())
    }

    fn stroke_polygon(
        &mut self,
        points: &ScreenTriangle,
        color: Color,
        stroke_width: u32,
    ) -> io::Result<()> {
        self.calls
            .push(DrawCall::Stroke(*points, color, stroke_width));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.frames += 1;
        self.calls.push(DrawCall::Present);
        Ok(())
    }

    fn poll_quit(&mut self) -> io::Result<bool> {
        Ok(self.frame_limit.is_some_and(|limit| self.frames >= limit))
    }

    fn teardown(&mut self) -> io::Result<()> {
        self.torn_down = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> ScreenTriangle {
        [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_recording_surface_quits_after_limit() {
        let mut surface = RecordingSurface::new(Some(2));
        assert!(!surface.poll_quit().unwrap());
        surface.present().unwrap();
        assert!(!surface.poll_quit().unwrap());
        surface.present().unwrap();
        assert!(surface.poll_quit().unwrap());
    }

    #[test]
    fn test_unlimited_surface_never_quits() {
        let mut surface = RecordingSurface::new(None);
        for _ in 0..10 {
            surface.present().unwrap();
        }
        assert!(!surface.poll_quit().unwrap());
    }

    #[test]
    fn test_last_frame() {
        let mut surface = RecordingSurface::new(None);
        surface.clear(Color::BLACK).unwrap();
        surface.fill_polygon(&triangle(), Color::WHITE).unwrap();
        surface.present().unwrap();
        surface.clear(Color::BLACK).unwrap();
        surface.present().unwrap();

        assert_eq!(surface.calls().len(), 5);
        assert_eq!(
            surface.last_frame(),
            &[DrawCall::Clear(Color::BLACK), DrawCall::Present]
        );
    }

    #[test]
    fn test_latest_frame_only_drops_history() {
        let mut surface = RecordingSurface::new(None).latest_frame_only();
        for _ in 0..3 {
            surface.clear(Color::BLACK).unwrap();
            surface.stroke_polygon(&triangle(), Color::BLACK, 1).unwrap();
            surface.present().unwrap();
        }
        assert_eq!(surface.calls().len(), 3);
        assert_eq!(surface.frames_presented(), 3);
    }

    #[test]
    fn test_fixed_clock() {
        let mut clock = FixedClock::new(0.25);
        assert_eq!(clock.tick(60), 0.25);
        assert_eq!(clock.tick(30), 0.25);
    }
}
