//! Cell-grid rasterizer for terminal output
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use shade3d_core::Color;
use std::io::Write;

/// Character luminosity ramp (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// A grid of colored cells that polygons are rasterized into.
///
/// There is no depth buffer: later draws overwrite earlier ones, so callers
/// submit triangles farthest first.
pub struct CellCanvas {
    width: usize,
    height: usize,
    cells: Vec<Color>,
}

impl CellCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Color::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self, color: Color) {
        self.cells.fill(color);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    fn set(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = color;
        }
    }

    /// Fill every cell whose center lies inside the triangle. Either winding
    /// is accepted.
    pub fn fill_triangle(&mut self, points: &[Point2<f64>; 3], color: Color) {
        let [v0, v1, v2] = *points;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.width as f64 - 1.0) as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.height as f64 - 1.0) as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f64 + 0.5, y as f64 + 0.5);

                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.set(x, y, color);
                    }
                }
            }
        }
    }

    /// Draw the three edges of a triangle one cell wide.
    pub fn stroke_triangle(&mut self, points: &[Point2<f64>; 3], color: Color) {
        for i in 0..3 {
            self.line(points[i], points[(i + 1) % 3], color);
        }
    }

    /// Bresenham line between two points, in cell coordinates.
    fn line(&mut self, from: Point2<f64>, to: Point2<f64>, color: Color) {
        // Points behind the camera can project arbitrarily far away
        let limit = ((self.width + self.height) * 8) as f64;
        if [from.x, from.y, to.x, to.y]
            .iter()
            .any(|c| !c.is_finite() || c.abs() > limit)
        {
            return;
        }

        let (mut x0, mut y0) = (from.x.floor() as i64, from.y.floor() as i64);
        let (x1, y1) = (to.x.floor() as i64, to.y.floor() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let color = self.cells[y * self.width + x];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(TermColor::Rgb {
                        r: color.r,
                        g: color.g,
                        b: color.b,
                    }))?;
                    current = Some(color);
                }
                writer.queue(Print(glyph(color)))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pick a ramp character from the color's brightness.
fn glyph(color: Color) -> char {
    let luma = (color.r as usize + color.g as usize + color.b as usize) / 3;
    LUMINOSITY_RAMP[luma * (LUMINOSITY_RAMP.len() - 1) / 255]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: Point2<f64>,
    v1: Point2<f64>,
    v2: Point2<f64>,
    p: Point2<f64>,
) -> Option<(f64, f64, f64)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
