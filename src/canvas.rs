//! Drawing surfaces
//!
//! Renderers draw through [`Surface`] in their own logical units. [`Canvas`]
//! rasterizes onto braille dots (2x4 per terminal cell) and is composited into
//! the terminal buffer once per frame.

use crate::colors::Rgb;
use crate::terminal::Terminal;
use kurbo::{Affine, Point, Vec2};

/// Braille dot bit for (row, column) inside a cell
const BRAILLE_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];
const BRAILLE_BASE: u32 = 0x2800;

pub const HEART_GLYPH: char = '♥';

/// Append-only drawing operations used by the tree and particle renderers.
pub trait Surface {
    /// Wipe everything drawn so far
    fn clear(&mut self);

    /// Round-capped line of the given stroke width; `alpha` in [0, 1]
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgb, alpha: f64);

    fn fill_ellipse(&mut self, center: Point, radii: Vec2, color: Rgb, alpha: f64);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        self.fill_ellipse(center, Vec2::new(radius, radius), color, 1.0);
    }

    fn draw_heart(&mut self, at: Point, scale: f64, color: Rgb);
}

#[derive(Clone, Copy, Default)]
struct CanvasCell {
    dots: u8,
    color: Option<Rgb>,
    glyph: Option<char>,
    bold: bool,
}

/// Braille raster with a uniform scale + offset from logical units to dots.
pub struct Canvas {
    cols: usize,
    rows: usize,
    cells: Vec<CanvasCell>,
    transform: Affine,
    scale: f64,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, scale: f64, offset: Vec2) -> Self {
        let cols = cols as usize;
        let rows = rows as usize;
        Self {
            cols,
            rows,
            cells: vec![CanvasCell::default(); cols * rows],
            transform: Affine::scale(scale).then_translate(offset),
            scale,
        }
    }

    /// Fit a `logical_w` x `logical_h` space inside the dot grid of
    /// `cols` x `rows` cells, centered horizontally and bottom-aligned
    /// within `top..top + rows` cells.
    pub fn fitted(cols: u16, rows: u16, top: u16, avail_rows: u16, logical_w: f64, logical_h: f64) -> Self {
        let dots_w = cols as f64 * 2.0;
        let dots_h = avail_rows as f64 * 4.0;
        let scale = (dots_w / logical_w).min(dots_h / logical_h).max(0.0);
        let offset = Vec2::new(
            (dots_w - logical_w * scale) / 2.0,
            top as f64 * 4.0 + (dots_h - logical_h * scale),
        );
        Self::new(cols, rows, scale, offset)
    }

    #[cfg(test)]
    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    #[cfg(test)]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Cell coordinates of a logical point
    pub fn cell_of(&self, p: Point) -> (i32, i32) {
        let d = self.transform * p;
        ((d.x / 2.0).floor() as i32, (d.y / 4.0).floor() as i32)
    }

    /// Turn on a single dot
    pub fn plot(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let (col, row) = (x / 2, y / 4);
        if col >= self.cols || row >= self.rows {
            return;
        }
        let cell = &mut self.cells[row * self.cols + col];
        cell.dots |= BRAILLE_BITS[y % 4][x % 2];
        cell.color = Some(color);
    }

    fn stamp(&mut self, x: i32, y: i32, radius: i32, color: Rgb) {
        if radius == 0 {
            self.plot(x, y, color);
            return;
        }
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.plot(x + dx, y + dy, color);
                }
            }
        }
    }

    pub fn put_glyph(&mut self, p: Point, ch: char, color: Rgb, bold: bool) {
        let (col, row) = self.cell_of(p);
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return;
        }
        let cell = &mut self.cells[row as usize * self.cols + col as usize];
        cell.glyph = Some(ch);
        cell.color = Some(color);
        cell.bold = bold;
    }

    /// The character, color and weight a cell would show, if any
    pub fn cell(&self, col: usize, row: usize) -> Option<(char, Rgb, bool)> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let cell = &self.cells[row * self.cols + col];
        let color = cell.color?;
        if let Some(ch) = cell.glyph {
            return Some((ch, color, cell.bold));
        }
        if cell.dots == 0 {
            return None;
        }
        let ch = char::from_u32(BRAILLE_BASE + cell.dots as u32).unwrap_or(' ');
        Some((ch, color, cell.bold))
    }

    /// Copy every non-empty cell into the terminal buffer
    pub fn blit(&self, term: &mut Terminal) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if let Some((ch, color, bold)) = self.cell(col, row) {
                    term.set(col as i32, row as i32, ch, Some(color.to_color()), bold);
                }
            }
        }
    }
}

impl Surface for Canvas {
    fn clear(&mut self) {
        self.cells.fill(CanvasCell::default());
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgb, alpha: f64) {
        let color = color.fade(alpha);
        let radius = ((width * self.scale - 1.0) / 2.0).max(0.0).round() as i32;
        let a = self.transform * from;
        let b = self.transform * to;
        let (mut x, mut y) = (a.x.floor() as i32, a.y.floor() as i32);
        let (x1, y1) = (b.x.floor() as i32, b.y.floor() as i32);

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x, y, radius, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn fill_ellipse(&mut self, center: Point, radii: Vec2, color: Rgb, alpha: f64) {
        let color = color.fade(alpha);
        let c = self.transform * center;
        let rx = radii.x * self.scale;
        let ry = radii.y * self.scale;
        if rx < 0.5 || ry < 0.5 {
            self.plot(c.x.floor() as i32, c.y.floor() as i32, color);
            return;
        }
        let (x0, x1) = ((c.x - rx).floor() as i32, (c.x + rx).ceil() as i32);
        let (y0, y1) = ((c.y - ry).floor() as i32, (c.y + ry).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let nx = (x as f64 + 0.5 - c.x) / rx;
                let ny = (y as f64 + 0.5 - c.y) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.plot(x, y, color);
                }
            }
        }
    }

    fn draw_heart(&mut self, at: Point, scale: f64, color: Rgb) {
        self.put_glyph(at, HEART_GLYPH, color, scale >= 1.0);
    }
}

#[cfg(test)]
pub mod recording {
    use super::Surface;
    use crate::colors::Rgb;
    use kurbo::{Point, Vec2};

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawOp {
        Clear,
        Line { from: Point, to: Point, width: f64, color: Rgb, alpha: f64 },
        Ellipse { center: Point, radii: Vec2, color: Rgb, alpha: f64 },
        Heart { at: Point, scale: f64, color: Rgb },
    }

    /// Surface that remembers every call, in order
    #[derive(Default)]
    pub struct RecordingSurface {
        pub ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub fn lines(&self) -> Vec<&DrawOp> {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).collect()
        }
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) {
            self.ops.push(DrawOp::Clear);
        }

        fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgb, alpha: f64) {
            self.ops.push(DrawOp::Line { from, to, width, color, alpha });
        }

        fn fill_ellipse(&mut self, center: Point, radii: Vec2, color: Rgb, alpha: f64) {
            self.ops.push(DrawOp::Ellipse { center, radii, color, alpha });
        }

        fn draw_heart(&mut self, at: Point, scale: f64, color: Rgb) {
            self.ops.push(DrawOp::Heart { at, scale, color });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb(255, 0, 0);

    #[test]
    fn single_dot_maps_to_braille_bit() {
        let mut canvas = Canvas::new(2, 2, 1.0, Vec2::ZERO);
        canvas.plot(0, 0, RED);
        assert_eq!(canvas.cell(0, 0), Some(('\u{2801}', RED, false)));
        canvas.plot(1, 3, RED);
        assert_eq!(canvas.cell(0, 0), Some(('\u{2881}', RED, false)));
        assert_eq!(canvas.cell(1, 0), None);
    }

    #[test]
    fn out_of_bounds_plots_are_ignored() {
        let mut canvas = Canvas::new(2, 2, 1.0, Vec2::ZERO);
        canvas.plot(-1, 0, RED);
        canvas.plot(4, 0, RED);
        canvas.plot(0, 8, RED);
        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(canvas.cell(col, row), None);
            }
        }
    }

    #[test]
    fn horizontal_line_covers_every_cell() {
        let mut canvas = Canvas::new(4, 1, 1.0, Vec2::ZERO);
        canvas.stroke_line(Point::new(0.0, 0.0), Point::new(7.0, 0.0), 1.0, RED, 1.0);
        for col in 0..4 {
            let (ch, _, _) = canvas.cell(col, 0).expect("cell should be lit");
            assert_eq!(ch, '\u{2809}');
        }
    }

    #[test]
    fn translucent_line_is_faded() {
        let mut canvas = Canvas::new(1, 1, 1.0, Vec2::ZERO);
        canvas.stroke_line(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 1.0, Rgb(200, 100, 0), 0.5);
        assert_eq!(canvas.cell(0, 0).map(|c| c.1), Some(Rgb(100, 50, 0)));
    }

    #[test]
    fn heart_glyph_overrides_dots() {
        let mut canvas = Canvas::new(3, 3, 1.0, Vec2::ZERO);
        canvas.plot(2, 4, RED);
        canvas.draw_heart(Point::new(2.5, 4.5), 1.2, Rgb(1, 2, 3));
        assert_eq!(canvas.cell(1, 1), Some((HEART_GLYPH, Rgb(1, 2, 3), true)));
        canvas.draw_heart(Point::new(0.0, 0.0), 0.7, RED);
        assert_eq!(canvas.cell(0, 0), Some((HEART_GLYPH, RED, false)));
    }

    #[test]
    fn clear_wipes_everything() {
        let mut canvas = Canvas::new(2, 2, 1.0, Vec2::ZERO);
        canvas.fill_ellipse(Point::new(2.0, 4.0), Vec2::new(2.0, 3.0), RED, 1.0);
        assert!(canvas.cell(0, 0).is_some());
        canvas.clear();
        assert!(canvas.cell(0, 0).is_none());
        assert!(canvas.cell(1, 1).is_none());
    }

    #[test]
    fn fitted_canvas_keeps_aspect_and_bottom_aligns() {
        // 100 cols x 50 rows -> 200 x 200 dots for a 1000 x 800 space
        let canvas = Canvas::fitted(100, 50, 0, 50, 1000.0, 800.0);
        assert!((canvas.scale() - 0.2).abs() < 1e-9);
        // bottom edge of the logical space lands on the last row
        assert_eq!(canvas.cell_of(Point::new(500.0, 799.0)), (50, 49));
        assert_eq!(canvas.cell_of(Point::new(0.0, 0.0)), (0, 10));
    }
}
