//! Sparkles that fly out of a click and fade

use crate::colors::SPARKLE;
use crate::terminal::Terminal;
use kurbo::{Point, Vec2};
use std::f64::consts::TAU;

pub const SPARKLES_PER_BURST: usize = 12;
const SPEED: f64 = 150.0;
/// Integration step per frame, independent of the real frame time
const FRAME_STEP: f64 = 0.016;
const FADE_PER_FRAME: f64 = 0.02;
const GLYPH: char = '✦';

#[derive(Clone, Debug, PartialEq)]
pub struct Sparkle {
    pub pos: Point,
    pub vel: Vec2,
    pub opacity: f64,
}

/// Every live sparkle, in pixel space
#[derive(Default)]
pub struct Bursts {
    sparkles: Vec<Sparkle>,
}

impl Bursts {
    #[cfg(test)]
    pub fn sparkles(&self) -> &[Sparkle] {
        &self.sparkles
    }

    pub fn spawn(&mut self, at: Point) {
        self.sparkles.extend((0..SPARKLES_PER_BURST).map(|i| {
            let angle = TAU * i as f64 / SPARKLES_PER_BURST as f64;
            Sparkle {
                pos: at,
                vel: Vec2::from_angle(angle) * SPEED,
                opacity: 1.0,
            }
        }));
    }

    /// Advance one frame and drop fully faded sparkles
    pub fn step(&mut self) {
        for s in &mut self.sparkles {
            s.pos += s.vel * FRAME_STEP;
            s.opacity -= FADE_PER_FRAME;
        }
        self.sparkles.retain(|s| s.opacity > 0.0);
    }

    /// `cell_px` converts pixel positions to terminal cells
    pub fn render(&self, term: &mut Terminal, cell_px: Vec2) {
        for s in &self.sparkles {
            let col = (s.pos.x / cell_px.x).floor() as i32;
            let row = (s.pos.y / cell_px.y).floor() as i32;
            let color = SPARKLE.fade(s.opacity).to_color();
            term.set(col, row, GLYPH, Some(color), s.opacity > 0.5);
        }
    }
}
