//! Hearts that drift up from the bottom edge

use crate::colors::{Rgb, HEART_PALETTE};
use crate::terminal::Terminal;
use rand::Rng;
use std::time::Duration;

pub const SPAWN_INTERVAL: Duration = Duration::from_millis(500);
pub const LIFETIME: Duration = Duration::from_secs(8);
const INITIAL_BURST: usize = 8;
const INITIAL_STAGGER: Duration = Duration::from_millis(200);
const SYMBOLS: [char; 7] = ['♥', '❤', '♡', '❥', '❣', 'ღ', '❦'];
const BOLD_SIZE: f64 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct FloatingHeart {
    pub symbol: char,
    /// Horizontal position as a fraction of the width
    pub left: f64,
    pub size: f64,
    pub color: Rgb,
    pub duration: Duration,
    pub delay: Duration,
    pub age: Duration,
}

impl FloatingHeart {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            symbol: SYMBOLS[rng.gen_range(0..SYMBOLS.len())],
            left: rng.gen::<f64>(),
            size: rng.gen_range(0.8..2.3),
            color: HEART_PALETTE[rng.gen_range(0..HEART_PALETTE.len())],
            duration: Duration::from_secs_f64(rng.gen_range(4.0..7.0)),
            delay: Duration::from_secs_f64(rng.gen_range(0.0..2.0)),
            age: Duration::ZERO,
        }
    }

    /// Rise progress in [0, 1), or None while waiting or after reaching the top
    pub fn progress(&self) -> Option<f64> {
        let flying = self.age.checked_sub(self.delay)?;
        let t = flying.as_secs_f64() / self.duration.as_secs_f64();
        (t < 1.0).then_some(t)
    }

    /// Screen cell for a `width` x `height` area
    pub fn cell(&self, width: u16, height: u16) -> Option<(i32, i32)> {
        let t = self.progress()?;
        let x = (self.left * width as f64) as i32;
        let y = ((1.0 - t) * height as f64) as i32;
        Some((x, y.min(height as i32 - 1)))
    }
}

/// Periodic spawner, plus a short staggered burst at startup
pub struct HeartSpawner {
    hearts: Vec<FloatingHeart>,
    since_spawn: Duration,
    clock: Duration,
    initial_left: usize,
}

impl Default for HeartSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl HeartSpawner {
    pub fn new() -> Self {
        Self {
            hearts: Vec::new(),
            since_spawn: Duration::ZERO,
            clock: Duration::ZERO,
            initial_left: INITIAL_BURST,
        }
    }

    #[cfg(test)]
    pub fn hearts(&self) -> &[FloatingHeart] {
        &self.hearts
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, elapsed: Duration, rng: &mut R) {
        for heart in &mut self.hearts {
            heart.age += elapsed;
        }
        self.hearts.retain(|h| h.age < LIFETIME);

        self.clock += elapsed;
        while self.initial_left > 0 {
            let due = INITIAL_STAGGER * (INITIAL_BURST - self.initial_left) as u32;
            if self.clock < due {
                break;
            }
            self.spawn(self.clock - due, rng);
            self.initial_left -= 1;
        }

        self.since_spawn += elapsed;
        while self.since_spawn >= SPAWN_INTERVAL {
            self.since_spawn -= SPAWN_INTERVAL;
            self.spawn(self.since_spawn, rng);
        }
    }

    fn spawn<R: Rng + ?Sized>(&mut self, age: Duration, rng: &mut R) {
        let heart = FloatingHeart {
            age,
            ..FloatingHeart::random(rng)
        };
        if heart.age < LIFETIME {
            self.hearts.push(heart);
        }
    }

    pub fn render(&self, term: &mut Terminal) {
        let (width, height) = term.size();
        for heart in &self.hearts {
            if let Some((x, y)) = heart.cell(width, height) {
                let color = heart.color.to_color();
                term.set(x, y, heart.symbol, Some(color), heart.size >= BOLD_SIZE);
            }
        }
    }
}
