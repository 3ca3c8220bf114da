//! Growing-tree animation
//!
//! Ground and trunk are painted at once; branches and then hearts are
//! revealed one per tick. The driver has no clock of its own: the frame loop
//! hands it the time elapsed since the previous frame.

use crate::canvas::Surface;
use crate::colors::{BARK, SOIL};
use crate::tree::Tree;
use kurbo::{Point, Vec2};
use std::time::Duration;
use tracing::info;

const GROUND_CENTER: Point = Point::new(500.0, 750.0);
const GROUND_RADII: Vec2 = Vec2::new(400.0, 50.0);
const GROUND_ALPHA: f64 = 0.5;
const TRUNK_BASE: Point = Point::new(500.0, 750.0);
const TRUNK_TOP: Point = Point::new(500.0, 650.0);
const TRUNK_WIDTH: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealTiming {
    pub initial_delay: Duration,
    pub branch_interval: Duration,
    pub heart_pause: Duration,
    pub heart_interval: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            branch_interval: Duration::from_millis(20),
            heart_pause: Duration::from_millis(500),
            heart_interval: Duration::from_millis(30),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    DrawingBranches { cursor: usize },
    DrawingHearts { cursor: usize },
    Done,
}

pub struct Reveal {
    state: RevealState,
    timing: RevealTiming,
    /// Time left before the current state acts again
    wait: Duration,
    /// Elapsed time not yet spent on actions
    budget: Duration,
}

/// Ground ellipse and trunk; drawn before anything is revealed.
pub fn draw_base<S: Surface + ?Sized>(surface: &mut S) {
    surface.fill_ellipse(GROUND_CENTER, GROUND_RADII, SOIL, GROUND_ALPHA);
    surface.stroke_line(TRUNK_BASE, TRUNK_TOP, TRUNK_WIDTH, BARK, 1.0);
}

impl Reveal {
    pub fn new(timing: RevealTiming) -> Self {
        Self {
            state: RevealState::Idle,
            timing,
            wait: timing.initial_delay,
            budget: Duration::ZERO,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> RevealState {
        self.state
    }

    #[cfg(test)]
    pub fn is_done(&self) -> bool {
        self.state == RevealState::Done
    }

    /// How many (branches, hearts) are already on the surface
    pub fn revealed(&self, tree: &Tree) -> (usize, usize) {
        match self.state {
            RevealState::Idle => (0, 0),
            RevealState::DrawingBranches { cursor } => (cursor, 0),
            RevealState::DrawingHearts { cursor } => (tree.branches.len(), cursor),
            RevealState::Done => (tree.branches.len(), tree.hearts.len()),
        }
    }

    /// Spend `elapsed` on whatever draws have come due, in order.
    /// Returns the number of elements drawn.
    pub fn advance<S: Surface + ?Sized>(&mut self, elapsed: Duration, tree: &Tree, surface: &mut S) -> usize {
        self.budget = self.budget.saturating_add(elapsed);
        let mut drawn = 0;

        while self.state != RevealState::Done && self.budget >= self.wait {
            self.budget -= self.wait;
            match self.state {
                RevealState::Idle => {
                    info!(branches = tree.branches.len(), "revealing branches");
                    self.state = RevealState::DrawingBranches { cursor: 0 };
                    self.wait = Duration::ZERO;
                }
                RevealState::DrawingBranches { cursor } => match tree.branches.get(cursor) {
                    Some(b) => {
                        surface.stroke_line(b.start, b.end, b.width, BARK, 1.0);
                        drawn += 1;
                        self.state = RevealState::DrawingBranches { cursor: cursor + 1 };
                        self.wait = self.timing.branch_interval;
                    }
                    None => {
                        info!(hearts = tree.hearts.len(), "revealing hearts");
                        self.state = RevealState::DrawingHearts { cursor: 0 };
                        self.wait = self.timing.heart_pause;
                    }
                },
                RevealState::DrawingHearts { cursor } => match tree.hearts.get(cursor) {
                    Some(h) => {
                        surface.draw_heart(h.at, h.scale, h.color);
                        drawn += 1;
                        self.state = RevealState::DrawingHearts { cursor: cursor + 1 };
                        self.wait = self.timing.heart_interval;
                    }
                    None => {
                        info!("tree complete");
                        self.state = RevealState::Done;
                        self.budget = Duration::ZERO;
                    }
                },
                RevealState::Done => unreachable!("loop exits on Done"),
            }
        }

        drawn
    }

    /// Repaint base and everything revealed so far onto a fresh surface.
    pub fn replay<S: Surface + ?Sized>(&self, tree: &Tree, surface: &mut S) {
        draw_base(surface);
        let (branches, hearts) = self.revealed(tree);
        for b in &tree.branches[..branches] {
            surface.stroke_line(b.start, b.end, b.width, BARK, 1.0);
        }
        for h in &tree.hearts[..hearts] {
            surface.draw_heart(h.at, h.scale, h.color);
        }
    }
}
