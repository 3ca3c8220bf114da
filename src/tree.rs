//! Recursive tree generation
//!
//! Every fork draws fresh random numbers, so the same root parameters give a
//! different (but similar looking) tree each run unless the RNG is seeded.

use crate::colors::{Rgb, HEART_PALETTE};
use kurbo::{Point, Vec2};
use rand::Rng;
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;
use std::ops::Range;

/// Width of the logical space the tree is generated in
pub const TREE_SPACE_WIDTH: f64 = 1000.0;
pub const TREE_SPACE_HEIGHT: f64 = 800.0;

/// One straight stroke of the tree
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Branch {
    pub start: Point,
    pub end: Point,
    pub width: f64,
}

/// Decoration left where recursion stopped
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Heart {
    pub at: Point,
    pub scale: f64,
    pub color: Rgb,
}

/// Branches and hearts in generation order (which is also draw order)
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Tree {
    pub branches: Vec<Branch>,
    pub hearts: Vec<Heart>,
}

/// Where a (sub)tree starts growing from
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeParams {
    pub origin: Point,
    pub length: f64,
    /// Radians; screen y grows downward, so -π/2 points up
    pub angle: f64,
    pub width: f64,
    pub depth: u32,
}

impl TreeParams {
    /// The tree sitting on top of the trunk
    pub const ROOT: TreeParams = TreeParams {
        origin: Point::new(500.0, 650.0),
        length: 120.0,
        angle: -FRAC_PI_2,
        width: 40.0,
        depth: 8,
    };
}

/// Randomized growth constants
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthRules {
    pub min_length: f64,
    pub length_factor: Range<f64>,
    pub width_factor: f64,
    pub spread: Range<f64>,
    pub extra_branch_chance: f64,
    /// Extra branches only appear while `depth` is above this
    pub extra_branch_min_depth: u32,
    pub extra_length_factor: f64,
    pub extra_angle_offset: f64,
    pub heart_scale: Range<f64>,
}

impl Default for GrowthRules {
    fn default() -> Self {
        Self {
            min_length: 5.0,
            length_factor: 0.7..0.8,
            width_factor: 0.7,
            spread: 0.3..0.6,
            extra_branch_chance: 0.5,
            extra_branch_min_depth: 3,
            extra_length_factor: 0.8,
            extra_angle_offset: -0.1,
            heart_scale: 0.6..1.4,
        }
    }
}

impl GrowthRules {
    /// Strictly binary growth (no inner extra branch)
    #[cfg(test)]
    pub fn binary() -> Self {
        Self {
            extra_branch_chance: 0.0,
            ..Self::default()
        }
    }
}

/// Grow a whole tree from `params`.
pub fn generate<R: Rng + ?Sized>(params: TreeParams, rules: &GrowthRules, rng: &mut R) -> Tree {
    let mut tree = Tree::default();
    grow(&mut tree, params, rules, rng);
    tree
}

fn grow<R: Rng + ?Sized>(tree: &mut Tree, p: TreeParams, rules: &GrowthRules, rng: &mut R) {
    if p.depth == 0 || p.length < rules.min_length {
        let color = HEART_PALETTE[rng.gen_range(0..HEART_PALETTE.len())];
        let scale = rng.gen_range(rules.heart_scale.start..=rules.heart_scale.end);
        tree.hearts.push(Heart { at: p.origin, scale, color });
        return;
    }

    let end = p.origin + Vec2::from_angle(p.angle) * p.length;
    tree.branches.push(Branch {
        start: p.origin,
        end,
        width: p.width,
    });

    let child = TreeParams {
        origin: end,
        length: p.length * rng.gen_range(rules.length_factor.clone()),
        angle: p.angle,
        width: p.width * rules.width_factor,
        depth: p.depth - 1,
    };

    let left = p.angle - rng.gen_range(rules.spread.clone());
    grow(tree, TreeParams { angle: left, ..child }, rules, rng);
    let right = p.angle + rng.gen_range(rules.spread.clone());
    grow(tree, TreeParams { angle: right, ..child }, rules, rng);

    if p.depth > rules.extra_branch_min_depth && rng.gen_bool(rules.extra_branch_chance) {
        let inner = TreeParams {
            length: child.length * rules.extra_length_factor,
            angle: p.angle + rules.extra_angle_offset,
            ..child
        };
        grow(tree, inner, rules, rng);
    }
}
