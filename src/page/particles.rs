//! Drifting particle field with proximity links

use crate::canvas::Surface;
use crate::colors::{Rgb, HEART_PALETTE};
use kurbo::{Point, Vec2};
use rand::Rng;

pub const PARTICLE_COUNT: usize = 100;
pub const LINK_DISTANCE: f64 = 100.0;
const LINK_WIDTH: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Point,
    /// Units per frame
    pub vel: Vec2,
    pub size: f64,
    pub color: Rgb,
}

impl Particle {
    pub fn random<R: Rng + ?Sized>(bounds: Vec2, rng: &mut R) -> Self {
        Self {
            pos: Point::new(rng.gen::<f64>() * bounds.x, rng.gen::<f64>() * bounds.y),
            vel: Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
            size: rng.gen_range(1.0..4.0),
            color: HEART_PALETTE[rng.gen_range(0..HEART_PALETTE.len())],
        }
    }

    /// Move one frame; bounce off the edges instead of wrapping.
    pub fn update(&mut self, bounds: Vec2) {
        self.pos += self.vel;
        if self.pos.x > bounds.x || self.pos.x < 0.0 {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y > bounds.y || self.pos.y < 0.0 {
            self.vel.y = -self.vel.y;
        }
    }
}

/// Opacity of the link between two points, if they are close enough
pub fn link_opacity(a: Point, b: Point) -> Option<f64> {
    let d = a.distance(b);
    (d < LINK_DISTANCE).then(|| 1.0 - d / LINK_DISTANCE)
}

pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Vec2,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(bounds: Vec2, rng: &mut R) -> Self {
        let particles = (0..PARTICLE_COUNT).map(|_| Particle::random(bounds, rng)).collect();
        Self { particles, bounds }
    }

    #[cfg(test)]
    pub fn from_particles(particles: Vec<Particle>, bounds: Vec2) -> Self {
        Self { particles, bounds }
    }

    #[cfg(test)]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// New viewport size. Positions are left where they are; anything now
    /// outside bounces back in on its own.
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    /// One animation frame: clear, then move, draw and link each particle.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear();
        for i in 0..self.particles.len() {
            self.particles[i].update(self.bounds);
            let p = &self.particles[i];
            surface.fill_circle(p.pos, p.size, p.color);

            for other in &self.particles[i + 1..] {
                if let Some(alpha) = link_opacity(p.pos, other.pos) {
                    surface.stroke_line(p.pos, other.pos, LINK_WIDTH, p.color, alpha);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{DrawOp, RecordingSurface};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(x: f64, y: f64) -> Particle {
        Particle {
            pos: Point::new(x, y),
            vel: Vec2::ZERO,
            size: 2.0,
            color: HEART_PALETTE[1],
        }
    }

    #[test]
    fn link_opacity_falls_off_linearly() {
        let a = Point::new(0.0, 0.0);
        assert_eq!(link_opacity(a, Point::new(50.0, 0.0)), Some(0.5));
        assert_eq!(link_opacity(a, Point::new(0.0, 0.0)), Some(1.0));
        assert_eq!(link_opacity(a, Point::new(150.0, 0.0)), None);
        assert_eq!(link_opacity(a, Point::new(100.0, 0.0)), None);
    }

    #[test]
    fn close_pair_is_linked_far_pair_is_not() {
        let bounds = Vec2::new(1000.0, 1000.0);
        let mut field = ParticleField::from_particles(
            vec![still(100.0, 100.0), still(130.0, 140.0), still(400.0, 100.0)],
            bounds,
        );
        let mut surface = RecordingSurface::default();
        field.frame(&mut surface);

        assert_eq!(surface.ops[0], DrawOp::Clear);
        let lines = surface.lines();
        assert_eq!(lines.len(), 1);
        match lines[0] {
            DrawOp::Line { from, to, alpha, width, .. } => {
                assert_eq!(*from, Point::new(100.0, 100.0));
                assert_eq!(*to, Point::new(130.0, 140.0));
                assert!((alpha - 0.5).abs() < 1e-12);
                assert_eq!(*width, 0.5);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn every_particle_is_drawn_each_frame() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = ParticleField::new(Vec2::new(800.0, 600.0), &mut rng);
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
        let mut surface = RecordingSurface::default();
        field.frame(&mut surface);
        let dots = surface
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Ellipse { .. }))
            .count();
        assert_eq!(dots, PARTICLE_COUNT);
    }

    #[test]
    fn random_particles_start_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(10);
        let bounds = Vec2::new(320.0, 200.0);
        for _ in 0..500 {
            let p = Particle::random(bounds, &mut rng);
            assert!((0.0..bounds.x).contains(&p.pos.x));
            assert!((0.0..bounds.y).contains(&p.pos.y));
            assert!((-1.0..1.0).contains(&p.vel.x));
            assert!((1.0..4.0).contains(&p.size));
        }
    }

    #[test]
    fn particles_bounce_off_edges() {
        let bounds = Vec2::new(10.0, 10.0);
        let mut p = Particle {
            vel: Vec2::new(1.0, -1.0),
            ..still(9.5, 0.5)
        };
        p.update(bounds);
        assert_eq!(p.pos, Point::new(10.5, -0.5));
        assert_eq!(p.vel, Vec2::new(-1.0, 1.0));
        p.update(bounds);
        assert_eq!(p.pos, Point::new(9.5, 0.5));
        assert_eq!(p.vel, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn resize_keeps_positions() {
        let mut field = ParticleField::from_particles(vec![still(500.0, 500.0)], Vec2::new(1000.0, 1000.0));
        field.resize(Vec2::new(100.0, 100.0));
        assert_eq!(field.particles()[0].pos, Point::new(500.0, 500.0));
    }
}
