use std::f32::consts::TAU;

use rand::Rng;
use sugar_engine::{Rect, Vec2};

use super::catalog::BullyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BullySize {
    Big,
    Small,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bully {
    pub size: BullySize,
    pub position: Vec2,
    velocity: Vec2,
    frozen: bool,
}

impl Bully {
    pub fn new(size: BullySize, position: Vec2, velocity: Vec2) -> Self {
        Self {
            size,
            position,
            velocity,
            frozen: false,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Moves unless frozen, reflecting off `bounds` per axis.
    pub fn advance(&mut self, dt: f32, bounds: &Rect) {
        if self.frozen {
            return;
        }
        let next = self.position + self.velocity * dt;
        let (x, vx) = reflect(next.x, self.velocity.x, bounds.x, bounds.right());
        let (y, vy) = reflect(next.y, self.velocity.y, bounds.y, bounds.bottom());
        self.position = Vec2::new(x, y);
        self.velocity = Vec2::new(vx, vy);
    }
}

fn reflect(value: f32, velocity: f32, min: f32, max: f32) -> (f32, f32) {
    if value < min {
        (min, velocity.abs())
    } else if value > max {
        (max, -velocity.abs())
    } else {
        (value, velocity)
    }
}

pub fn spawn_bullies<R: Rng + ?Sized>(config: &BullyConfig, rng: &mut R) -> Vec<Bully> {
    let big = (0..config.big_count).map(|_| (BullySize::Big, config.big_speed));
    let small = (0..config.small_count).map(|_| (BullySize::Small, config.small_speed));
    big.chain(small)
        .map(|(size, speed)| {
            let angle = rng.gen_range(0.0..TAU);
            let heading = Vec2::new(angle.cos(), angle.sin());
            Bully::new(size, random_point(&config.spawn_area, rng), heading * speed)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buyer {
    pub position: Vec2,
    pub served: bool,
}

pub fn spawn_buyers<R: Rng + ?Sized>(count: u32, area: &Rect, rng: &mut R) -> Vec<Buyer> {
    (0..count)
        .map(|_| Buyer {
            position: random_point(area, rng),
            served: false,
        })
        .collect()
}

fn random_point<R: Rng + ?Sized>(area: &Rect, rng: &mut R) -> Vec2 {
    Vec2::new(
        sample_span(area.x, area.right(), rng),
        sample_span(area.y, area.bottom(), rng),
    )
}

fn sample_span<R: Rng + ?Sized>(min: f32, max: f32, rng: &mut R) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}
