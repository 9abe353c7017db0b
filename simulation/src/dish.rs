//! Petri dish geometry: containment, uniform sampling, carrying capacity.

use std::f64::consts::{PI, TAU};

use crate::rng::SimRng;

/// Entities per unit of dish area the habitat can sustain.
const CAPACITY_DENSITY: f64 = 0.003;

/// Circular habitat centered at the origin.
#[derive(Debug, Clone, Copy)]
pub struct Dish {
    radius: f64,
}

impl Dish {
    pub fn new(diameter: f64) -> Self {
        Self {
            radius: diameter / 2.0,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x * x + y * y <= self.radius * self.radius
    }

    /// Maximum population the dish area supports.
    pub fn carrying_capacity(&self) -> usize {
        (PI * self.radius * self.radius * CAPACITY_DENSITY).floor() as usize
    }

    /// Uniform point inside the dish via rejection sampling on the bounding
    /// square. Expected iterations ~1/0.785 for any radius.
    pub fn sample_point(&self, rng: &mut SimRng) -> (f64, f64) {
        if self.radius <= 0.0 {
            return (0.0, 0.0);
        }
        loop {
            let x = rng.range(-self.radius, self.radius);
            let y = rng.range(-self.radius, self.radius);
            if self.contains(x, y) {
                return (x, y);
            }
        }
    }

    /// Try up to `attempts` random angle/distance placements within
    /// `max_distance` of `(x, y)`. None when every sample lands outside
    /// the dish.
    pub fn sample_near(
        &self,
        x: f64,
        y: f64,
        max_distance: f64,
        attempts: u32,
        rng: &mut SimRng,
    ) -> Option<(f64, f64)> {
        for _ in 0..attempts {
            let angle = rng.range(0.0, TAU);
            let distance = rng.range(0.0, max_distance);
            let candidate = (x + angle.cos() * distance, y + angle.sin() * distance);
            if self.contains(candidate.0, candidate.1) {
                return Some(candidate);
            }
        }
        None
    }
}
