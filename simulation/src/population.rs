//! Population seeding.

use crate::components::{
    clamp_fitness, Bacterium, BacteriumId, RESISTANT_COLOR, SENSITIVE_COLORS,
};
use crate::dish::Dish;
use crate::params::SimulationParameters;
use crate::rng::SimRng;

/// Probability that a founding entity carries resistance.
const INITIAL_RESISTANCE_PROBABILITY: f64 = 0.10;

/// Base fitness for resistant and sensitive founders.
const RESISTANT_BASE_FITNESS: f64 = 0.8;
const SENSITIVE_BASE_FITNESS: f64 = 1.0;

/// Uniform noise applied to every founder's base fitness.
const FITNESS_NOISE: f64 = 0.1;

/// Founders start in the middle of the size range and drift from there.
const INITIAL_SIZE_MIN: f64 = 3.0;
const INITIAL_SIZE_MAX: f64 = 6.0;

/// Seed `initial_population` bacteria uniformly inside the dish.
/// Always succeeds; an `initial_population` of zero yields an empty vec.
pub fn seed_population(params: &SimulationParameters, rng: &mut SimRng) -> Vec<Bacterium> {
    let dish = Dish::new(params.petri_dish_size);
    let mut population = Vec::with_capacity(params.initial_population as usize);

    for i in 0..params.initial_population as u64 {
        let (x, y) = dish.sample_point(rng);
        let is_resistant = rng.chance(INITIAL_RESISTANCE_PROBABILITY);
        let base_fitness = if is_resistant {
            RESISTANT_BASE_FITNESS
        } else {
            SENSITIVE_BASE_FITNESS
        };
        let color = if is_resistant {
            RESISTANT_COLOR.to_string()
        } else {
            rng.pick(SENSITIVE_COLORS).to_string()
        };

        population.push(Bacterium {
            id: BacteriumId(i + 1),
            x,
            y,
            is_resistant,
            fitness: clamp_fitness(base_fitness + rng.jitter(FITNESS_NOISE)),
            age: 0,
            generation: 0,
            parent_id: None,
            color,
            size: rng.range(INITIAL_SIZE_MIN, INITIAL_SIZE_MAX),
            has_mutated: false,
        });
    }

    population
}
