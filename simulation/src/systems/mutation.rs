//! Mutation stage - three independent channels per entity.

use crate::components::{clamp_fitness, clamp_size, Bacterium, RESISTANT_COLOR};
use crate::rng::SimRng;

/// Resistance acquisition rate as a fraction of the base mutation rate.
const RESISTANCE_RATE_FACTOR: f64 = 0.1;

/// Fitness multiplier paid when resistance is acquired.
const RESISTANCE_FITNESS_COST: f64 = 0.8;

/// Uniform fitness drift magnitude.
const FITNESS_DRIFT: f64 = 0.05;

/// Size channel rate as a fraction of the base mutation rate.
const SIZE_RATE_FACTOR: f64 = 0.5;

/// Uniform size drift magnitude.
const SIZE_DRIFT: f64 = 0.15;

/// Run every entity through the three mutation channels. Any subset can fire
/// for one entity; resistance only ever flips on. Returns the population and
/// the number of entities that mutated this generation.
pub fn mutate(
    population: Vec<Bacterium>,
    mutation_rate: f64,
    rng: &mut SimRng,
) -> (Vec<Bacterium>, u32) {
    let mut events = 0u32;
    let mutated = population
        .into_iter()
        .map(|mut b| {
            let mut fired = false;

            if !b.is_resistant && rng.chance(mutation_rate * RESISTANCE_RATE_FACTOR) {
                b.is_resistant = true;
                b.color = RESISTANT_COLOR.to_string();
                b.fitness = clamp_fitness(b.fitness * RESISTANCE_FITNESS_COST);
                fired = true;
            }
            if rng.chance(mutation_rate) {
                b.fitness = clamp_fitness(b.fitness + rng.jitter(FITNESS_DRIFT));
                fired = true;
            }
            if rng.chance(mutation_rate * SIZE_RATE_FACTOR) {
                b.size = clamp_size(b.size + rng.jitter(SIZE_DRIFT));
                fired = true;
            }

            b.has_mutated = fired;
            if fired {
                events += 1;
            }
            b
        })
        .collect();
    (mutated, events)
}
