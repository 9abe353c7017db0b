//! Reproduction stage - capacity-gated, probabilistic, locally placed.

use crate::components::{clamp_fitness, clamp_size, Bacterium, BacteriumId};
use crate::dish::Dish;
use crate::params::SimulationParameters;
use crate::rng::SimRng;

/// Age window for reproduction eligibility, inclusive.
const MIN_REPRODUCTION_AGE: u32 = 1;
const MAX_REPRODUCTION_AGE: u32 = 10;

/// Maximum distance between parent and child.
const MAX_BIRTH_DISTANCE: f64 = 20.0;

/// Placement samples tried before a birth is silently skipped.
const PLACEMENT_ATTEMPTS: u32 = 10;

/// Uniform noise on inherited fitness.
const FITNESS_NOISE: f64 = 0.05;

/// Uniform noise on inherited size.
const SIZE_NOISE: f64 = 0.25;

/// Process reproduction for every living entity. Children are appended
/// after the survivors so the output order stays stable. Returns the
/// population and the number of successful births.
///
/// Skipped entirely once the population has reached carrying capacity.
/// A birth whose placement samples all land outside the dish is dropped
/// without counting.
pub fn reproduce(
    population: Vec<Bacterium>,
    params: &SimulationParameters,
    next_id: &mut u64,
    rng: &mut SimRng,
) -> (Vec<Bacterium>, u32) {
    let dish = Dish::new(params.petri_dish_size);
    let capacity = dish.carrying_capacity();
    if population.len() >= capacity {
        return (population, 0);
    }

    // Population pressure fixed at stage entry; approaches zero near capacity.
    let pressure = 1.0 - population.len() as f64 / capacity as f64;

    let mut children = Vec::new();
    for parent in &population {
        if parent.age < MIN_REPRODUCTION_AGE || parent.age > MAX_REPRODUCTION_AGE {
            continue;
        }
        if !rng.chance(params.growth_rate * parent.fitness * pressure) {
            continue;
        }
        let Some((x, y)) = dish.sample_near(
            parent.x,
            parent.y,
            MAX_BIRTH_DISTANCE,
            PLACEMENT_ATTEMPTS,
            rng,
        ) else {
            continue;
        };

        let id = BacteriumId(*next_id);
        *next_id += 1;
        children.push(Bacterium {
            id,
            x,
            y,
            is_resistant: parent.is_resistant,
            fitness: clamp_fitness(parent.fitness + rng.jitter(FITNESS_NOISE)),
            age: 0,
            generation: parent.generation + 1,
            parent_id: Some(parent.id),
            color: parent.color.clone(),
            size: clamp_size(parent.size + rng.jitter(SIZE_NOISE)),
            has_mutated: false,
        });
    }

    let births = children.len() as u32;
    let mut population = population;
    population.extend(children);
    (population, births)
}
