//! Natural mortality stage, independent of antibiotic pressure.

use crate::components::Bacterium;
use crate::rng::SimRng;

/// Baseline per-generation survival.
const BASE_SURVIVAL: f64 = 0.98;

/// Multiplicative survival decay per generation of age.
const AGE_DECAY: f64 = 0.99;

/// Survival probability from age and fitness:
/// `0.98 * 0.99^age * fitness`.
///
/// Intentionally not clamped to [0, 1]: fitness above 1 pushes the product
/// past certainty, which the trial treats as always-survive.
pub fn survival_probability(age: u32, fitness: f64) -> f64 {
    BASE_SURVIVAL * AGE_DECAY.powi(age as i32) * fitness
}

/// Apply natural death. Returns the survivors and the death count.
pub fn apply_natural_death(
    population: Vec<Bacterium>,
    rng: &mut SimRng,
) -> (Vec<Bacterium>, u32) {
    let before = population.len();
    let survivors: Vec<Bacterium> = population
        .into_iter()
        .filter(|b| rng.chance(survival_probability(b.age, b.fitness)))
        .collect();
    let deaths = (before - survivors.len()) as u32;
    (survivors, deaths)
}
