//! Antibiotic selection stage.
//!
//! Each entity survives an independent Bernoulli trial against an
//! exponential kill curve; resistance shields most of the exposure.

use crate::components::Bacterium;
use crate::rng::SimRng;

/// Kill-strength constant of the survival curve.
const KILL_CONSTANT: f64 = 1.5;

/// Fraction of the effective concentration an entity is shielded from.
const RESISTANT_REDUCTION: f64 = 0.9;
const SENSITIVE_REDUCTION: f64 = 0.1;

/// Survival probability under `concentration` for one entity:
/// `exp(-k * c * (1 - r))`.
fn survival_probability(concentration: f64, is_resistant: bool) -> f64 {
    let reduction = if is_resistant {
        RESISTANT_REDUCTION
    } else {
        SENSITIVE_REDUCTION
    };
    (-KILL_CONSTANT * concentration * (1.0 - reduction)).exp()
}

/// Apply antibiotic pressure. Returns the survivors and the death count.
/// With zero concentration everything survives and the RNG is untouched.
pub fn apply_antibiotic(
    population: Vec<Bacterium>,
    concentration: f64,
    rng: &mut SimRng,
) -> (Vec<Bacterium>, u32) {
    if concentration <= 0.0 {
        return (population, 0);
    }

    let before = population.len();
    let survivors: Vec<Bacterium> = population
        .into_iter()
        .filter(|b| rng.chance(survival_probability(concentration, b.is_resistant)))
        .collect();
    let deaths = (before - survivors.len()) as u32;
    (survivors, deaths)
}
