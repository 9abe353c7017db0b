//! Externally supplied simulation parameters.

use serde::{Deserialize, Serialize};

/// Caller-owned knobs, read-only to the engine for the duration of a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub initial_population: u32,
    /// Dish diameter in world units.
    pub petri_dish_size: f64,
    pub growth_rate: f64,
    /// Expected in [0, 1]; out-of-range values degrade without crashing.
    pub antibiotic_concentration: f64,
    pub mutation_rate: f64,
    /// The caller's step budget; echoed back, never enforced here.
    pub duration: u32,
    /// Optional seed for deterministic replay. Absent means entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_population: 200,
            petri_dish_size: 600.0,
            growth_rate: 0.3,
            antibiotic_concentration: 0.0,
            mutation_rate: 0.02,
            duration: 100,
            rng_seed: None,
        }
    }
}
