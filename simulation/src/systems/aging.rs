//! Aging stage - increment age each generation.

use crate::components::Bacterium;

/// Advance every entity's age by one generation. Total-preserving; never
/// drops or adds entities.
pub fn age_population(population: &[Bacterium]) -> Vec<Bacterium> {
    population
        .iter()
        .map(|b| Bacterium {
            age: b.age + 1,
            ..b.clone()
        })
        .collect()
}
