//! Generation stepper - the core transition function.

use tracing::debug;

use crate::components::Bacterium;
use crate::params::SimulationParameters;
use crate::rng::SimRng;
use crate::statistics::{Statistics, StepEvents};
use crate::systems;

/// Result of advancing a population by one generation.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub population: Vec<Bacterium>,
    pub statistics: Statistics,
}

/// Advance the population by exactly one generation through the ordered
/// pipeline: aging, antibiotic selection, natural death, capacity-gated
/// reproduction, mutation, aggregation.
///
/// Holds no state between invocations: all randomness flows through `rng`
/// and child ids continue from the highest id in the incoming population.
pub fn step_generation(
    population: &[Bacterium],
    params: &SimulationParameters,
    rng: &mut SimRng,
) -> StepOutcome {
    let mut next_id = population
        .iter()
        .map(|b| b.id.0)
        .max()
        .map_or(1, |id| id + 1);

    let aged = systems::age_population(population);
    let (after_antibiotic, antibiotic_deaths) =
        systems::apply_antibiotic(aged, params.antibiotic_concentration, rng);
    let (survivors, natural_deaths) = systems::apply_natural_death(after_antibiotic, rng);
    let (with_offspring, reproductions) =
        systems::reproduce(survivors, params, &mut next_id, rng);
    let (population, mutation_events) =
        systems::mutate(with_offspring, params.mutation_rate, rng);

    let statistics = Statistics::with_events(
        &population,
        StepEvents {
            antibiotic_deaths,
            natural_deaths,
            reproductions,
            mutation_events,
        },
    );

    debug!(
        population = statistics.total_population,
        antibiotic_deaths, natural_deaths, reproductions, mutation_events, "generation stepped"
    );

    StepOutcome {
        population,
        statistics,
    }
}
