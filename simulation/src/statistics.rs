//! Population statistics, recomputed from scratch every generation.

use serde::{Deserialize, Serialize};

use crate::components::Bacterium;

/// Aggregate view of one generation's population, plus the event counters
/// folded in by the stepper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_population: usize,
    pub resistant_count: usize,
    pub sensitive_count: usize,
    pub average_fitness: f64,
    pub mutation_events: u32,
    pub antibiotic_deaths: u32,
    pub natural_deaths: u32,
    pub reproductions: u32,
}

/// Event counters accumulated across one generation's stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepEvents {
    pub antibiotic_deaths: u32,
    pub natural_deaths: u32,
    pub reproductions: u32,
    pub mutation_events: u32,
}

impl Statistics {
    /// Aggregate a population snapshot. Event counters start at zero.
    pub fn from_population(population: &[Bacterium]) -> Self {
        let total_population = population.len();
        let resistant_count = population.iter().filter(|b| b.is_resistant).count();
        let average_fitness = if total_population > 0 {
            population.iter().map(|b| b.fitness).sum::<f64>() / total_population as f64
        } else {
            0.0
        };

        Self {
            total_population,
            resistant_count,
            sensitive_count: total_population - resistant_count,
            average_fitness,
            ..Self::default()
        }
    }

    /// Aggregate a snapshot and overlay the generation's event counters.
    pub fn with_events(population: &[Bacterium], events: StepEvents) -> Self {
        let mut statistics = Self::from_population(population);
        statistics.antibiotic_deaths = events.antibiotic_deaths;
        statistics.natural_deaths = events.natural_deaths;
        statistics.reproductions = events.reproductions;
        statistics.mutation_events = events.mutation_events;
        statistics
    }
}
