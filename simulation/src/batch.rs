//! Batch runner - resumable multi-generation execution with progress
//! checkpoints and cooperative yield points.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::components::Bacterium;
use crate::params::SimulationParameters;
use crate::rng::SimRng;
use crate::statistics::Statistics;
use crate::stepper::{step_generation, StepOutcome};

/// Generations between cooperative yield points.
pub const YIELD_INTERVAL: u32 = 10;

/// Generations between progress checkpoints.
pub const PROGRESS_INTERVAL: u32 = 5;

/// Shared run flag checked between generations. Clearing it stops an active
/// batch within one generation; a step always completes once started.
#[derive(Debug, Clone)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn set_running(&self, running: bool) {
        self.0.store(running, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Intermediate snapshot delivered at progress checkpoints.
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    pub current_step: u32,
    pub total_steps: u32,
    /// Fraction complete in (0, 1].
    pub progress: f64,
    pub population: Vec<Bacterium>,
    pub statistics: Statistics,
}

/// Outcome of one [`BatchRun::resume`] call.
#[derive(Debug)]
pub enum BatchStatus {
    /// Reached a cooperative yield point with generations still to run.
    Yielded,
    /// All generations ran, or the run flag was cleared. The outcome
    /// reflects whatever generation was reached; the run is exhausted.
    Complete(StepOutcome),
}

/// Resumable batch execution over the generation stepper.
///
/// Each `resume` advances at most [`YIELD_INTERVAL`] generations, letting the
/// host interleave other work between calls instead of sleeping on a timer.
pub struct BatchRun {
    population: Vec<Bacterium>,
    parameters: SimulationParameters,
    total_steps: u32,
    current_step: u32,
    report_progress: bool,
    run_flag: RunFlag,
    statistics: Statistics,
}

impl BatchRun {
    pub fn new(
        population: Vec<Bacterium>,
        parameters: SimulationParameters,
        total_steps: u32,
        report_progress: bool,
        run_flag: RunFlag,
    ) -> Self {
        let statistics = Statistics::from_population(&population);
        Self {
            population,
            parameters,
            total_steps,
            current_step: 0,
            report_progress,
            run_flag,
            statistics,
        }
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Run until the next yield point, the end of the batch, or cancellation,
    /// whichever comes first. Checkpoints are delivered through `on_progress`
    /// at every step where `step % PROGRESS_INTERVAL == 0` or the final step,
    /// when progress reporting is on.
    pub fn resume(
        &mut self,
        rng: &mut SimRng,
        mut on_progress: impl FnMut(ProgressSnapshot),
    ) -> BatchStatus {
        while self.current_step < self.total_steps {
            if !self.run_flag.is_running() {
                debug!(step = self.current_step, "batch cancelled");
                break;
            }

            let outcome = step_generation(&self.population, &self.parameters, rng);
            self.population = outcome.population;
            self.statistics = outcome.statistics;
            self.current_step += 1;

            if self.report_progress
                && (self.current_step % PROGRESS_INTERVAL == 0
                    || self.current_step == self.total_steps)
            {
                on_progress(ProgressSnapshot {
                    current_step: self.current_step,
                    total_steps: self.total_steps,
                    progress: f64::from(self.current_step) / f64::from(self.total_steps),
                    population: self.population.clone(),
                    statistics: self.statistics.clone(),
                });
            }

            if self.current_step % YIELD_INTERVAL == 0 && self.current_step < self.total_steps {
                return BatchStatus::Yielded;
            }
        }

        BatchStatus::Complete(StepOutcome {
            population: std::mem::take(&mut self.population),
            statistics: self.statistics.clone(),
        })
    }
}
