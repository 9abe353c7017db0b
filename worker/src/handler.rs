//! Dispatcher state and the simple request handlers.
//!
//! Everything that outlives a single request lives here: the RNG, the batch
//! run flag, and the performance ring. Owned by the worker loop and mutated
//! only from handler code.

use std::collections::VecDeque;
use std::time::Instant;

use chrono::Utc;
use tracing::info;

use simulation::{seed_population, step_generation, RunFlag, SimRng, Statistics};

use crate::protocol::{InitializePayload, PerformanceRecord, ResponseBody, StepPayload};

/// Maximum retained performance records; oldest evicted first.
pub const PERFORMANCE_HISTORY_CAPACITY: usize = 100;

/// Bounded ring of timing samples for completed operations.
#[derive(Debug, Default)]
pub struct PerformanceHistory {
    records: VecDeque<PerformanceRecord>,
}

impl PerformanceHistory {
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(PERFORMANCE_HISTORY_CAPACITY),
        }
    }

    pub fn record(&mut self, step_time_ms: f64, bacteria_count: usize) {
        if self.records.len() >= PERFORMANCE_HISTORY_CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(PerformanceRecord {
            step_time_ms,
            bacteria_count,
            timestamp: Utc::now().timestamp_millis(),
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn snapshot(&self) -> Vec<PerformanceRecord> {
        self.records.iter().cloned().collect()
    }
}

/// Cross-request worker state.
pub struct WorkerState {
    pub rng: SimRng,
    pub run_flag: RunFlag,
    pub performance: PerformanceHistory,
}

impl WorkerState {
    pub fn new() -> Self {
        Self {
            rng: SimRng::from_entropy(),
            run_flag: RunFlag::new(),
            performance: PerformanceHistory::new(),
        }
    }

    /// INITIALIZE: reseed the session RNG if the parameters ask for it,
    /// seed a fresh population, aggregate it.
    pub fn initialize(&mut self, payload: InitializePayload) -> ResponseBody {
        let params = payload.parameters;
        self.rng = SimRng::for_parameters(&params);

        let started = Instant::now();
        let bacteria = seed_population(&params, &mut self.rng);
        let statistics = Statistics::from_population(&bacteria);
        self.performance.record(elapsed_ms(started), bacteria.len());

        ResponseBody::InitializeComplete {
            bacteria,
            statistics,
        }
    }

    /// STEP: advance the supplied population by one generation.
    pub fn step(&mut self, payload: StepPayload) -> ResponseBody {
        let started = Instant::now();
        let outcome = step_generation(&payload.bacteria, &payload.parameters, &mut self.rng);
        self.performance
            .record(elapsed_ms(started), outcome.population.len());

        ResponseBody::StepComplete {
            bacteria: outcome.population,
            statistics: outcome.statistics,
        }
    }

    /// TERMINATE: stop any in-flight batch and hand back the timing history.
    pub fn terminate(&mut self) -> ResponseBody {
        self.run_flag.set_running(false);
        info!(records = self.performance.len(), "terminating worker");
        ResponseBody::TerminateComplete {
            performance_history: self.performance.snapshot(),
        }
    }
}

impl Default for WorkerState {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
