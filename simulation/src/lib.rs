//! PetriWorld Simulation Engine
//!
//! Discrete-generation stochastic model of bacterial growth, death,
//! reproduction, and antibiotic resistance inside a circular dish.

pub mod batch;
pub mod components;
pub mod dish;
pub mod params;
pub mod population;
pub mod rng;
pub mod statistics;
pub mod stepper;
pub mod systems;

pub use batch::{BatchRun, BatchStatus, ProgressSnapshot, RunFlag};
pub use components::*;
pub use dish::Dish;
pub use params::SimulationParameters;
pub use population::seed_population;
pub use rng::SimRng;
pub use statistics::{Statistics, StepEvents};
pub use stepper::{step_generation, StepOutcome};
