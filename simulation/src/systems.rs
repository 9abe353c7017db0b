//! Generation pipeline stages, one module per stage, applied in order by
//! the stepper.

pub mod aging;
pub mod antibiotic;
pub mod mortality;
pub mod mutation;
pub mod reproduction;

pub use aging::age_population;
pub use antibiotic::apply_antibiotic;
pub use mortality::apply_natural_death;
pub use mutation::mutate;
pub use reproduction::reproduce;
