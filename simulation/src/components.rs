//! Core entity types for the PetriWorld engine.

use serde::{Deserialize, Serialize};

/// Bounds for the fitness trait, enforced at every mutation and inheritance.
pub const FITNESS_MIN: f64 = 0.1;
pub const FITNESS_MAX: f64 = 2.0;

/// Bounds for the display size, enforced at every drift.
pub const SIZE_MIN: f64 = 2.0;
pub const SIZE_MAX: f64 = 8.0;

/// Display colors assigned to sensitive bacteria at creation.
pub const SENSITIVE_COLORS: &[&str] = &["#4caf50", "#66bb6a", "#81c784", "#2e7d32"];

/// Display color forced onto an entity when it acquires resistance.
pub const RESISTANT_COLOR: &str = "#e53935";

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BacteriumId(pub u64);

// ============================================================================
// Bacterium
// ============================================================================

/// A single bacterium. Produced fresh each generation; pipeline stages build
/// new values instead of patching old ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bacterium {
    pub id: BacteriumId,
    pub x: f64,
    pub y: f64,
    /// Flips false -> true through mutation, never back.
    pub is_resistant: bool,
    /// Always within [`FITNESS_MIN`, `FITNESS_MAX`].
    pub fitness: f64,
    /// Generations survived so far.
    pub age: u32,
    /// Lineage depth from the founding population.
    pub generation: u32,
    /// Lookup relation only; the parent may already be gone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<BacteriumId>,
    pub color: String,
    /// Always within [`SIZE_MIN`, `SIZE_MAX`].
    pub size: f64,
    /// True iff any mutation channel fired this generation.
    #[serde(default)]
    pub has_mutated: bool,
}

pub fn clamp_fitness(value: f64) -> f64 {
    value.clamp(FITNESS_MIN, FITNESS_MAX)
}

pub fn clamp_size(value: f64) -> f64 {
    value.clamp(SIZE_MIN, SIZE_MAX)
}
