//! Fitness model for task-to-resource assignments.
//!
//! Fitness is a weighted sum of total energy and makespan. Tasks are
//! accumulated strictly in index order on the resource they are assigned
//! to; this is not a list schedule and does not reorder tasks.
//!
//! # Key Types
//!
//! - [`FitnessEvaluator`]: scores assignment vectors
//! - [`FitnessReport`]: fitness, makespan, energy, flow time, CO2
//! - [`EnergyModel`], [`EmissionModel`]: coefficients

mod evaluator;
mod model;

pub use evaluator::{FitnessEvaluator, FitnessReport};
pub use model::{EmissionModel, EnergyModel, CARBON_TO_CO2_RATIO, EMISSION_FACTORS};
