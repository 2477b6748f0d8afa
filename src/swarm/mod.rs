//! Bio-inspired swarm search over task-to-resource assignments.
//!
//! A population of candidate assignments is repeatedly evaluated and
//! moved through the discrete space of resource indices. Every movement
//! rule truncates and clamps, so candidates always stay in
//! `[0, resources - 1]`.
//!
//! # Algorithm
//!
//! 1. Initialize `population_size` candidates uniformly at random
//! 2. Evaluate all candidates, update the global and personal bests
//! 3. Update failure streaks
//! 4. Move every candidate with the configured [`MovementStrategy`]
//! 5. Apply the [`StagnationPolicy`]: scheduled reinitialization, streak
//!    responses, pull toward best
//! 6. Repeat from 2 for `max_iterations` iterations
//!
//! # Variants
//!
//! | Variant | Strategy | Update | Stagnation |
//! |---------|----------|--------|------------|
//! | `mpa` | predator | in place | none |
//! | `mmpa` | predator | synchronous | none |
//! | `immpa` | predator | sequential | streaks, reinit, pull |
//! | `pso` | swarm | | none |
//! | `sca` | sine cosine | | none |
//! | `woa` | encircle | | none |
//!
//! # References
//!
//! - Faramarzi et al. (2020), "Marine Predators Algorithm: A nature-inspired
//!   metaheuristic"

mod config;
pub mod movement;
mod phase;
mod population;
mod runner;
mod stagnation;

pub use config::{SwarmConfig, UpdateMode, Variant};
pub use movement::{Bounds, LevyFlight, MovementStrategy};
pub use phase::{Kernel, Phase, PhaseScheduler};
pub use population::{Candidate, Population};
pub use runner::{BestSolution, SwarmResult, SwarmRunner};
pub use stagnation::{StagnationPolicy, StreakBasis, StreakRule};
