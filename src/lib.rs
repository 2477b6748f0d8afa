//! Energy-aware task allocation with bio-inspired swarm search.
//!
//! Places a batch of independent tasks onto a pool of heterogeneous
//! compute resources, minimizing a weighted sum of total energy and
//! makespan:
//!
//! - **Model**: tasks, resources, validated problems, the resulting
//!   task → resource [`Assignment`](model::Assignment), and the two
//!   reference deployments.
//! - **Fitness**: makespan, energy, flow time and CO2 of an assignment
//!   vector.
//! - **Swarm**: one parameterized search loop with predator (Brownian/Lévy
//!   with eddy formation), particle swarm, sine cosine and whale
//!   encircling movement, plus stagnation handling. Six presets cover
//!   the MPA, MMPA, IMMPA, PSO, SCA and WOA optimizers.
//!
//! # Quick start
//!
//! ```
//! use u_swarmsched::model::Deployment;
//! use u_swarmsched::swarm::{SwarmConfig, SwarmRunner};
//!
//! let problem = Deployment::primary().problem().unwrap();
//! let config = SwarmConfig::immpa().with_max_iterations(200).with_seed(42);
//! let result = SwarmRunner::run(&problem, &config).unwrap();
//!
//! let report = result.report(&problem, &config.energy).unwrap().unwrap();
//! assert!(report.makespan > 0.0);
//! ```
//!
//! # Features
//!
//! - `parallel`: evaluate the population on rayon when
//!   [`SwarmConfig::parallel`](swarm::SwarmConfig::parallel) is set.
//! - `serde`: `Serialize`/`Deserialize` for configuration, model and
//!   result types.
//!
//! Logging goes through `tracing`; install a subscriber to see it.

pub mod error;
pub mod fitness;
pub mod model;
pub mod swarm;

pub use error::{ConfigError, ProblemError, SwarmError};
