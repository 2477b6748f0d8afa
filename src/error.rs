//! Error types.
//!
//! Configuration problems and malformed problem inputs are reported as
//! typed errors. Search-level degeneracies (empty lists, no solution) are
//! not errors; see [`SwarmResult`](crate::swarm::SwarmResult).

/// Invalid [`SwarmConfig`](crate::swarm::SwarmConfig) parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_iterations must be at least 1")]
    ZeroIterations,
    #[error("{name} must be in [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("levy_beta must be in (0, 2], got {0}")]
    LevyIndex(f64),
    #[error("reinit_interval must be positive or None")]
    ZeroReinitInterval,
    #[error("emission factors ({factors}) and energy shares ({shares}) differ in length")]
    EmissionShape { factors: usize, shares: usize },
}

/// Malformed task or resource inputs, or an assignment that does not fit
/// the problem.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProblemError {
    #[error("task {id} has zero length")]
    ZeroLength { id: usize },
    #[error("resource {id} has invalid speed {speed}")]
    InvalidSpeed { id: usize, speed: f64 },
    #[error("duplicate task id {0}")]
    DuplicateTask(usize),
    #[error("duplicate resource id {0}")]
    DuplicateResource(usize),
    #[error("assignment covers {actual} tasks, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("task index {task} assigned to resource index {index}, only {resources} resources")]
    IndexOutOfRange {
        task: usize,
        index: usize,
        resources: usize,
    },
}

/// Top-level error returned by [`SwarmRunner`](crate::swarm::SwarmRunner).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SwarmError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid problem: {0}")]
    Problem(#[from] ProblemError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::OutOfUnitRange {
            name: "energy_weight",
            value: 1.5,
        };
        assert_eq!(err.to_string(), "energy_weight must be in [0, 1], got 1.5");
    }

    #[test]
    fn test_swarm_error_wraps_problem_error() {
        let err: SwarmError = ProblemError::ZeroLength { id: 3 }.into();
        assert_eq!(err.to_string(), "invalid problem: task 3 has zero length");
        assert!(matches!(err, SwarmError::Problem(_)));
    }
}
