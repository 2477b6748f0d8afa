//! Reference deployments.
//!
//! Two fixed cloud setups used to compare the optimizer variants: a
//! large pool of 60 machines for a dozen mixed-size tasks, and a small
//! pool of 12 machines for a single task. In both, the first half of the
//! pool runs at 2000 MIPS and the second half at 4000 MIPS.

use super::{AllocationProblem, ComputeResource, Task};
use crate::error::ProblemError;

/// Speed of the slower half of a two-tier pool.
pub const SLOW_MIPS: f64 = 2000.0;
/// Speed of the faster half of a two-tier pool.
pub const FAST_MIPS: f64 = 4000.0;

/// Task lengths of the primary deployment.
pub const PRIMARY_LENGTHS: [u64; 12] = [
    100, 200, 300, 400, 500, 600, 700, 800, 900, 1000, 1200, 1500,
];
/// Task lengths of the secondary deployment.
pub const SECONDARY_LENGTHS: [u64; 1] = [600];

/// A named task/resource setup.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deployment {
    pub name: String,
    pub resource_count: usize,
    pub lengths: Vec<u64>,
}

impl Deployment {
    /// 60 resources, 12 tasks.
    pub fn primary() -> Self {
        Self {
            name: "primary".into(),
            resource_count: 60,
            lengths: PRIMARY_LENGTHS.to_vec(),
        }
    }

    /// 12 resources, 1 task.
    pub fn secondary() -> Self {
        Self {
            name: "secondary".into(),
            resource_count: 12,
            lengths: SECONDARY_LENGTHS.to_vec(),
        }
    }

    /// Speeds of a two-tier pool: the first `resource_count / 2` resources
    /// are slow, the rest fast.
    pub fn speeds(&self) -> Vec<f64> {
        (0..self.resource_count)
            .map(|i| if i < self.resource_count / 2 { SLOW_MIPS } else { FAST_MIPS })
            .collect()
    }

    /// Builds the allocation problem for this deployment.
    pub fn problem(&self) -> Result<AllocationProblem, ProblemError> {
        AllocationProblem::new(
            Task::from_lengths(&self.lengths),
            ComputeResource::from_speeds(&self.speeds()),
        )
    }
}
