//! Allocation problem: the validated pair of task and resource lists.

use std::collections::HashSet;

use super::{Assignment, Binding, ComputeResource, Task};
use crate::error::ProblemError;
use crate::fitness::{EnergyModel, FitnessEvaluator, FitnessReport};

/// A fixed batch of tasks to place on a fixed pool of resources.
///
/// Task and resource order is significant: a candidate assignment is a
/// vector indexed by task position whose values are resource positions.
///
/// Either list may be empty. An empty problem evaluates to a neutral
/// fitness of 0 (see [`FitnessEvaluator`]).
///
/// # Examples
///
/// ```
/// use u_swarmsched::model::AllocationProblem;
///
/// let problem = AllocationProblem::from_raw(&[500, 500], &[100.0, 100.0]).unwrap();
/// assert_eq!(problem.task_count(), 2);
/// assert_eq!(problem.resource_count(), 2);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationProblem {
    tasks: Vec<Task>,
    resources: Vec<ComputeResource>,
}

impl AllocationProblem {
    /// Validates and wraps the given lists.
    ///
    /// Rejects zero-length tasks, non-positive or non-finite speeds, and
    /// duplicate ids.
    pub fn new(tasks: Vec<Task>, resources: Vec<ComputeResource>) -> Result<Self, ProblemError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if task.length == 0 {
                return Err(ProblemError::ZeroLength { id: task.id });
            }
            if !seen.insert(task.id) {
                return Err(ProblemError::DuplicateTask(task.id));
            }
        }

        let mut seen = HashSet::with_capacity(resources.len());
        for resource in &resources {
            if !resource.speed.is_finite() || resource.speed <= 0.0 {
                return Err(ProblemError::InvalidSpeed {
                    id: resource.id,
                    speed: resource.speed,
                });
            }
            if !seen.insert(resource.id) {
                return Err(ProblemError::DuplicateResource(resource.id));
            }
        }

        Ok(Self { tasks, resources })
    }

    /// Builds a problem from bare lengths and speeds, ids assigned by position.
    pub fn from_raw(lengths: &[u64], speeds: &[f64]) -> Result<Self, ProblemError> {
        Self::new(Task::from_lengths(lengths), ComputeResource::from_speeds(speeds))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn resources(&self) -> &[ComputeResource] {
        &self.resources
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Task lengths in task order.
    pub fn lengths(&self) -> Vec<u64> {
        self.tasks.iter().map(|t| t.length).collect()
    }

    /// Resource speeds in resource order.
    pub fn speeds(&self) -> Vec<f64> {
        self.resources.iter().map(|r| r.speed).collect()
    }

    /// Builds a fitness evaluator for this problem.
    pub fn evaluator(&self, model: EnergyModel) -> FitnessEvaluator {
        FitnessEvaluator::new(&self.lengths(), &self.speeds(), model)
    }

    /// Checks that `candidate` is a complete, in-range assignment vector.
    pub fn check(&self, candidate: &[usize]) -> Result<(), ProblemError> {
        if candidate.len() != self.tasks.len() {
            return Err(ProblemError::LengthMismatch {
                expected: self.tasks.len(),
                actual: candidate.len(),
            });
        }
        let resources = self.resources.len();
        if let Some((task, &index)) = candidate.iter().enumerate().find(|&(_, &v)| v >= resources) {
            return Err(ProblemError::IndexOutOfRange {
                task,
                index,
                resources,
            });
        }
        Ok(())
    }

    /// Maps a position vector to task and resource ids.
    pub fn bind(&self, candidate: &[usize]) -> Result<Assignment, ProblemError> {
        self.check(candidate)?;
        let bindings = self
            .tasks
            .iter()
            .zip(candidate)
            .map(|(task, &slot)| Binding {
                task_id: task.id,
                resource_id: self.resources[slot].id,
            })
            .collect();
        Ok(Assignment::new(bindings))
    }

    /// Summary diagnostics for `candidate` under `model`.
    pub fn report(
        &self,
        candidate: &[usize],
        model: &EnergyModel,
    ) -> Result<FitnessReport, ProblemError> {
        self.check(candidate)?;
        Ok(self.evaluator(model.clone()).evaluate(candidate))
    }
}
