//! Fitness evaluation of assignment vectors.

use super::model::EnergyModel;

/// Diagnostics of one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitnessReport {
    /// Scalar fitness. Lower is better.
    pub fitness: f64,
    /// Completion time of the last-finishing resource.
    pub makespan: f64,
    /// Total energy over all tasks.
    pub energy: f64,
    /// Sum of task execution times (all tasks are released at 0).
    pub flow_time: f64,
    /// CO2 emitted for `energy`.
    pub co2: f64,
}

/// Scores assignment vectors against fixed task lengths and resource
/// speeds.
///
/// The execution-time matrix `T[i][j] = L[i] / S[j]` is built once at
/// construction; every call recomputes makespan and energy from scratch.
///
/// If either input list is empty the evaluator is degenerate: every
/// assignment scores 0 and the report is all zeros.
///
/// # Examples
///
/// ```
/// use u_swarmsched::fitness::{EnergyModel, FitnessEvaluator};
///
/// let eval = FitnessEvaluator::new(&[100, 200, 300], &[100.0], EnergyModel::default());
/// assert!((eval.makespan(&[0, 0, 0]) - 6.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    /// Row-major `tasks x resources`.
    times: Vec<f64>,
    speeds: Vec<f64>,
    tasks: usize,
    model: EnergyModel,
}

impl FitnessEvaluator {
    pub fn new(lengths: &[u64], speeds: &[f64], model: EnergyModel) -> Self {
        if lengths.is_empty() || speeds.is_empty() {
            return Self {
                times: Vec::new(),
                speeds: Vec::new(),
                tasks: 0,
                model,
            };
        }

        let times = lengths
            .iter()
            .flat_map(|&len| speeds.iter().map(move |&s| len as f64 / s))
            .collect();

        Self {
            times,
            speeds: speeds.to_vec(),
            tasks: lengths.len(),
            model,
        }
    }

    pub fn model(&self) -> &EnergyModel {
        &self.model
    }

    /// True when there is nothing to evaluate.
    pub fn is_degenerate(&self) -> bool {
        self.tasks == 0
    }

    /// Execution time of `task` on `resource`.
    #[inline]
    pub fn execution_time(&self, task: usize, resource: usize) -> f64 {
        self.times[task * self.speeds.len() + resource]
    }

    /// Tasks accumulate in index order on their assigned resource; the
    /// makespan is the largest accumulated completion time.
    ///
    /// # Panics
    /// Panics if an assignment value is not a valid resource index.
    pub fn makespan(&self, assignment: &[usize]) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        debug_assert_eq!(assignment.len(), self.tasks);

        let mut completion = vec![0.0_f64; self.speeds.len()];
        for (task, &resource) in assignment.iter().enumerate() {
            completion[resource] += self.execution_time(task, resource);
        }
        completion.into_iter().fold(0.0, f64::max)
    }

    /// Total energy for `assignment` under a schedule of length `makespan`.
    pub fn energy(&self, assignment: &[usize], makespan: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        assignment
            .iter()
            .enumerate()
            .map(|(task, &resource)| {
                self.model.task_energy(
                    self.speeds[resource],
                    self.execution_time(task, resource),
                    makespan,
                )
            })
            .sum()
    }

    pub fn flow_time(&self, assignment: &[usize]) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        assignment
            .iter()
            .enumerate()
            .map(|(task, &resource)| self.execution_time(task, resource))
            .sum()
    }

    /// Scalar fitness only. This is the search hot path.
    pub fn fitness(&self, assignment: &[usize]) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let makespan = self.makespan(assignment);
        let energy = self.energy(assignment, makespan);
        self.model.fitness(energy, makespan)
    }

    /// Full diagnostics.
    pub fn evaluate(&self, assignment: &[usize]) -> FitnessReport {
        if self.is_degenerate() {
            return FitnessReport::default();
        }
        let makespan = self.makespan(assignment);
        let energy = self.energy(assignment, makespan);
        FitnessReport {
            fitness: self.model.fitness(energy, makespan),
            makespan,
            energy,
            flow_time: self.flow_time(assignment),
            co2: self.model.emission.co2(energy),
        }
    }
}
