//! Task model.

/// A unit of work released at time 0.
///
/// `length` is measured in abstract work units (million instructions in
/// the cloud setting this crate was built for).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    /// Task identifier, unique within a problem.
    pub id: usize,
    /// Work units. Must be positive.
    pub length: u64,
}

impl Task {
    pub fn new(id: usize, length: u64) -> Self {
        Self { id, length }
    }

    /// Builds tasks with ids `0..lengths.len()`.
    pub fn from_lengths(lengths: &[u64]) -> Vec<Task> {
        lengths
            .iter()
            .enumerate()
            .map(|(id, &length)| Task::new(id, length))
            .collect()
    }
}
