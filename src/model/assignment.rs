//! Task-to-resource bindings produced from a finished search.

/// A single task bound to a resource, by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binding {
    pub task_id: usize,
    pub resource_id: usize,
}

/// Total mapping from task id to resource id.
///
/// Bindings are kept in task order. Every task of the problem appears
/// exactly once; construct through
/// [`AllocationProblem::bind`](super::AllocationProblem::bind).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    bindings: Vec<Binding>,
}

impl Assignment {
    pub(crate) fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    /// Bindings in task order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Resource id the given task is bound to.
    pub fn resource_of(&self, task_id: usize) -> Option<usize> {
        self.bindings
            .iter()
            .find(|b| b.task_id == task_id)
            .map(|b| b.resource_id)
    }

    /// Ids of the tasks bound to `resource_id`, in task order.
    pub fn tasks_on(&self, resource_id: usize) -> Vec<usize> {
        self.bindings
            .iter()
            .filter(|b| b.resource_id == resource_id)
            .map(|b| b.task_id)
            .collect()
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}
