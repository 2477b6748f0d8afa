//! Compute resource model.

/// A processing resource (a virtual machine in the cloud setting).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComputeResource {
    /// Resource identifier, unique within a problem.
    pub id: usize,
    /// Processing rate in work units per time unit. Must be positive and finite.
    pub speed: f64,
}

impl ComputeResource {
    pub fn new(id: usize, speed: f64) -> Self {
        Self { id, speed }
    }

    /// Builds resources with ids `0..speeds.len()`.
    pub fn from_speeds(speeds: &[f64]) -> Vec<ComputeResource> {
        speeds
            .iter()
            .enumerate()
            .map(|(id, &speed)| ComputeResource::new(id, speed))
            .collect()
    }
}
