//! Problem model: tasks, compute resources and their assignment.
//!
//! # Key Types
//!
//! - [`Task`], [`ComputeResource`]: immutable inputs
//! - [`AllocationProblem`]: validated task and resource lists
//! - [`Assignment`]: task id → resource id mapping of a finished search
//! - [`Deployment`]: the two reference setups (60 and 12 resources)

mod assignment;
mod deployment;
mod problem;
mod resource;
mod task;

pub use assignment::{Assignment, Binding};
pub use deployment::{Deployment, FAST_MIPS, PRIMARY_LENGTHS, SECONDARY_LENGTHS, SLOW_MIPS};
pub use problem::AllocationProblem;
pub use resource::ComputeResource;
pub use task::Task;
