//! # Machine abstractions and liveness records.
//!
//! This module provides the machine-related types:
//! - [`Machine`] - trait for the actors the scheduler interleaves
//! - [`MachineId`] - stable machine identity
//! - [`MachineRef`] - shared reference to a machine (`Arc<dyn Machine>`)
//! - [`MachineHandle`] - ready-made machine backed by a cancellation token
//! - [`LivenessSnapshot`] / [`Lifecycle`] - read-only view of a liveness record
//! - [`Turn`] - what a machine does after a scheduling point

mod handle;
mod liveness;
mod machine;

pub use handle::MachineHandle;
pub use liveness::{Lifecycle, LivenessSnapshot, Turn};
pub use machine::{Machine, MachineId, MachineRef};

pub(crate) use liveness::{LivenessRecord, Waiter};
