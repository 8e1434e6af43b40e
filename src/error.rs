//! Error types used by the interleave scheduler and exploration loop.
//!
//! This module defines two enums:
//!
//! - [`SchedulerError`]: protocol violations and internal inconsistencies
//!   raised by the [`Scheduler`](crate::Scheduler) notification calls.
//! - [`RuntimeError`]: failures of the exploration loop driving repeated runs.
//!
//! Exploration exhaustion and cooperative cancellation are **not** errors; they
//! surface as [`Turn::Stopped`](crate::Turn::Stopped).

use std::time::Duration;
use thiserror::Error;

use crate::machines::MachineId;

/// # Errors produced by the scheduler.
///
/// Every variant is a programming error in the embedding system. The scheduler
/// does not try to recover from them; the current run should be abandoned.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// A notification referenced a machine that has no liveness record.
    #[error("unknown machine {id}")]
    UnknownMachine {
        /// Identity of the offending machine.
        id: MachineId,
    },

    /// `notify_handled_event` was called more often than `notify_pending_event`.
    #[error("machine {id} handled an event it never had pending")]
    PendingUnderflow {
        /// Identity of the offending machine.
        id: MachineId,
    },

    /// A second machine was about to become active.
    #[error("machine {requested} cannot become active while {active} is active")]
    AlreadyActive {
        /// The machine currently holding the active flag.
        active: MachineId,
        /// The machine that was about to be activated.
        requested: MachineId,
    },
}

impl SchedulerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use interleave::{MachineId, SchedulerError};
    ///
    /// let err = SchedulerError::PendingUnderflow { id: MachineId::new(7) };
    /// assert_eq!(err.as_label(), "scheduler_pending_underflow");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SchedulerError::UnknownMachine { .. } => "scheduler_unknown_machine",
            SchedulerError::PendingUnderflow { .. } => "scheduler_pending_underflow",
            SchedulerError::AlreadyActive { .. } => "scheduler_already_active",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SchedulerError::UnknownMachine { id } => format!("unknown machine: {id}"),
            SchedulerError::PendingUnderflow { id } => {
                format!("pending counter underflow: {id}")
            }
            SchedulerError::AlreadyActive { active, requested } => {
                format!("double activation: active={active} requested={requested}")
            }
        }
    }
}

/// # Errors produced by the exploration loop.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// An iteration did not finish within its timeout; its machines were stopped.
    #[error("iteration {iteration} stalled after {timeout:?}; roster: {roster:?}")]
    IterationStalled {
        /// Zero-based index of the stalled iteration.
        iteration: u32,
        /// The configured iteration timeout.
        timeout: Duration,
        /// Names of the machines still in the roster when the timeout fired.
        roster: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use interleave::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::IterationStalled {
    ///     iteration: 3,
    ///     timeout: Duration::from_secs(1),
    ///     roster: vec![],
    /// };
    /// assert_eq!(err.as_label(), "runtime_iteration_stalled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::IterationStalled { .. } => "runtime_iteration_stalled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::IterationStalled {
                iteration,
                timeout,
                roster,
            } => format!("iteration {iteration} stalled after {timeout:?}; roster={roster:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let id = MachineId::new(1);
        assert_eq!(
            SchedulerError::UnknownMachine { id }.as_label(),
            "scheduler_unknown_machine"
        );
        assert_eq!(
            SchedulerError::AlreadyActive {
                active: id,
                requested: MachineId::new(2)
            }
            .as_label(),
            "scheduler_already_active"
        );
    }

    #[test]
    fn display_names_the_machine() {
        let err = SchedulerError::UnknownMachine {
            id: MachineId::new(42),
        };
        assert_eq!(err.to_string(), "unknown machine #42");
    }
}
