//! # Runtime events emitted by the scheduler and the exploration loop.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Schedule trace**: one event per decision and lifecycle notification
//! - **Run boundaries**: exploration exhausted, reset, teardown
//! - **Exploration loop**: iteration start/finish/stall, search exhausted
//! - **Subscriber health**: overflow and panics
//!
//! The [`Event`] struct carries metadata such as the machine, the step within
//! the run and the iteration number.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use interleave::{Event, EventKind, MachineId};
//!
//! let ev = Event::new(EventKind::MachineScheduled)
//!     .with_machine("server", MachineId::new(2))
//!     .with_step(5);
//!
//! assert_eq!(ev.kind, EventKind::MachineScheduled);
//! assert_eq!(ev.machine.as_deref(), Some("server"));
//! assert_eq!(ev.step, Some(5));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::machines::{Machine, MachineId};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `machine`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `machine`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Schedule trace ===
    /// Scheduler built with the given strategy.
    ///
    /// Sets:
    /// - `reason`: strategy description
    StrategyConfigured,

    /// Machine entered the record table.
    ///
    /// Sets:
    /// - `machine`, `machine_id`
    MachineRegistered,

    /// Strategy chose the machine to run next.
    ///
    /// Sets:
    /// - `machine`, `machine_id`
    /// - `step`: zero-based decision index within the run
    MachineScheduled,

    /// Machine yielded because its queue is empty.
    ///
    /// Sets:
    /// - `machine`, `machine_id`
    MachinePaused,

    /// Machine terminated permanently.
    ///
    /// Sets:
    /// - `machine`, `machine_id`
    MachineHalted,

    /// Machine was stopped during teardown.
    ///
    /// Sets:
    /// - `machine`, `machine_id`
    MachineStopped,

    // === Run boundaries ===
    /// Strategy returned no machine; the run was torn down.
    ///
    /// Sets:
    /// - `machine`, `machine_id`: the machine whose scheduling point ended the run
    /// - `step`: decisions made in the run
    ScheduleExplored,

    /// A machine reported a failed assertion. No scheduling action is taken.
    AssertionFailed,

    /// A notification broke the scheduling protocol.
    ///
    /// Sets:
    /// - `machine_id`: offending machine (if known)
    /// - `reason`: error label
    ProtocolViolation,

    /// Scheduler state was cleared for a new run.
    SchedulerReset,

    // === Exploration loop ===
    /// Iteration is about to run the program body.
    ///
    /// Sets:
    /// - `iteration`: zero-based iteration index
    /// - `reason`: strategy description
    IterationStarted,

    /// Iteration finished.
    ///
    /// Sets:
    /// - `iteration`
    /// - `step`: decisions made
    IterationFinished,

    /// Iteration exceeded its timeout; machines were stopped.
    ///
    /// Sets:
    /// - `iteration`
    IterationStalled,

    /// Strategy has no unexplored schedule left.
    ///
    /// Sets:
    /// - `iteration`: number of iterations run
    SearchExhausted,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Machine (or subscriber) name, if applicable.
    pub machine: Option<Arc<str>>,
    /// Machine identity, if applicable.
    pub machine_id: Option<MachineId>,
    /// Decision index within the current run.
    pub step: Option<u32>,
    /// Exploration iteration index.
    pub iteration: Option<u32>,
    /// Human-readable reason (strategy description, error label, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            machine: None,
            machine_id: None,
            step: None,
            iteration: None,
            reason: None,
        }
    }

    /// Attaches a machine name and id.
    #[inline]
    pub fn with_machine(mut self, name: impl Into<Arc<str>>, id: MachineId) -> Self {
        self.machine = Some(name.into());
        self.machine_id = Some(id);
        self
    }

    /// Attaches name and id taken from a machine.
    #[inline]
    pub fn for_machine(self, m: &dyn Machine) -> Self {
        self.with_machine(m.name(), m.id())
    }

    /// Attaches a decision index (saturates at `u32::MAX`).
    #[inline]
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = Some(u32::try_from(step).unwrap_or(u32::MAX));
        self
    }

    /// Attaches an iteration index.
    #[inline]
    pub fn with_iteration(mut self, n: u32) -> Self {
        self.iteration = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"));
        ev.machine = Some(subscriber.into());
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.machine = Some(subscriber.into());
        ev
    }

    /// True for the per-decision trace kinds that `Config::trace` gates.
    #[inline]
    pub fn is_trace(&self) -> bool {
        matches!(
            self.kind,
            EventKind::MachineRegistered
                | EventKind::MachineScheduled
                | EventKind::MachinePaused
                | EventKind::MachineHalted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::SchedulerReset);
        let b = Event::new(EventKind::SchedulerReset);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn trace_kinds() {
        assert!(Event::new(EventKind::MachineScheduled).is_trace());
        assert!(!Event::new(EventKind::ScheduleExplored).is_trace());
        assert!(!Event::new(EventKind::ProtocolViolation).is_trace());
    }
}
