//! # Per-machine liveness record.
//!
//! One [`LivenessRecord`] exists for every machine the scheduler knows about
//! in the current run. It carries the scheduling flags and the machine's
//! private wait/signal primitive.
//!
//! ## Architecture
//! ```text
//! LivenessRecord
//!   ├─ active:  watch::Sender<bool>   (flag IS the channel value)
//!   ├─ stopped: CancellationToken      (teardown releases waiters)
//!   ├─ paused / halted: bool
//!   └─ pending: usize
//!
//! Waiter (taken under the scheduler lock, awaited without it):
//!   select! {
//!     stopped.cancelled()          → Turn::Stopped
//!     active.changed() until true  → Turn::Proceed
//!     sender dropped (record gone) → Turn::Stopped
//!   }
//! ```
//!
//! ## Rules
//! - A waiter subscribes while the scheduler lock is held, so an activation sent
//!   before it starts awaiting is still observed.
//! - Only the owning machine ever waits on its record.
//! - A halted record is never reactivated.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::SchedulerError;
use crate::machines::machine::{MachineId, MachineRef};

/// Outcome of a scheduling point for the calling machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Carry on: the machine holds the active flag again, or it paused/halted
    /// and has nothing to wait for.
    Proceed,
    /// The run is over for this machine; exit the event loop without further work.
    Stopped,
}

impl Turn {
    #[inline]
    pub fn is_stopped(self) -> bool {
        matches!(self, Turn::Stopped)
    }
}

/// Lifecycle state derived from the record flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Known and eligible, waiting for a turn.
    Runnable,
    /// The one machine currently allowed to run.
    Active,
    /// Yielded with an empty queue.
    Paused,
    /// Permanently terminated.
    Halted,
}

/// Read-only copy of a liveness record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivenessSnapshot {
    pub id: MachineId,
    pub is_active: bool,
    pub is_paused: bool,
    pub is_halted: bool,
    pub pending: usize,
}

impl LivenessSnapshot {
    /// Derives the lifecycle state (halted wins over everything else).
    pub fn lifecycle(&self) -> Lifecycle {
        if self.is_halted {
            Lifecycle::Halted
        } else if self.is_active {
            Lifecycle::Active
        } else if self.is_paused {
            Lifecycle::Paused
        } else {
            Lifecycle::Runnable
        }
    }
}

/// Scheduling state of one machine.
pub(crate) struct LivenessRecord {
    machine: MachineRef,
    active: watch::Sender<bool>,
    stopped: CancellationToken,
    paused: bool,
    halted: bool,
    pending: usize,
}

impl LivenessRecord {
    pub fn new(machine: MachineRef) -> Self {
        let (active, _rx) = watch::channel(false);
        Self {
            machine,
            active,
            stopped: CancellationToken::new(),
            paused: false,
            halted: false,
            pending: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> MachineId {
        self.machine.id()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Sets the active flag, waking the machine's waiter on `true`.
    pub fn set_active(&self, active: bool) {
        self.active.send_replace(active);
    }

    pub fn pause(&mut self) {
        self.set_active(false);
        self.paused = true;
    }

    /// Clears the paused flag (new work arrived or the handler restarted).
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn halt(&mut self) {
        self.set_active(false);
        self.halted = true;
    }

    pub fn add_pending(&mut self) {
        self.pending += 1;
    }

    pub fn handle_pending(&mut self) -> Result<(), SchedulerError> {
        match self.pending.checked_sub(1) {
            Some(n) => {
                self.pending = n;
                Ok(())
            }
            None => Err(SchedulerError::PendingUnderflow { id: self.id() }),
        }
    }

    /// Releases any waiter and asks the machine itself to stop.
    pub fn stop(&self) {
        self.stopped.cancel();
        self.machine.stop();
    }

    /// Captures the wait side of this record. Must be called under the scheduler lock.
    pub fn waiter(&self) -> Waiter {
        Waiter {
            active: self.active.subscribe(),
            stopped: self.stopped.clone(),
        }
    }

    pub fn snapshot(&self) -> LivenessSnapshot {
        LivenessSnapshot {
            id: self.id(),
            is_active: self.is_active(),
            is_paused: self.paused,
            is_halted: self.halted,
            pending: self.pending,
        }
    }
}

/// Pending wait of one machine for its activation.
pub(crate) struct Waiter {
    active: watch::Receiver<bool>,
    stopped: CancellationToken,
}

impl Waiter {
    /// Blocks until the machine is marked active or stopped.
    pub async fn wait(self) -> Turn {
        let Waiter {
            mut active,
            stopped,
        } = self;

        loop {
            if stopped.is_cancelled() {
                return Turn::Stopped;
            }
            if *active.borrow_and_update() {
                return Turn::Proceed;
            }
            tokio::select! {
                biased;
                _ = stopped.cancelled() => return Turn::Stopped,
                res = active.changed() => {
                    if res.is_err() {
                        return Turn::Stopped;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machines::MachineHandle;
    use std::sync::Arc;
    use std::time::Duration;

    fn record(id: u64) -> LivenessRecord {
        LivenessRecord::new(Arc::new(MachineHandle::with_id(MachineId::new(id), "m")))
    }

    #[test]
    fn pending_balance_tracks_difference() {
        let mut r = record(1);
        for _ in 0..5 {
            r.add_pending();
        }
        for _ in 0..3 {
            r.handle_pending().unwrap();
        }
        assert_eq!(r.pending(), 2);
        r.add_pending();
        r.handle_pending().unwrap();
        r.handle_pending().unwrap();
        r.handle_pending().unwrap();
        assert_eq!(r.pending(), 0);
    }

    #[test]
    fn pending_underflow_is_a_protocol_violation() {
        let mut r = record(3);
        assert_eq!(
            r.handle_pending(),
            Err(SchedulerError::PendingUnderflow {
                id: MachineId::new(3)
            })
        );
        assert_eq!(r.pending(), 0);
    }

    #[test]
    fn lifecycle_follows_flags() {
        let mut r = record(1);
        assert_eq!(r.snapshot().lifecycle(), Lifecycle::Runnable);
        r.set_active(true);
        assert_eq!(r.snapshot().lifecycle(), Lifecycle::Active);
        r.pause();
        assert_eq!(r.snapshot().lifecycle(), Lifecycle::Paused);
        r.resume();
        assert_eq!(r.snapshot().lifecycle(), Lifecycle::Runnable);
        r.halt();
        assert_eq!(r.snapshot().lifecycle(), Lifecycle::Halted);
        assert!(!r.is_active());
    }

    #[tokio::test]
    async fn activation_before_wait_is_not_lost() {
        let r = record(1);
        let w = r.waiter();
        r.set_active(true);
        let turn = tokio::time::timeout(Duration::from_secs(1), w.wait())
            .await
            .expect("waiter should observe the earlier activation");
        assert_eq!(turn, Turn::Proceed);
    }

    #[tokio::test]
    async fn stop_releases_waiter() {
        let r = record(1);
        let w = r.waiter();
        let join = tokio::spawn(w.wait());
        r.stop();
        let turn = tokio::time::timeout(Duration::from_secs(1), join)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(turn, Turn::Stopped);
    }

    #[tokio::test]
    async fn dropping_record_releases_waiter() {
        let r = record(1);
        let w = r.waiter();
        drop(r);
        assert_eq!(w.wait().await, Turn::Stopped);
    }
}
