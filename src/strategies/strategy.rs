//! # Core strategy trait
//!
//! `Strategy` is the extension point for plugging nondeterministic-choice
//! algorithms into the [`Scheduler`](crate::Scheduler). It is always called
//! under the scheduler lock, so implementations need no synchronization of
//! their own.
//!
//! ## Contract
//! - `try_get_next` never panics on a non-empty candidate list; `None` is the
//!   only "no next machine" signal and ends the run.
//! - Same internal state + same candidates ⇒ same choice.
//! - `reset` prepares a fresh run; `advance` moves to the next iteration.
//!
//! ## Example (skeleton)
//! ```rust
//! use interleave::{MachineRef, Strategy};
//!
//! /// Always runs the most recently registered machine.
//! struct Newest;
//!
//! impl Strategy for Newest {
//!     fn try_get_next(&mut self, candidates: &[MachineRef]) -> Option<MachineRef> {
//!         candidates.last().cloned()
//!     }
//!     fn describe(&self) -> String { "newest".into() }
//!     fn reset(&mut self) {}
//! }
//! ```

use crate::machines::MachineRef;

/// Contract for exploration strategies.
pub trait Strategy: Send + 'static {
    /// Picks the next machine to run among `candidates` (roster order).
    ///
    /// Returns `None` when the run must end: no candidates, a bound was hit,
    /// or the search space is exhausted.
    fn try_get_next(&mut self, candidates: &[MachineRef]) -> Option<MachineRef>;

    /// Diagnostic label (strategy name and parameters).
    fn describe(&self) -> String;

    /// Clears per-run state so the instance can drive a fresh run.
    fn reset(&mut self);

    /// Prepares the next iteration of the search.
    ///
    /// Returns `false` when no further iteration exists. The default never
    /// exhausts.
    fn advance(&mut self) -> bool {
        true
    }
}

impl std::fmt::Debug for dyn Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}
