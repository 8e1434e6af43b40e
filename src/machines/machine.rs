//! # Machine abstraction.
//!
//! A [`Machine`] is an actor whose event-processing loop runs in its own tokio
//! task. The scheduler never touches the machine's queue or states; it only
//! knows its [`MachineId`] and can ask it to [`stop`](Machine::stop).
//! The common handle type is [`MachineRef`], an `Arc<dyn Machine>` suitable for
//! sharing between the machine's task and the scheduler.

use std::fmt;
use std::sync::Arc;

/// Stable identity of a machine for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MachineId(u64);

impl MachineId {
    /// Wraps a raw identifier.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for MachineId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// # Actor scheduled by the interleaving scheduler.
///
/// # Example
/// ```
/// use interleave::{Machine, MachineId};
/// use tokio_util::sync::CancellationToken;
///
/// struct Client {
///     id: MachineId,
///     stop: CancellationToken,
/// }
///
/// impl Machine for Client {
///     fn id(&self) -> MachineId { self.id }
///     fn name(&self) -> &str { "client" }
///     fn stop(&self) { self.stop.cancel(); }
/// }
/// ```
pub trait Machine: Send + Sync + 'static {
    /// Returns the machine's identity.
    fn id(&self) -> MachineId;

    /// Human-readable name (for schedule traces).
    fn name(&self) -> &str {
        "machine"
    }

    /// Requests cooperative termination of the machine's execution context.
    ///
    /// Must be idempotent: the scheduler may stop a machine that is already stopping.
    fn stop(&self);
}

/// Shared handle to a machine.
pub type MachineRef = Arc<dyn Machine>;
