//! # Token-backed machine (`MachineHandle`)
//!
//! [`MachineHandle`] is the default [`Machine`] implementation: an id, a name
//! and a [`CancellationToken`] that [`Machine::stop`] cancels. A machine loop
//! checks [`MachineHandle::is_stopped`] (or awaits [`MachineHandle::cancelled`])
//! at its own blocking points.
//!
//! ## Example
//! ```rust
//! use interleave::{Machine, MachineHandle, MachineRef};
//!
//! let m = MachineHandle::arc("server");
//! let as_ref: MachineRef = m.clone();
//! assert_eq!(as_ref.name(), "server");
//!
//! as_ref.stop();
//! assert!(m.is_stopped());
//! ```

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio_util::sync::CancellationToken;

use crate::machines::machine::{Machine, MachineId};

/// Process-wide counter for auto-assigned machine ids.
static MACHINE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Machine identity plus its cooperative stop signal.
#[derive(Debug)]
pub struct MachineHandle {
    id: MachineId,
    name: Cow<'static, str>,
    token: CancellationToken,
}

impl MachineHandle {
    /// Creates a machine with the next process-wide id.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        let id = MachineId::new(MACHINE_SEQ.fetch_add(1, AtomicOrdering::Relaxed));
        Self::with_id(id, name)
    }

    /// Creates a machine with an explicit id.
    pub fn with_id(id: MachineId, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id,
            name: name.into(),
            token: CancellationToken::new(),
        }
    }

    /// Creates the machine and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>) -> Arc<Self> {
        Arc::new(Self::new(name))
    }

    /// Returns `true` once the machine was asked to stop.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when the machine is asked to stop.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Clone of the machine's stop token.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Machine for MachineHandle {
    fn id(&self) -> MachineId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stop(&self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_ids_are_unique() {
        let a = MachineHandle::new("a");
        let b = MachineHandle::new("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn stop_is_idempotent() {
        let m = MachineHandle::with_id(MachineId::new(9), "m");
        assert!(!m.is_stopped());
        m.stop();
        m.stop();
        assert!(m.is_stopped());
        assert!(m.token().is_cancelled());
    }
}
