//! # Schedule-trace subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into
//! the scheduler (schedule printers, trace recorders, downstream checkers).
//! Each subscriber is driven by a dedicated worker loop fed by a bounded queue
//! owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! A slow subscriber only delays its own queue. When that queue (sized by
//! [`Subscribe::queue_capacity`]) is full, further events for it are dropped
//! and `SubscriberOverflow` is published instead.
//!
//! ## Example
//! ```rust
//! use interleave::{Event, EventKind, Subscribe};
//!
//! struct Decisions;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Decisions {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::MachineScheduled {
//!             // record ev.machine_id ...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "decisions" }
//! }
//! ```

use crate::events::Event;
use async_trait::async_trait;

/// Receives scheduler and exploration events in publish order.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Called once per event, never concurrently for the same subscriber.
    async fn on_event(&self, event: &Event);

    /// Name reported in overflow and panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Queue length before events are dropped (minimum 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
