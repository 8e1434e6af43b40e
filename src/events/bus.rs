//! # Event bus for broadcasting scheduler events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that lets the
//! scheduler publish its trace without ever blocking inside the scheduling
//! critical section.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                    Subscriber (one):
//!   Scheduler ──┐
//!   Explorer  ──┼──────► Bus ───────► listener task ────► SubscriberSet
//!   Workers   ──┘  (broadcast chan)   (in Scheduler)
//! ```
//!
//! The scheduler publishes while holding its state lock, so publishing must
//! never wait: a full ring buffer overwrites the oldest entry and a receiver
//! that falls behind sees `RecvError::Lagged`. Events published while nobody
//! is subscribed are discarded; the trace is not persisted.

use tokio::sync::broadcast;

use super::event::Event;

/// Shared broadcast handle for scheduler events.
///
/// Clones publish into the same channel.
#[derive(Clone, Debug)]
pub struct Bus {
    sender: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus whose ring buffer holds `capacity` events (at least one).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends `ev` to every current receiver; dropped when there are none.
    pub fn publish(&self, ev: Event) {
        let _ = self.sender.send(ev);
    }

    /// Opens a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn delivers_to_subscribers_in_order() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::SchedulerReset));
        bus.publish(Event::new(EventKind::AssertionFailed));

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::SchedulerReset);
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::AssertionFailed);
    }

    #[test]
    fn publish_without_receivers_is_silent() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::SchedulerReset));
    }
}
