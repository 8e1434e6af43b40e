//! # Non-blocking event fan-out to multiple subscribers.
//!
//! [`SubscriberSet`] hands every scheduler event to each subscriber through
//! its own bounded queue and worker task, so the scheduler never waits on a
//! subscriber.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     ├──► route 1 ──► worker 1 ──► subscriber1.on_event()
//!     ├──► route 2 ──► worker 2 ──► subscriber2.on_event()
//!     └──► route N ──► worker N ──► subscriberN.on_event()
//!                         └─ panic ─► SubscriberPanicked on the bus
//! ```
//!
//! Each subscriber sees the trace in publish order. A full or closed queue
//! drops the event for that subscriber only and reports `SubscriberOverflow`.
//! Panics are isolated with `AssertUnwindSafe`, so a subscriber that panics
//! while holding a lock may leave its own state inconsistent.

use std::any::Any;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Queue into one subscriber's worker.
struct Route {
    subscriber: &'static str,
    queue: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for schedule-trace subscribers.
pub struct SubscriberSet {
    routes: Vec<Route>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber. Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let (routes, workers) = subs
            .into_iter()
            .map(|sub| {
                let (queue, rx) = mpsc::channel(sub.queue_capacity().max(1));
                let route = Route {
                    subscriber: sub.name(),
                    queue,
                };
                (route, spawn_worker(sub, rx, bus.clone()))
            })
            .unzip();
        Self {
            routes,
            workers,
            bus,
        }
    }

    /// Queues `event` for every subscriber without waiting.
    ///
    /// Overflow reports are not re-reported when they overflow themselves.
    pub fn emit(&self, event: &Event) {
        let shared = Arc::new(event.clone());
        for route in &self.routes {
            let reason = match route.queue.try_send(Arc::clone(&shared)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if shared.kind != EventKind::SubscriberOverflow {
                self.bus.publish(Event::subscriber_overflow(route.subscriber, reason));
            }
        }
    }

    /// Closes every queue and waits until the workers drained them.
    pub async fn shutdown(self) {
        drop(self.routes);
        for worker in self.workers {
            let _ = worker.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn spawn_worker(
    sub: Arc<dyn Subscribe>,
    mut rx: mpsc::Receiver<Arc<Event>>,
    bus: Bus,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(ev) = rx.recv().await {
            let delivery = std::panic::AssertUnwindSafe(sub.on_event(&ev)).catch_unwind();
            if let Err(payload) = delivery.await {
                bus.publish(Event::subscriber_panicked(sub.name(), panic_info(&*payload)));
            }
        }
    })
}

fn panic_info(payload: &(dyn Any + Send)) -> String {
    match payload.downcast_ref::<&'static str>() {
        Some(msg) => (*msg).to_string(),
        None => payload
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_else(|| "unknown panic".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().await.push(event.kind);
        }

        fn name(&self) -> &'static str {
            "collect"
        }
    }

    struct Boom;

    #[async_trait]
    impl Subscribe for Boom {
        async fn on_event(&self, _event: &Event) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "boom"
        }
    }

    struct Stuck;

    #[async_trait]
    impl Subscribe for Stuck {
        async fn on_event(&self, _event: &Event) {
            std::future::pending::<()>().await;
        }

        fn name(&self) -> &'static str {
            "stuck"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn fans_out_in_order_and_isolates_panics() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let collect = Arc::new(Collect::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![collect.clone(), Arc::new(Boom)];
        let set = SubscriberSet::new(subs, bus.clone());
        assert!(!set.is_empty());

        set.emit(&Event::new(EventKind::MachineScheduled));
        set.emit(&Event::new(EventKind::MachineHalted));

        let panicked = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(panicked.kind, EventKind::SubscriberPanicked);
        assert_eq!(panicked.reason.as_deref(), Some("boom"));

        set.shutdown().await;
        assert_eq!(
            *collect.seen.lock().await,
            vec![EventKind::MachineScheduled, EventKind::MachineHalted]
        );
    }

    #[tokio::test]
    async fn full_queue_reports_overflow() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Stuck)];
        let set = SubscriberSet::new(subs, bus.clone());

        // One event is held by the worker, one fills the queue, the rest overflow.
        for _ in 0..4 {
            set.emit(&Event::new(EventKind::MachineScheduled));
            tokio::task::yield_now().await;
        }

        let ev = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.machine.as_deref(), Some("stuck"));
    }
}
