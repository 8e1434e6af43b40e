use std::sync::Arc;

use crate::{
    core::Config,
    events::Bus,
    strategies::Strategy,
    subscribers::{Subscribe, SubscriberSet},
};
use super::scheduler::Scheduler;

/// Builder for constructing a Scheduler with optional features.
pub struct SchedulerBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    strategy: Option<Box<dyn Strategy>>,
}

impl SchedulerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            strategy: None,
        }
    }

    /// Sets event subscribers for the schedule trace.
    ///
    /// Subscribers receive scheduler events (registrations, decisions, run
    /// boundaries) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Uses a caller-provided strategy instead of `Config::strategy`.
    pub fn with_strategy(mut self, strategy: Box<dyn Strategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Builds and returns the Scheduler instance.
    ///
    /// Must be called inside a Tokio runtime when subscribers are set.
    pub fn build(self) -> Arc<Scheduler> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, bus.clone());
        let strategy = self.strategy.unwrap_or_else(|| self.cfg.strategy.build());

        Arc::new(Scheduler::new_internal(self.cfg, bus, strategy, subs))
    }
}
