//! Scheduling core: orchestration and the exploration loop.
//!
//! The public API from this module is [`Scheduler`], which serializes machines
//! and delegates every choice to a strategy, and [`Explorer`], which runs a
//! program body under many schedules.
//!
//! Internal modules:
//! - [`scheduler`]: roster, liveness records, scheduling points and teardown;
//! - [`builder`]: wires bus, subscribers and strategy into a scheduler;
//! - [`explorer`]: iteration loop with timeout, advance and reset;
//! - [`config`]: scheduler and exploration settings.

mod builder;
mod config;
mod explorer;
mod scheduler;

pub use builder::SchedulerBuilder;
pub use config::Config;
pub use explorer::{ExplorationReport, Explorer, IterationReport};
pub use scheduler::Scheduler;
