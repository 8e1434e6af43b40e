//! # interleave
//!
//! **Interleave** is a controlled-interleaving scheduler for systematic
//! concurrency testing of actor-style programs.
//!
//! Every machine (actor) runs on its own task, but only one of them is allowed
//! to make progress at a time. At each point where a machine could legally
//! yield, it calls into the [`Scheduler`], which asks a pluggable [`Strategy`]
//! who runs next, wakes exactly that machine and parks the caller. Repeating
//! the program under many schedules (random or exhaustive depth-first) is the
//! job of the [`Explorer`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Machine    │   │   Machine    │   │   Machine    │
//!     │  (task #1)   │   │  (task #2)   │   │  (task #3)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ notify_* / schedule (one at a time)  │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler (one coarse lock)                                      │
//! │  - roster: machines eligible for scheduling                       │
//! │  - records: LivenessRecord per machine (active/paused/halted,     │
//! │             pending count, wait/stop signal)                      │
//! │  - strategy: Box<dyn Strategy> (Random | DepthFirst | custom)     │
//! └──────┬───────────────────────────────────────────────────┬────────┘
//!        │ Publishes:                                        │
//!        │ - MachineRegistered / MachineScheduled            │
//!        │ - MachinePaused / MachineHalted / MachineStopped  │
//!        │ - ScheduleExplored / ProtocolViolation            │
//!        ▼                                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                    (capacity: Config::bus_capacity)               │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       │   (in Scheduler)       │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                            (per-sub queues)
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                      sub1.on   sub2.on   subN.on
//!                       _event()  _event()  _event()
//! ```
//!
//! ### Exploration
//! ```text
//! Explorer::explore(body)
//!
//! reset()
//! loop {
//!   ├─► IterationStarted
//!   ├─► body(scheduler)  ── machines run, one active at a time
//!   │       └─ strategy returns None ─► teardown, every machine sees Turn::Stopped
//!   ├─► IterationFinished{ decisions }
//!   ├─► advance()  ── next seed (random) / backtrack (depth-first)
//!   │       └─ false ─► SearchExhausted, exit
//!   └─► reset()
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Scheduling**    | Serialize machines and hand control between them.             | [`Scheduler`], [`Turn`]                     |
//! | **Strategies**    | Decide who runs next; vary schedules across iterations.       | [`Strategy`], [`RandomStrategy`], [`DfsStrategy`] |
//! | **Machines**      | Identity and cooperative stop of the interleaved actors.      | [`Machine`], [`MachineRef`], [`MachineHandle`] |
//! | **Exploration**   | Run a program body under many schedules.                      | [`Explorer`], [`ExplorationReport`]         |
//! | **Subscriber API**| Observe the schedule trace (logging, checkers, recorders).    | [`Subscribe`]                               |
//! | **Errors**        | Typed protocol violations and exploration failures.           | [`SchedulerError`], [`RuntimeError`]        |
//! | **Configuration** | Strategy selection, trace, budgets and timeouts.              | [`Config`], [`StrategyKind`]                |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use interleave::{Config, Explorer, MachineHandle, MachineRef, Scheduler, StrategyKind, Turn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config {
//!         strategy: StrategyKind::DepthFirst { max_depth: 0 },
//!         ..Config::default()
//!     };
//!     let sched = Scheduler::new(cfg);
//!
//!     // One machine: it starts, runs, halts. There is exactly one schedule.
//!     let report = Explorer::new(sched)
//!         .explore(|s| async move {
//!             let m: MachineRef = MachineHandle::arc("solo");
//!             if s.notify_handler_started(&m).await == Ok(Turn::Proceed) {
//!                 let _ = s.notify_machine_halted(&m).await;
//!             }
//!         })
//!         .await?;
//!
//!     assert!(report.exhausted);
//!     assert_eq!(report.len(), 1);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod machines;
mod strategies;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Config, ExplorationReport, Explorer, IterationReport, Scheduler, SchedulerBuilder};
pub use error::{RuntimeError, SchedulerError};
pub use events::{Bus, Event, EventKind};
pub use machines::{Lifecycle, LivenessSnapshot, Machine, MachineHandle, MachineId, MachineRef, Turn};
pub use strategies::{DfsStrategy, RandomStrategy, Strategy, StrategyKind};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
