//! Exploration strategies.
//!
//! This module groups the knobs that decide **which** machine runs at every
//! scheduling point and **how** repeated runs vary.
//!
//! ## Contents
//! - [`Strategy`]        the pluggable decision contract
//! - [`RandomStrategy`]  seeded uniform choice
//! - [`DfsStrategy`]     exhaustive depth-first search with backtracking
//! - [`StrategyKind`]    configuration value that builds one of the above
//!
//! ## Quick wiring
//! ```text
//! Config { strategy: StrategyKind }
//!      └─► Scheduler owns Box<dyn Strategy>:
//!           - try_get_next(&roster) at every scheduling point
//!           - reset() between runs (replay the same schedule)
//!           - advance() between iterations (move to the next schedule)
//! ```
//!
//! ## Defaults
//! - `StrategyKind::Random { seed: None }` (seed drawn once, reported by `describe()`).

mod dfs;
mod kind;
mod random;
mod strategy;

pub use dfs::DfsStrategy;
pub use kind::StrategyKind;
pub use random::RandomStrategy;
pub use strategy::Strategy;
