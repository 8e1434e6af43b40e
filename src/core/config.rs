//! # Scheduler configuration.
//!
//! Provides [`Config`], the settings for a [`Scheduler`](crate::Scheduler) and
//! the [`Explorer`](crate::Explorer) driving it.
//!
//! ## Sentinel values
//! - `max_iterations = 0` → run until the strategy is exhausted
//! - `iteration_timeout = 0s` → no per-iteration timeout

use std::time::Duration;

use crate::strategies::StrategyKind;

/// Configuration for the scheduler and the exploration loop.
///
/// ## Field semantics
/// - `strategy`: exploration strategy, fixed for the scheduler's lifetime
/// - `trace`: publish per-decision trace events
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `max_iterations`: exploration budget (`0` = until exhausted)
/// - `iteration_timeout`: upper bound on one iteration (`0s` = none)
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Exploration strategy selection.
    pub strategy: StrategyKind,

    /// Whether the schedule trace is published.
    ///
    /// When `false`, registration, scheduling, pause and halt events are not
    /// published. Run boundaries and protocol violations are always published.
    pub trace: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Maximum number of iterations the explorer runs.
    ///
    /// - `0` = until the strategy reports exhaustion (never, for `Random`)
    /// - `n > 0` = at most `n` iterations
    pub max_iterations: usize,

    /// Maximum wall-clock time for one iteration.
    ///
    /// When exceeded, every machine is stopped and the explorer returns
    /// `RuntimeError::IterationStalled`.
    pub iteration_timeout: Duration,
}

impl Config {
    /// Returns the iteration budget as an `Option`.
    #[inline]
    pub fn iteration_limit(&self) -> Option<usize> {
        if self.max_iterations == 0 {
            None
        } else {
            Some(self.max_iterations)
        }
    }

    /// Returns the per-iteration timeout as an `Option`.
    #[inline]
    pub fn iteration_timeout(&self) -> Option<Duration> {
        if self.iteration_timeout == Duration::ZERO {
            None
        } else {
            Some(self.iteration_timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `strategy = Random { seed: None }`
    /// - `trace = true`
    /// - `bus_capacity = 1024`
    /// - `max_iterations = 100`
    /// - `iteration_timeout = 30s`
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            trace: true,
            bus_capacity: 1024,
            max_iterations: 100,
            iteration_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_map_to_none() {
        let cfg = Config {
            max_iterations: 0,
            iteration_timeout: Duration::ZERO,
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.iteration_limit(), None);
        assert_eq!(cfg.iteration_timeout(), None);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
