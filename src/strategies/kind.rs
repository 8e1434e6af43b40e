//! # Strategy selection.
//!
//! [`StrategyKind`] is the configuration value that selects the exploration
//! strategy for a scheduler. It is read once, when the scheduler is built.

use crate::strategies::{DfsStrategy, RandomStrategy, Strategy};

/// Which exploration strategy a scheduler uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    /// Uniform random choice.
    ///   - `seed`: `None` → drawn once at build time, `Some(s)` → reproducible.
    Random { seed: Option<u64> },
    /// Exhaustive depth-first enumeration.
    ///   - `max_depth`: decisions per run (`0` = unbounded).
    DepthFirst { max_depth: usize },
}

impl Default for StrategyKind {
    /// Returns [`StrategyKind::Random`] with a fresh seed.
    fn default() -> Self {
        StrategyKind::Random { seed: None }
    }
}

impl StrategyKind {
    /// Builds the configured strategy.
    pub fn build(&self) -> Box<dyn Strategy> {
        match *self {
            StrategyKind::Random { seed } => Box::new(RandomStrategy::new(seed)),
            StrategyKind::DepthFirst { max_depth } => Box::new(DfsStrategy::new(max_depth)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_configured_strategy() {
        let random = StrategyKind::Random { seed: Some(3) }.build();
        assert_eq!(random.describe(), "random(seed=3)");

        let dfs = StrategyKind::DepthFirst { max_depth: 0 }.build();
        assert_eq!(dfs.describe(), "dfs");
    }
}
