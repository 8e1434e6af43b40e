//! # Exhaustive depth-first strategy.
//!
//! [`DfsStrategy`] enumerates schedules systematically. The run history is a
//! stack of choice points; each one remembers which candidate index was taken
//! and how many candidates were available.
//!
//! ## Replay and backtracking
//! ```text
//! run 1:   [0/2] [0/1] [0/3]          fresh points always take index 0
//! advance: [0/2] [0/1] [1/3]          bump the deepest point with an untried option
//! run 2:   replay 0, 0, then 1, then fresh points take 0 again
//! advance: pops [x/1] and full points, bumps the next one up ... until empty
//! ```
//!
//! ## Rules
//! - Same history ⇒ same choice; without `advance` every run is identical.
//! - `try_get_next` returns `None` on empty candidates, when `max_depth` choices
//!   were made this run, when the replayed index no longer fits the candidates,
//!   or after the search is exhausted.
//! - `reset` rewinds the replay cursor; on an exhausted search it also clears the
//!   history so the search starts over.

use crate::machines::MachineRef;
use crate::strategies::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChoicePoint {
    index: usize,
    options: usize,
}

/// Depth-first schedule enumeration.
#[derive(Debug, Clone, Default)]
pub struct DfsStrategy {
    /// Maximum decisions per run (`0` = unbounded).
    max_depth: usize,
    stack: Vec<ChoicePoint>,
    cursor: usize,
    exhausted: bool,
}

impl DfsStrategy {
    /// Creates a strategy; `max_depth = 0` means no depth bound.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// True once `advance` found no unexplored schedule.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Candidate indices taken at each choice point of the current history.
    pub fn history(&self) -> Vec<usize> {
        self.stack.iter().map(|cp| cp.index).collect()
    }
}

impl Strategy for DfsStrategy {
    fn try_get_next(&mut self, candidates: &[MachineRef]) -> Option<MachineRef> {
        if self.exhausted || candidates.is_empty() {
            return None;
        }
        if self.max_depth > 0 && self.cursor >= self.max_depth {
            return None;
        }

        let index = match self.stack.get_mut(self.cursor) {
            Some(cp) => {
                // The program reached this point with a different roster.
                if cp.index >= candidates.len() {
                    return None;
                }
                cp.options = candidates.len();
                cp.index
            }
            None => {
                self.stack.push(ChoicePoint {
                    index: 0,
                    options: candidates.len(),
                });
                0
            }
        };

        self.cursor += 1;
        Some(candidates[index].clone())
    }

    fn describe(&self) -> String {
        match self.max_depth {
            0 => "dfs".to_string(),
            d => format!("dfs(max_depth={d})"),
        }
    }

    fn reset(&mut self) {
        if self.exhausted {
            self.stack.clear();
            self.exhausted = false;
        }
        self.cursor = 0;
    }

    fn advance(&mut self) -> bool {
        self.stack.truncate(self.cursor);
        while let Some(last) = self.stack.last_mut() {
            if last.index + 1 < last.options {
                last.index += 1;
                self.cursor = 0;
                return true;
            }
            self.stack.pop();
        }
        self.cursor = 0;
        self.exhausted = true;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machines::{Machine, MachineHandle, MachineId};
    use std::sync::Arc;

    fn machines(n: u64) -> Vec<MachineRef> {
        (1..=n)
            .map(|i| Arc::new(MachineHandle::with_id(MachineId::new(i), "m")) as MachineRef)
            .collect()
    }

    fn pick(s: &mut DfsStrategy, c: &[MachineRef]) -> Option<u64> {
        s.try_get_next(c).map(|m| m.id().get())
    }

    #[test]
    fn picks_first_candidate_deterministically() {
        let c = machines(3);
        let mut s = DfsStrategy::new(0);
        assert_eq!(pick(&mut s, &c), Some(1));
        assert_eq!(pick(&mut s, &c[1..]), Some(2));
        assert_eq!(s.history(), vec![0, 0]);
    }

    #[test]
    fn empty_candidates_end_the_run() {
        let mut s = DfsStrategy::new(0);
        assert_eq!(pick(&mut s, &[]), None);
        assert!(s.history().is_empty());
    }

    #[test]
    fn depth_bound_ends_the_run() {
        let c = machines(2);
        let mut s = DfsStrategy::new(2);
        assert!(pick(&mut s, &c).is_some());
        assert!(pick(&mut s, &c).is_some());
        assert_eq!(pick(&mut s, &c), None);
        assert_eq!(s.describe(), "dfs(max_depth=2)");
    }

    #[test]
    fn reset_replays_same_choices() {
        let c = machines(3);
        let mut s = DfsStrategy::new(0);
        let first: Vec<_> = (0..4).map(|_| pick(&mut s, &c)).collect();
        s.reset();
        let second: Vec<_> = (0..4).map(|_| pick(&mut s, &c)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn enumerates_every_schedule_then_exhausts() {
        // Two choice points with 2 and 3 options: 6 schedules.
        let c = machines(3);
        let mut s = DfsStrategy::new(0);
        let mut seen = Vec::new();
        loop {
            let a = pick(&mut s, &c[..2]).unwrap();
            let b = pick(&mut s, &c).unwrap();
            seen.push((a, b));
            if !s.advance() {
                break;
            }
            s.reset();
        }
        assert_eq!(
            seen,
            vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3)]
        );
        assert!(s.is_exhausted());
        assert_eq!(pick(&mut s, &c), None);
    }

    #[test]
    fn reset_after_exhaustion_restarts_search() {
        let c = machines(1);
        let mut s = DfsStrategy::new(0);
        assert_eq!(pick(&mut s, &c), Some(1));
        assert!(!s.advance());
        assert_eq!(pick(&mut s, &c), None);
        s.reset();
        assert!(!s.is_exhausted());
        assert_eq!(pick(&mut s, &c), Some(1));
    }

    #[test]
    fn diverging_replay_ends_the_run() {
        let c = machines(3);
        let mut s = DfsStrategy::new(0);
        pick(&mut s, &c);
        assert!(s.advance());
        s.reset();
        // Replayed index 1 does not fit a single-candidate roster.
        assert_eq!(pick(&mut s, &c[..1]), None);
    }

    #[test]
    fn shorter_run_discards_stale_tail() {
        let c = machines(2);
        let mut s = DfsStrategy::new(0);
        pick(&mut s, &c);
        pick(&mut s, &c);
        pick(&mut s, &c);
        assert!(s.advance());
        s.reset();
        // Next run only reaches one choice point before ending.
        assert_eq!(pick(&mut s, &c), Some(1));
        assert!(s.advance());
        assert_eq!(s.history(), vec![1]);
    }
}
