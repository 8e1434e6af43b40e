//! # Exploration loop: run a program body under many schedules.
//!
//! [`Explorer`] drives one [`Scheduler`] through repeated iterations of a
//! user-supplied body. Each iteration is one schedule; between iterations the
//! strategy advances and the scheduler is reset.
//!
//! ## Flow
//! ```text
//! reset()
//! loop {
//!   ├─► publish IterationStarted{ iteration, strategy }
//!   ├─► body(scheduler)            (bounded by iteration_timeout)
//!   │     └─ elapsed ─► abort() ─► publish IterationStalled ─► Err(IterationStalled)
//!   ├─► publish IterationFinished{ iteration, steps }
//!   ├─► max_iterations reached ─► stop
//!   ├─► advance() == false ─► publish SearchExhausted ─► stop
//!   └─► reset()
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::time;

use crate::core::scheduler::Scheduler;
use crate::error::RuntimeError;
use crate::events::{Event, EventKind};
use crate::machines::MachineId;

/// Outcome of one iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationReport {
    /// Zero-based iteration index.
    pub iteration: u32,
    /// Strategy description at the start of the iteration.
    pub strategy: String,
    /// Machines chosen during the iteration, in decision order.
    pub decisions: Vec<MachineId>,
}

/// Outcome of a whole exploration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExplorationReport {
    /// Strategy description when exploration began.
    pub strategy: String,
    /// One entry per completed iteration.
    pub iterations: Vec<IterationReport>,
    /// True when the strategy ran out of schedules.
    pub exhausted: bool,
}

impl ExplorationReport {
    /// Number of completed iterations.
    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }
}

/// Repeatedly runs a program body against one scheduler.
pub struct Explorer {
    scheduler: Arc<Scheduler>,
}

impl Explorer {
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self { scheduler }
    }

    /// Scheduler driven by this explorer.
    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    /// Runs `body` once per iteration until the budget is spent or the
    /// strategy is exhausted.
    ///
    /// The body receives the scheduler and must return once every machine it
    /// spawned has observed [`Turn::Stopped`](crate::Turn) or halted.
    pub async fn explore<F, Fut>(&self, mut body: F) -> Result<ExplorationReport, RuntimeError>
    where
        F: FnMut(Arc<Scheduler>) -> Fut,
        Fut: Future<Output = ()>,
    {
        let sched = &self.scheduler;
        let cfg = sched.config();
        let limit = cfg.iteration_limit();
        let timeout = cfg.iteration_timeout();

        sched.reset().await;
        let mut report = ExplorationReport {
            strategy: sched.describe().await,
            ..ExplorationReport::default()
        };

        let mut n: u32 = 0;
        loop {
            let strategy = sched.describe().await;
            sched.bus().publish(
                Event::new(EventKind::IterationStarted)
                    .with_iteration(n)
                    .with_reason(strategy.clone()),
            );

            let run = body(Arc::clone(sched));
            if let Some(dur) = timeout {
                if time::timeout(dur, run).await.is_err() {
                    let roster = sched.roster_names().await;
                    sched.abort().await;
                    sched.bus().publish(
                        Event::new(EventKind::IterationStalled)
                            .with_iteration(n)
                            .with_reason(roster.join(",")),
                    );
                    return Err(RuntimeError::IterationStalled {
                        iteration: n,
                        timeout: dur,
                        roster,
                    });
                }
            } else {
                run.await;
            }

            let decisions = sched.decisions().await;
            sched.bus().publish(
                Event::new(EventKind::IterationFinished)
                    .with_iteration(n)
                    .with_step(decisions.len()),
            );
            report.iterations.push(IterationReport {
                iteration: n,
                strategy,
                decisions,
            });

            if limit.is_some_and(|max| report.iterations.len() >= max) {
                break;
            }
            if !sched.advance().await {
                report.exhausted = true;
                sched
                    .bus()
                    .publish(Event::new(EventKind::SearchExhausted).with_iteration(n + 1));
                break;
            }
            sched.reset().await;
            n = n.saturating_add(1);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::machines::{MachineHandle, MachineRef, Turn};
    use crate::strategies::StrategyKind;
    use std::time::Duration;

    fn cfg(max_iterations: usize) -> Config {
        Config {
            strategy: StrategyKind::DepthFirst { max_depth: 0 },
            max_iterations,
            iteration_timeout: Duration::from_secs(5),
            ..Config::default()
        }
    }

    /// Two machines that each run one step and halt. The first decision is
    /// the only real choice: m1 or m2.
    async fn two_machines(sched: Arc<Scheduler>) {
        let m1: MachineRef = Arc::new(MachineHandle::with_id(MachineId::new(1), "m1"));
        let m2: MachineRef = Arc::new(MachineHandle::with_id(MachineId::new(2), "m2"));

        assert_eq!(sched.notify_handler_started(&m1).await, Ok(Turn::Proceed));
        sched.notify_pending_event(&m2).await;

        let s2 = Arc::clone(&sched);
        let m2c = Arc::clone(&m2);
        let second = tokio::spawn(async move {
            if s2.notify_handler_started(&m2c).await != Ok(Turn::Proceed) {
                return;
            }
            let _ = s2.notify_handled_event(&m2c).await;
            let _ = s2.notify_machine_halted(&m2c).await;
        });

        if sched.schedule(&m1).await == Ok(Turn::Proceed) {
            let _ = sched.notify_machine_halted(&m1).await;
        }
        let _ = second.await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dfs_enumerates_both_orders_then_exhausts() {
        let sched = Scheduler::new(cfg(0));
        let explorer = Explorer::new(Arc::clone(&sched));

        let report = explorer.explore(two_machines).await.unwrap();

        assert!(report.exhausted);
        assert_eq!(report.len(), 2);
        let first: Vec<_> = report.iterations.iter().map(|it| it.decisions[0]).collect();
        assert_eq!(first, vec![MachineId::new(1), MachineId::new(2)]);
        assert!(sched.is_idle().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn iteration_budget_is_respected() {
        let sched = Scheduler::new(cfg(1));
        let report = Explorer::new(sched).explore(two_machines).await.unwrap();
        assert_eq!(report.len(), 1);
        assert!(!report.exhausted);
    }

    #[tokio::test]
    async fn stalled_iteration_is_reported() {
        let sched = Scheduler::new(Config {
            iteration_timeout: Duration::from_millis(50),
            ..cfg(0)
        });
        let err = Explorer::new(Arc::clone(&sched))
            .explore(|s| async move {
                let m: MachineRef = Arc::new(MachineHandle::with_id(MachineId::new(9), "stuck"));
                let _ = s.notify_handler_started(&m).await;
                std::future::pending::<()>().await;
            })
            .await
            .unwrap_err();

        match err {
            RuntimeError::IterationStalled { iteration, roster, .. } => {
                assert_eq!(iteration, 0);
                assert_eq!(roster, vec!["stuck".to_string()]);
            }
        }
        assert!(sched.is_idle().await);
    }
}
