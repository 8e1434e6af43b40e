//! # LogWriter: schedule trace printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout, one line per
//! event. Enabled via the `logging` feature.
//!
//! ## Example output
//! ```text
//! [configured] strategy="dfs"
//! [registered] machine="client" id=#1
//! [scheduled] machine="server" id=#2 step=0
//! [paused] machine="client" id=#1
//! [halted] machine="server" id=#2
//! [explored] machine="server" id=#2 steps=7
//! [iteration-finished] iteration=0 steps=7
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn machine(e: &Event) -> String {
        let name = e.machine.as_deref().unwrap_or("unknown");
        match e.machine_id {
            Some(id) => format!("machine={name:?} id={id}"),
            None => format!("machine={name:?}"),
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::StrategyConfigured => println!("[configured] strategy={reason:?}"),
            EventKind::MachineRegistered => println!("[registered] {}", Self::machine(e)),
            EventKind::MachineScheduled => {
                println!("[scheduled] {} step={:?}", Self::machine(e), e.step)
            }
            EventKind::MachinePaused => println!("[paused] {}", Self::machine(e)),
            EventKind::MachineHalted => println!("[halted] {}", Self::machine(e)),
            EventKind::MachineStopped => println!("[stopped] {}", Self::machine(e)),
            EventKind::ScheduleExplored => {
                println!("[explored] {} steps={:?}", Self::machine(e), e.step)
            }
            EventKind::AssertionFailed => println!("[assertion-failed]"),
            EventKind::ProtocolViolation => {
                println!("[protocol-violation] id={:?} err={reason:?}", e.machine_id)
            }
            EventKind::SchedulerReset => println!("[reset]"),
            EventKind::IterationStarted => {
                println!("[iteration-started] iteration={:?} strategy={reason:?}", e.iteration)
            }
            EventKind::IterationFinished => {
                println!("[iteration-finished] iteration={:?} steps={:?}", e.iteration, e.step)
            }
            EventKind::IterationStalled => {
                println!("[iteration-stalled] iteration={:?}", e.iteration)
            }
            EventKind::SearchExhausted => {
                println!("[search-exhausted] iterations={:?}", e.iteration)
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] {reason}")
            }
            EventKind::SubscriberPanicked => println!(
                "[subscriber-panicked] subscriber={} info={reason}",
                e.machine.as_deref().unwrap_or("unknown"),
            ),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
