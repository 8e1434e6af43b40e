//! # Example: ping_pong
//!
//! Two machines exchanging messages over mailboxes, explored exhaustively.
//!
//! Demonstrates how to:
//! - Wire a machine's event loop to the [`Scheduler`] notifications.
//! - Run the program under every depth-first schedule with [`Explorer`].
//! - Print the schedule trace with the built-in [`LogWriter`].
//!
//! ## Flow
//! ```text
//! client                         server
//!   ├─ Start                        │
//!   ├─ Ping(1) ───────────────────► │
//!   │                               ├─ Pong(1)
//!   │ ◄──────────────────────────── │
//!   ├─ Ping(2) ───────────────────► │
//!   │                               ├─ Pong(2)
//!   │ ◄──────────────────────────── │
//!   └─ halt                          └─ stopped at teardown
//! ```
//! Every send is a pending event for the receiver, every message is a
//! scheduling point for the handler.
//!
//! ## Run
//! ```bash
//! cargo run --example ping_pong --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use interleave::{
    Config, Explorer, LogWriter, MachineHandle, MachineRef, Scheduler, SchedulerError,
    StrategyKind, Subscribe,
};
use tokio::sync::mpsc;

const ROUNDS: u32 = 2;

#[derive(Debug)]
enum Msg {
    Start,
    Ping(u32),
    Pong(u32),
}

/// Mailbox of another machine.
struct Peer {
    machine: MachineRef,
    tx: mpsc::UnboundedSender<Msg>,
}

impl Peer {
    async fn send(&self, sched: &Scheduler, msg: Msg) {
        sched.notify_pending_event(&self.machine).await;
        let _ = self.tx.send(msg);
    }
}

struct Actor {
    handle: Arc<MachineHandle>,
    rx: mpsc::UnboundedReceiver<Msg>,
    peer: Peer,
}

impl Actor {
    /// Event loop: wait for mail, run one batch under the scheduler, pause.
    async fn run(mut self, sched: Arc<Scheduler>) -> Result<(), SchedulerError> {
        let me: MachineRef = self.handle.clone();
        loop {
            let first = tokio::select! {
                biased;
                _ = self.handle.cancelled() => return Ok(()),
                msg = self.rx.recv() => match msg {
                    Some(msg) => msg,
                    None => return Ok(()),
                },
            };
            if sched.notify_handler_started(&me).await?.is_stopped() {
                return Ok(());
            }

            let mut next = Some(first);
            while let Some(msg) = next.take().or_else(|| self.rx.try_recv().ok()) {
                sched.notify_handled_event(&me).await?;
                if !self.handle_msg(&sched, msg).await {
                    sched.notify_machine_halted(&me).await?;
                    return Ok(());
                }
                if sched.schedule(&me).await?.is_stopped() {
                    return Ok(());
                }
            }

            if sched.notify_handler_paused(&me).await?.is_stopped() {
                return Ok(());
            }
        }
    }

    /// Returns false when the machine is done.
    async fn handle_msg(&self, sched: &Scheduler, msg: Msg) -> bool {
        match msg {
            Msg::Start => self.peer.send(sched, Msg::Ping(1)).await,
            Msg::Ping(n) => self.peer.send(sched, Msg::Pong(n)).await,
            Msg::Pong(n) if n >= ROUNDS => return false,
            Msg::Pong(n) => self.peer.send(sched, Msg::Ping(n + 1)).await,
        }
        true
    }
}

async fn ping_pong(sched: Arc<Scheduler>) {
    let client = MachineHandle::arc("client");
    let server = MachineHandle::arc("server");
    let (client_tx, client_rx) = mpsc::unbounded_channel();
    let (server_tx, server_rx) = mpsc::unbounded_channel();

    let to_client = Peer {
        machine: client.clone(),
        tx: client_tx.clone(),
    };
    let actors = [
        Actor {
            handle: client.clone(),
            rx: client_rx,
            peer: Peer {
                machine: server.clone(),
                tx: server_tx,
            },
        },
        Actor {
            handle: server,
            rx: server_rx,
            peer: Peer {
                machine: client,
                tx: client_tx,
            },
        },
    ];

    to_client.send(&sched, Msg::Start).await;
    let tasks: Vec<_> = actors
        .into_iter()
        .map(|a| tokio::spawn(a.run(Arc::clone(&sched))))
        .collect();

    for t in tasks {
        if let Ok(Err(e)) = t.await {
            eprintln!("protocol violation: {e}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Exhaustive search, no iteration budget
    let cfg = Config {
        strategy: StrategyKind::DepthFirst { max_depth: 0 },
        max_iterations: 0,
        iteration_timeout: Duration::from_secs(5),
        ..Config::default()
    };

    // 2. Print the schedule trace
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let sched = Scheduler::builder(cfg).with_subscribers(subs).build();

    // 3. Explore
    let report = Explorer::new(sched).explore(ping_pong).await?;
    println!(
        "explored {} schedules (exhausted: {})",
        report.len(),
        report.exhausted
    );
    Ok(())
}
