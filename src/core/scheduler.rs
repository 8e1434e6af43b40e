//! # Scheduler: serializes machines and delegates every choice to a strategy.
//!
//! The [`Scheduler`] owns the active roster, the liveness-record table and the
//! exploration [`Strategy`]. Machines call into it at every point where they
//! could legally yield; the scheduler decides who runs next, wakes exactly that
//! machine and parks the caller.
//!
//! ## Scheduling point
//! ```text
//! machine A ── schedule(A) ──► lock state
//!                               ├─ another record active ─► Err(AlreadyActive)
//!                               ├─ record(A).active = false
//!                               ├─ strategy.try_get_next(&roster)
//!                               │     ├─ None ─► close(): stop others, stop A,
//!                               │     │          clear roster + records ─► Turn::Stopped
//!                               │     └─ Some(B)
//!                               ├─ record(B).active = true   (wakes B's waiter)
//!                               ├─ log decision, trace MachineScheduled
//!                               ├─ B == A or A paused/halted ─► Turn::Proceed
//!                               └─ take A's waiter
//!                             unlock
//!          ◄── waiter.wait() ── until record(A).active again (Proceed) or stopped (Stopped)
//! ```
//!
//! ## Notifications
//! ```text
//! notify_handler_started(M) → admit M; nobody active ⇒ active; else wait
//! notify_handler_paused(M)  → inactive + paused; pending == 0 ⇒ leave roster; schedule
//! notify_machine_halted(M)  → inactive + halted; leave roster; schedule
//! notify_pending_event(M)   → not halted ⇒ pending += 1, (re)admit; never yields
//! notify_handled_event(M)   → pending -= 1 (underflow is an error); never yields
//! notify_assertion_failure  → event only
//! ```
//!
//! ## Rules
//! - One coarse lock per scheduler; it is never held across a wait.
//! - At most one record is active. A yield from a machine that does not hold
//!   the turn is rejected with [`SchedulerError::AlreadyActive`] before the
//!   strategy is consulted, so nothing is logged for it.
//! - Whenever the roster is non-empty during a run, some machine is active: a
//!   starting handler takes the turn if nobody holds it.
//! - Exhaustion and cancellation are `Ok(Turn::Stopped)`, never errors.
//! - Protocol violations are returned immediately and published as
//!   [`EventKind::ProtocolViolation`].

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::core::{builder::SchedulerBuilder, config::Config};
use crate::error::SchedulerError;
use crate::events::{Bus, Event, EventKind};
use crate::machines::{LivenessRecord, LivenessSnapshot, MachineId, MachineRef, Turn, Waiter};
use crate::strategies::Strategy;
use crate::subscribers::SubscriberSet;

/// Mutable state guarded by the scheduler lock.
struct State {
    strategy: Box<dyn Strategy>,
    /// Machines eligible for scheduling, in admission order.
    roster: Vec<MachineRef>,
    records: HashMap<MachineId, LivenessRecord>,
    /// Machines chosen so far in the current run.
    decisions: Vec<MachineId>,
}

impl State {
    fn record(&self, id: MachineId) -> Result<&LivenessRecord, SchedulerError> {
        self.records
            .get(&id)
            .ok_or(SchedulerError::UnknownMachine { id })
    }

    fn record_mut(&mut self, id: MachineId) -> Result<&mut LivenessRecord, SchedulerError> {
        self.records
            .get_mut(&id)
            .ok_or(SchedulerError::UnknownMachine { id })
    }

    fn in_roster(&self, id: MachineId) -> bool {
        self.roster.iter().any(|m| m.id() == id)
    }

    fn leave_roster(&mut self, id: MachineId) {
        self.roster.retain(|m| m.id() != id);
    }

    /// Adds the machine to the roster and the table. Returns true for a new record.
    fn admit(&mut self, machine: &MachineRef) -> bool {
        let id = machine.id();
        if !self.in_roster(id) {
            self.roster.push(Arc::clone(machine));
        }
        if self.records.contains_key(&id) {
            return false;
        }
        self.records.insert(id, LivenessRecord::new(Arc::clone(machine)));
        true
    }

    /// Fails when a machine other than `id` holds the active flag.
    fn ensure_turn(&self, id: MachineId) -> Result<(), SchedulerError> {
        match self.records.values().find(|r| r.is_active() && r.id() != id) {
            Some(active) => Err(SchedulerError::AlreadyActive {
                active: active.id(),
                requested: id,
            }),
            None => Ok(()),
        }
    }

    fn any_active(&self) -> bool {
        self.records.values().any(|r| r.is_active())
    }

    fn activate(&mut self, id: MachineId) -> Result<(), SchedulerError> {
        self.ensure_turn(id)?;
        let rec = self.record_mut(id)?;
        rec.resume();
        rec.set_active(true);
        Ok(())
    }
}

/// Outcome of a scheduling decision taken under the lock.
enum Decision {
    Done(Turn),
    Wait(Waiter),
}

/// Controlled-interleaving scheduler for one run at a time.
///
/// Shared between all machine tasks as `Arc<Scheduler>`.
pub struct Scheduler {
    cfg: Config,
    bus: Bus,
    state: Mutex<State>,
    /// Stops the subscriber listener when the scheduler is dropped.
    listener_token: CancellationToken,
}

impl Scheduler {
    /// Returns a builder for a scheduler with subscribers or a custom strategy.
    pub fn builder(cfg: Config) -> SchedulerBuilder {
        SchedulerBuilder::new(cfg)
    }

    /// Builds a scheduler with the configured strategy and no subscribers.
    pub fn new(cfg: Config) -> Arc<Self> {
        SchedulerBuilder::new(cfg).build()
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        strategy: Box<dyn Strategy>,
        subs: SubscriberSet,
    ) -> Self {
        let description = strategy.describe();
        let sched = Self {
            cfg,
            bus,
            state: Mutex::new(State {
                strategy,
                roster: Vec::new(),
                records: HashMap::new(),
                decisions: Vec::new(),
            }),
            listener_token: CancellationToken::new(),
        };
        sched.subscriber_listener(subs);
        sched
            .bus
            .publish(Event::new(EventKind::StrategyConfigured).with_reason(description));
        sched
    }

    /// Forwards bus events to the subscriber set until the scheduler is
    /// dropped, then lets the workers drain their queues.
    fn subscriber_listener(&self, set: SubscriberSet) {
        if set.is_empty() {
            return;
        }
        let mut rx = self.bus.subscribe();
        let token = self.listener_token.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {
                            set.emit(&Event::subscriber_overflow("listener", "lagged"));
                        }
                    }
                }
            }
            set.shutdown().await;
        });
    }

    // ---------------------------
    // Scheduling points
    // ---------------------------

    /// Hands control from `current` to the machine the strategy picks.
    ///
    /// Blocks `current` until it is active again, unless it was chosen itself
    /// or is paused/halted. Returns [`Turn::Stopped`] when the run is over.
    pub async fn schedule(&self, current: &MachineRef) -> Result<Turn, SchedulerError> {
        let decision = {
            let mut st = self.state.lock().await;
            self.decide(&mut st, current)?
        };
        Ok(self.settle(decision).await)
    }

    /// Entry synchronization of a machine's event-handling loop.
    ///
    /// Registers the machine. It runs immediately when no machine is active,
    /// otherwise it waits until the scheduler picks it.
    pub async fn notify_handler_started(
        &self,
        machine: &MachineRef,
    ) -> Result<Turn, SchedulerError> {
        let id = machine.id();
        let waiter = {
            let mut st = self.state.lock().await;
            if st.records.get(&id).is_some_and(|r| r.is_halted()) {
                return Ok(Turn::Stopped);
            }
            if st.admit(machine) {
                self.trace(Event::new(EventKind::MachineRegistered).for_machine(&**machine));
            }
            self.report(st.record_mut(id))?.resume();
            if !st.any_active() {
                self.report(st.activate(id))?;
            }
            self.report(st.record(id))?.waiter()
        };
        Ok(waiter.wait().await)
    }

    /// The machine's queue is empty: it yields and leaves the roster if it
    /// has nothing pending.
    pub async fn notify_handler_paused(
        &self,
        machine: &MachineRef,
    ) -> Result<Turn, SchedulerError> {
        let id = machine.id();
        let decision = {
            let mut st = self.state.lock().await;
            self.report(st.record(id))?;
            self.report(st.ensure_turn(id))?;
            let rec = self.report(st.record_mut(id))?;
            rec.pause();
            if rec.pending() == 0 {
                st.leave_roster(id);
            }
            self.trace(Event::new(EventKind::MachinePaused).for_machine(&**machine));
            self.decide(&mut st, machine)?
        };
        Ok(self.settle(decision).await)
    }

    /// The machine terminated permanently; it is never scheduled again in this run.
    pub async fn notify_machine_halted(
        &self,
        machine: &MachineRef,
    ) -> Result<Turn, SchedulerError> {
        let id = machine.id();
        let decision = {
            let mut st = self.state.lock().await;
            self.report(st.record(id))?;
            self.report(st.ensure_turn(id))?;
            self.report(st.record_mut(id))?.halt();
            st.leave_roster(id);
            self.trace(Event::new(EventKind::MachineHalted).for_machine(&**machine));
            self.decide(&mut st, machine)?
        };
        Ok(self.settle(decision).await)
    }

    // ---------------------------
    // Bookkeeping notifications
    // ---------------------------

    /// An event was enqueued for `machine`. Re-admits a paused machine; ignored
    /// for halted machines. Never yields.
    pub async fn notify_pending_event(&self, machine: &MachineRef) {
        let id = machine.id();
        let mut st = self.state.lock().await;
        if st.records.get(&id).is_some_and(|r| r.is_halted()) {
            return;
        }
        if st.admit(machine) {
            self.trace(Event::new(EventKind::MachineRegistered).for_machine(&**machine));
        }
        if let Some(rec) = st.records.get_mut(&id) {
            rec.add_pending();
            rec.resume();
        }
    }

    /// `machine` dequeued one of its pending events. Never yields.
    pub async fn notify_handled_event(&self, machine: &MachineRef) -> Result<(), SchedulerError> {
        let mut st = self.state.lock().await;
        let rec = self.report(st.record_mut(machine.id()))?;
        self.report(rec.handle_pending())
    }

    /// Hook for downstream checkers. Takes no scheduling action: whether to
    /// abort the run is left to whoever subscribes to [`EventKind::AssertionFailed`].
    pub fn notify_assertion_failure(&self) {
        self.bus.publish(Event::new(EventKind::AssertionFailed));
    }

    // ---------------------------
    // Run control
    // ---------------------------

    /// Prepares for a new run: resets the strategy, stops anything still
    /// registered and clears roster, records and the decision log.
    pub async fn reset(&self) {
        let mut st = self.state.lock().await;
        for rec in st.records.values() {
            rec.stop();
        }
        st.strategy.reset();
        st.roster.clear();
        st.records.clear();
        st.decisions.clear();
        self.bus.publish(Event::new(EventKind::SchedulerReset));
    }

    /// Moves the strategy to the next iteration. Returns false once the search
    /// space is exhausted.
    pub async fn advance(&self) -> bool {
        self.state.lock().await.strategy.advance()
    }

    /// Ends the current run without consulting the strategy, stopping every
    /// known machine.
    pub async fn abort(&self) {
        let mut st = self.state.lock().await;
        self.close(&mut st, None);
    }

    // ---------------------------
    // Introspection
    // ---------------------------

    /// Ids of the machines currently eligible for scheduling, in roster order.
    pub async fn roster(&self) -> Vec<MachineId> {
        self.state.lock().await.roster.iter().map(|m| m.id()).collect()
    }

    /// Names of the machines currently eligible for scheduling.
    pub async fn roster_names(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .roster
            .iter()
            .map(|m| m.name().to_string())
            .collect()
    }

    /// Snapshot of every liveness record, sorted by machine id.
    pub async fn snapshot(&self) -> Vec<LivenessSnapshot> {
        let st = self.state.lock().await;
        let mut out: Vec<LivenessSnapshot> = st.records.values().map(|r| r.snapshot()).collect();
        out.sort_unstable_by_key(|s| s.id);
        out
    }

    /// Snapshot of one liveness record.
    pub async fn record(&self, id: MachineId) -> Option<LivenessSnapshot> {
        self.state.lock().await.records.get(&id).map(|r| r.snapshot())
    }

    /// Machines chosen so far in the current run, in decision order.
    pub async fn decisions(&self) -> Vec<MachineId> {
        self.state.lock().await.decisions.clone()
    }

    /// True when neither roster nor record table holds anything.
    pub async fn is_idle(&self) -> bool {
        let st = self.state.lock().await;
        st.roster.is_empty() && st.records.is_empty()
    }

    /// Strategy description.
    pub async fn describe(&self) -> String {
        self.state.lock().await.strategy.describe()
    }

    /// Scheduler configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Event bus the schedule trace is published on.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    /// Core decision: deactivate `current`, pick and activate the next machine.
    fn decide(&self, st: &mut State, current: &MachineRef) -> Result<Decision, SchedulerError> {
        let id = current.id();
        let rec = self.report(st.record(id))?;
        // Only the machine holding the turn may hand it over.
        self.report(st.ensure_turn(id))?;
        rec.set_active(false);

        let Some(next) = st.strategy.try_get_next(&st.roster) else {
            self.close(st, Some(current));
            return Ok(Decision::Done(Turn::Stopped));
        };

        self.report(st.activate(next.id()))?;
        let step = st.decisions.len();
        st.decisions.push(next.id());
        self.trace(
            Event::new(EventKind::MachineScheduled)
                .for_machine(&*next)
                .with_step(step),
        );

        if next.id() == id {
            return Ok(Decision::Done(Turn::Proceed));
        }
        let rec = self.report(st.record(id))?;
        if rec.is_paused() || rec.is_halted() {
            return Ok(Decision::Done(Turn::Proceed));
        }
        Ok(Decision::Wait(rec.waiter()))
    }

    async fn settle(&self, decision: Decision) -> Turn {
        match decision {
            Decision::Done(turn) => turn,
            Decision::Wait(waiter) => waiter.wait().await,
        }
    }

    /// Tears the run down: stops every other known machine, then `current`,
    /// and clears roster and records.
    fn close(&self, st: &mut State, current: Option<&MachineRef>) {
        let current_id = current.map(|m| m.id());

        for m in st.roster.iter().filter(|m| Some(m.id()) != current_id) {
            match st.records.get(&m.id()) {
                Some(rec) => rec.stop(),
                None => m.stop(),
            }
            self.bus.publish(Event::new(EventKind::MachineStopped).for_machine(&**m));
        }
        // Idle machines outside the roster may still sit on their own queues.
        for rec in st.records.values() {
            if Some(rec.id()) != current_id && !rec.is_halted() && !st.in_roster(rec.id()) {
                rec.stop();
            }
        }

        if let Some(m) = current {
            // The caller learns about its own cancellation through Turn::Stopped.
            match st.records.get(&m.id()) {
                Some(rec) => rec.stop(),
                None => m.stop(),
            }
        }

        let mut explored = Event::new(EventKind::ScheduleExplored).with_step(st.decisions.len());
        if let Some(m) = current {
            explored = explored.for_machine(&**m);
        }
        self.bus.publish(explored);

        st.roster.clear();
        st.records.clear();
    }

    /// Publishes a schedule-trace event when tracing is enabled.
    fn trace(&self, ev: Event) {
        if self.cfg.trace {
            self.bus.publish(ev);
        }
    }

    /// Publishes protocol violations before handing them back to the caller.
    fn report<T>(&self, res: Result<T, SchedulerError>) -> Result<T, SchedulerError> {
        if let Err(e) = &res {
            let mut ev = Event::new(EventKind::ProtocolViolation).with_reason(e.as_label());
            ev.machine_id = match e {
                SchedulerError::UnknownMachine { id } | SchedulerError::PendingUnderflow { id } => {
                    Some(*id)
                }
                SchedulerError::AlreadyActive { requested, .. } => Some(*requested),
            };
            self.bus.publish(ev);
        }
        res
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.listener_token.cancel();
    }
}
