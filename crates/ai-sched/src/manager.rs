//! The per-agent task manager and its tick algorithm.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use ai_core::{AgentId, AgentRng, GameTime};
use ai_task::{AgentHost, DamageSource, NotifyData, Task, TaskContext, TaskError, TaskResult};
use tracing::{debug, trace, warn};

use crate::{
    InterruptSource, InterruptionController, LifecycleEvent, SchedError, SchedResult,
    SchedulerConfig, Severity, TaskPhase,
};

/// One registered task plus the running state the manager keeps for it.
struct TaskEntry {
    task:    Box<dyn Task>,
    running: bool,
    /// Manager tick on which the task was last started.
    started: u64,
}

// ── TaskManager ───────────────────────────────────────────────────────────────

/// Drives one agent's tasks.
///
/// Each [`on_tick`][Self::on_tick]:
///
/// 1. **Interrupts**: poll the registered interruption predicates and fold
///    them with the manual pause into one [`Severity`].  Entering `Hard`
///    cancels every running task at once.  While paused, stop here.
/// 2. **Select**: scan tasks in registration order (or shuffled, if
///    configured).  A task is a candidate when it is idle, its priority is
///    non-negative, and its slot is free (or, with preemption, it outranks
///    the occupant).  The first candidate per slot whose `should_execute`
///    holds is started.
/// 3. **Advance**: call `continue_execute(dt)` on every task that was
///    running before this tick.  A task returning `false` is finished with
///    `cancelled = false`; its slot is refilled on the next tick.
///
/// A fault from any callback (an `Err`, or a panic when `catch_panics` is
/// set) is logged, the task is forced idle without `finish_execute`, and
/// the tick carries on with the remaining tasks.
///
/// Create via [`TaskManagerBuilder`][crate::TaskManagerBuilder].
pub struct TaskManager {
    agent:      AgentId,
    entries:    Vec<TaskEntry>,
    /// Slot → index into `entries`.  Grows to the largest slot seen.
    active:     Vec<Option<usize>>,
    rng:        AgentRng,
    config:     SchedulerConfig,
    interrupts: InterruptionController,
    manual:     Severity,
    severity:   Severity,
    ticks:      u64,
    events:     Vec<LifecycleEvent>,
}

impl TaskManager {
    pub(crate) fn new(
        agent:      AgentId,
        rng:        AgentRng,
        config:     SchedulerConfig,
        interrupts: InterruptionController,
    ) -> Self {
        Self {
            agent,
            entries: Vec::new(),
            active: Vec::new(),
            rng,
            config,
            interrupts,
            manual: Severity::None,
            severity: Severity::None,
            ticks: 0,
            events: Vec::new(),
        }
    }

    // ── Host → manager ────────────────────────────────────────────────────

    /// Append a task.  Registration order is the tie-break order.
    pub fn add_task(&mut self, task: Box<dyn Task>) {
        let slot = task.meta().slot;
        if slot >= self.active.len() {
            self.active.resize(slot + 1, None);
        }
        self.entries.push(TaskEntry { task, running: false, started: 0 });
    }

    /// Register an interruption predicate.
    pub fn add_interrupt<S: InterruptSource + 'static>(&mut self, source: S) {
        self.interrupts.add(source);
    }

    /// Advance the scheduler by `dt` seconds.
    pub fn on_tick(&mut self, dt: f32, host: &mut dyn AgentHost) {
        self.ticks += 1;
        let now = host.now();

        let polled = self.interrupts.poll();
        self.apply_severity(self.manual.max(polled), now, host);
        if self.severity.is_paused() {
            trace!(agent = %self.agent, severity = ?self.severity, "tick suppressed");
            return;
        }

        self.select(now, host);
        self.advance(dt, now, host);
    }

    /// Fan `key`/`data` out to every task.
    ///
    /// A task answering `true` is started right away when the manager is
    /// not paused, the task is idle, and its slot is free or its priority
    /// beats the occupant's cancel priority (the occupant is cancelled).
    /// Returns how many tasks were started.
    pub fn notify(&mut self, key: &str, data: &NotifyData, host: &mut dyn AgentHost) -> usize {
        let now = host.now();
        let mut wanted = Vec::new();
        for idx in 0..self.entries.len() {
            let answer = self.call(idx, TaskPhase::Notify, now, host, |task, _ctx| {
                Ok(task.notify(key, data))
            });
            if answer == Some(true) {
                wanted.push(idx);
            }
        }

        if self.severity.is_paused() {
            if !wanted.is_empty() {
                trace!(agent = %self.agent, key, "notify start requests ignored while paused");
            }
            return 0;
        }

        let mut started = 0;
        for idx in wanted {
            if self.entries[idx].running {
                continue;
            }
            let slot = self.slot_of(idx);
            if let Some(occupant) = self.occupant(slot) {
                if !self.meta_outranks(idx, occupant) {
                    continue;
                }
                self.finish(occupant, true, now, host);
            }
            if self.start(idx, now, host) {
                started += 1;
            }
        }
        started
    }

    /// Tell every task the agent was hurt.
    pub fn on_entity_hurt(&mut self, source: &DamageSource, damage: f32, host: &mut dyn AgentHost) {
        let now = host.now();
        for idx in 0..self.entries.len() {
            self.call(idx, TaskPhase::Hurt, now, host, |task, _ctx| {
                task.on_hurt(source, damage);
                Ok(())
            });
        }
    }

    /// Cancel every running task and clear all slots.  Does not pause.
    pub fn cancel_all(&mut self, host: &mut dyn AgentHost) {
        let now = host.now();
        self.cancel_running(now, host);
    }

    /// Request a manual pause.  The effective severity is the maximum of
    /// this request and the interruption predicates.  Entering `Hard`
    /// cancels every running task immediately.
    pub fn pause(&mut self, severity: Severity, host: &mut dyn AgentHost) {
        self.manual = severity;
        let now = host.now();
        self.apply_severity(severity.max(self.interrupts.last()), now, host);
    }

    /// Withdraw the manual pause.  Predicates still reporting a severity
    /// keep the manager paused.
    pub fn resume(&mut self, host: &mut dyn AgentHost) {
        self.pause(Severity::None, host);
    }

    /// Cancel everything and hand the tasks back.  For despawn: no task is
    /// left in a running state.
    pub fn shutdown(mut self, host: &mut dyn AgentHost) -> Vec<Box<dyn Task>> {
        let now = host.now();
        self.cancel_running(now, host);
        debug!(agent = %self.agent, tasks = self.entries.len(), "task manager shut down");
        self.entries.into_iter().map(|e| e.task).collect()
    }

    // ── Lookup and control ────────────────────────────────────────────────

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Effective severity as of the last tick or pause call.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_paused(&self) -> bool {
        self.severity.is_paused()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tasks in registration order.
    pub fn tasks(&self) -> impl Iterator<Item = &dyn Task> + '_ {
        self.entries.iter().map(|e| e.task.as_ref())
    }

    /// First task with `code`.
    pub fn task(&self, code: &str) -> Option<&dyn Task> {
        self.index_of(code).map(|i| self.entries[i].task.as_ref())
    }

    pub fn task_mut(&mut self, code: &str) -> Option<&mut (dyn Task + 'static)> {
        let i = self.index_of(code)?;
        Some(self.entries[i].task.as_mut())
    }

    pub fn is_task_active(&self, code: &str) -> bool {
        self.entries.iter().any(|e| e.running && e.task.meta().code == code)
    }

    pub fn running_in_slot(&self, slot: usize) -> Option<&dyn Task> {
        self.occupant(slot).map(|i| self.entries[i].task.as_ref())
    }

    /// Number of running tasks.
    pub fn running_count(&self) -> usize {
        self.active.iter().flatten().count()
    }

    /// Cancel the task with `code` if it is running.  Returns `true` if it
    /// was.
    pub fn stop_task(&mut self, code: &str, host: &mut dyn AgentHost) -> bool {
        match self.index_of(code) {
            Some(idx) if self.entries[idx].running => {
                let now = host.now();
                self.finish(idx, true, now, host);
                true
            }
            _ => false,
        }
    }

    /// Start the task with `code` now, skipping `should_execute` and
    /// cancelling whatever runs in its slot.
    ///
    /// Returns `Ok(false)` if `start_execute` faulted, `Ok(true)` if the
    /// task is running afterwards (including when it already was).
    ///
    /// # Errors
    ///
    /// [`SchedError::UnknownTask`] for an unknown code,
    /// [`SchedError::Paused`] while paused.
    pub fn execute_task(&mut self, code: &str, host: &mut dyn AgentHost) -> SchedResult<bool> {
        let idx = self
            .index_of(code)
            .ok_or_else(|| SchedError::UnknownTask { code: code.to_owned() })?;
        if self.severity.is_paused() {
            return Err(SchedError::Paused { code: code.to_owned() });
        }
        if self.entries[idx].running {
            return Ok(true);
        }

        let now = host.now();
        if let Some(occupant) = self.occupant(self.slot_of(idx)) {
            self.finish(occupant, true, now, host);
        }
        Ok(self.start(idx, now, host))
    }

    /// Remove the task with `code`, cancelling it first if it runs.
    pub fn remove_task(&mut self, code: &str, host: &mut dyn AgentHost) -> Option<Box<dyn Task>> {
        let idx = self.index_of(code)?;
        if self.entries[idx].running {
            let now = host.now();
            self.finish(idx, true, now, host);
        }
        let entry = self.entries.remove(idx);
        for i in self.active.iter_mut().flatten() {
            if *i > idx {
                *i -= 1;
            }
        }
        Some(entry.task)
    }

    /// Take the buffered lifecycle events.
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    fn select(&mut self, now: GameTime, host: &mut dyn AgentHost) {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        if self.config.shuffle {
            self.rng.shuffle(&mut order);
        }

        for idx in order {
            let entry = &self.entries[idx];
            if entry.running || entry.task.meta().priority < 0.0 {
                continue;
            }

            let occupant = self.occupant(self.slot_of(idx));
            if let Some(run) = occupant {
                let preemptible = self.config.preemption
                    && self.entries[run].started != self.ticks
                    && self.meta_outranks(idx, run);
                if !preemptible {
                    continue;
                }
            }

            let ok = self.call(idx, TaskPhase::Evaluate, now, host, |task, ctx| {
                task.should_execute(ctx)
            });
            if ok != Some(true) {
                continue;
            }

            if let Some(run) = occupant {
                trace!(
                    agent = %self.agent,
                    task = %self.entries[idx].task.meta().code,
                    preempted = %self.entries[run].task.meta().code,
                    "preempting"
                );
                self.finish(run, true, now, host);
            }
            self.start(idx, now, host);
        }
    }

    fn advance(&mut self, dt: f32, now: GameTime, host: &mut dyn AgentHost) {
        for slot in 0..self.active.len() {
            let Some(idx) = self.active[slot] else { continue };
            if self.entries[idx].started == self.ticks {
                continue;
            }

            let keep = self.call(idx, TaskPhase::Continue, now, host, |task, ctx| {
                task.continue_execute(dt, ctx)
            });
            if keep == Some(false) {
                self.finish(idx, false, now, host);
            }
        }
    }

    // ── Lifecycle transitions ─────────────────────────────────────────────

    /// Idle → Running.  Returns `false` if `start_execute` faulted.
    fn start(&mut self, idx: usize, now: GameTime, host: &mut dyn AgentHost) -> bool {
        let started = self
            .call(idx, TaskPhase::Start, now, host, |task, ctx| task.start_execute(ctx))
            .is_some();
        if !started {
            return false;
        }

        let slot = self.slot_of(idx);
        let entry = &mut self.entries[idx];
        entry.running = true;
        entry.started = self.ticks;
        self.active[slot] = Some(idx);

        let code = &entry.task.meta().code;
        debug!(agent = %self.agent, task = %code, slot, "task started");
        if self.config.record_events {
            self.events.push(LifecycleEvent::Started { code: code.clone(), slot, at: now });
        }
        true
    }

    /// Running → Idle.  The slot is cleared before `finish_execute` runs so
    /// a faulting finish still leaves the task idle.
    fn finish(&mut self, idx: usize, cancelled: bool, now: GameTime, host: &mut dyn AgentHost) {
        let slot = self.slot_of(idx);
        self.entries[idx].running = false;
        if self.active[slot] == Some(idx) {
            self.active[slot] = None;
        }

        let ok = self
            .call(idx, TaskPhase::Finish, now, host, |task, ctx| task.finish_execute(cancelled, ctx))
            .is_some();
        if !ok {
            return;
        }

        let code = &self.entries[idx].task.meta().code;
        debug!(agent = %self.agent, task = %code, slot, cancelled, "task finished");
        if self.config.record_events {
            self.events.push(LifecycleEvent::Finished {
                code: code.clone(),
                slot,
                cancelled,
                at: now,
            });
        }
    }

    fn cancel_running(&mut self, now: GameTime, host: &mut dyn AgentHost) {
        for slot in 0..self.active.len() {
            if let Some(idx) = self.active[slot] {
                self.finish(idx, true, now, host);
            }
        }
    }

    fn apply_severity(&mut self, next: Severity, now: GameTime, host: &mut dyn AgentHost) {
        let prev = self.severity;
        if next == prev {
            return;
        }
        self.severity = next;

        if next.is_paused() {
            debug!(agent = %self.agent, from = ?prev, to = ?next, "task manager paused");
            if self.config.record_events {
                self.events.push(LifecycleEvent::Paused { severity: next, at: now });
            }
            if next == Severity::Hard {
                self.cancel_running(now, host);
            }
        } else {
            debug!(agent = %self.agent, from = ?prev, "task manager resumed");
            if self.config.record_events {
                self.events.push(LifecycleEvent::Resumed { at: now });
            }
        }
    }

    // ── Fault containment ─────────────────────────────────────────────────

    /// Run one task callback with a fresh context.  A fault is logged, the
    /// task forced idle, and `None` returned.
    fn call<T>(
        &mut self,
        idx:   usize,
        phase: TaskPhase,
        now:   GameTime,
        host:  &mut dyn AgentHost,
        f:     impl FnOnce(&mut dyn Task, &mut TaskContext<'_>) -> TaskResult<T>,
    ) -> Option<T> {
        let task = self.entries[idx].task.as_mut();
        let mut ctx = TaskContext::new(self.agent, now, &mut self.rng, host);
        let result = if self.config.catch_panics {
            match panic::catch_unwind(AssertUnwindSafe(|| f(task, &mut ctx))) {
                Ok(r) => r,
                Err(payload) => Err(TaskError::Panicked(panic_message(&*payload))),
            }
        } else {
            f(task, &mut ctx)
        };

        match result {
            Ok(v) => Some(v),
            Err(error) => {
                self.fault(idx, phase, &error, now);
                None
            }
        }
    }

    fn fault(&mut self, idx: usize, phase: TaskPhase, error: &TaskError, now: GameTime) {
        let slot = self.slot_of(idx);
        let entry = &mut self.entries[idx];
        entry.running = false;
        if self.active[slot] == Some(idx) {
            self.active[slot] = None;
        }

        let code = &entry.task.meta().code;
        warn!(agent = %self.agent, task = %code, %phase, %error, "task fault; forced idle");
        if self.config.record_events {
            self.events.push(LifecycleEvent::Faulted {
                code: code.clone(),
                slot,
                phase,
                error: error.to_string(),
                at: now,
            });
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn index_of(&self, code: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.task.meta().code == code)
    }

    #[inline]
    fn slot_of(&self, idx: usize) -> usize {
        self.entries[idx].task.meta().slot
    }

    #[inline]
    fn occupant(&self, slot: usize) -> Option<usize> {
        self.active.get(slot).copied().flatten()
    }

    #[inline]
    fn meta_outranks(&self, candidate: usize, running: usize) -> bool {
        self.entries[candidate].task.meta().outranks(self.entries[running].task.meta())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
