//! `ActivitySystem`: runs at most one activity at a time for one agent.
//!
//! The system owns a [`SeverityFlag`]; hand a clone of it to the agent's
//! `TaskManager` as an interrupt source.  While an activity runs the flag
//! carries the activity's severity, so the autonomous tasks are paused
//! (`Soft`) or flushed (`Hard`).
//!
//! # Tick order
//!
//! Tick the activity system **before** the task manager.  Selecting an
//! activity only raises the flag; its first action begins on the following
//! tick.  The manager therefore sees the pause (and, for `Hard`, cancels its
//! running tasks along with their moves) before the activity issues a move
//! of its own.
//!
//! [`force`](ActivitySystem::force) is called between ticks, so the manager
//! has not polled the flag yet; a forced activity spends the next tick
//! waiting for that hand-off and starts acting the tick after.

use std::collections::HashSet;

use ai_core::{ACTIVITY_STREAM, AgentId, AgentRng, GameTime};
use ai_sched::SeverityFlag;
use ai_task::{AgentHost, MoveRequest, MoveStatus, MoveTicket};
use tracing::{debug, trace};

use crate::activity::{Action, Activity, ConditionEnv, all_hold};
use crate::{ActivityError, ActivityResult};

/// Default length of an in-game day in seconds.
pub const DEFAULT_DAY_LENGTH: f64 = 1200.0;

/// How an activity ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActivityOutcome {
    Completed,
    Aborted { reason: &'static str },
}

struct Run {
    activity: usize,
    step:     usize,
    /// Raised between ticks; the manager has not seen the flag yet.
    handoff:  bool,
    begun:    bool,
    elapsed:  f32,
    ticket:   Option<MoveTicket>,
}

enum Step {
    Running,
    Done,
    Failed(&'static str),
}

pub struct ActivitySystem {
    agent:      AgentId,
    activities: Vec<Activity>,
    ready_at:   Vec<GameTime>,
    flags:      HashSet<String>,
    flag:       SeverityFlag,
    rng:        AgentRng,
    day_length: f64,
    running:    Option<Run>,
    last:       Option<(usize, ActivityOutcome)>,
}

impl ActivitySystem {
    pub fn new(agent: AgentId, seed: u64, activities: Vec<Activity>) -> Self {
        Self {
            agent,
            ready_at: vec![GameTime::ZERO; activities.len()],
            activities,
            flags: HashSet::new(),
            flag: SeverityFlag::new(),
            rng: AgentRng::stream(seed, agent, ACTIVITY_STREAM),
            day_length: DEFAULT_DAY_LENGTH,
            running: None,
            last: None,
        }
    }

    pub fn with_day_length(mut self, secs: f64) -> Self {
        self.day_length = secs;
        self
    }

    /// A handle for the task manager's interruption list.
    pub fn flag(&self) -> SeverityFlag {
        self.flag.clone()
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        if value {
            self.flags.insert(name.to_owned());
        } else {
            self.flags.remove(name);
        }
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }

    /// The running activity.
    pub fn current(&self) -> Option<&Activity> {
        self.running.as_ref().map(|r| &self.activities[r.activity])
    }

    /// Index of the running activity's current action.
    pub fn current_step(&self) -> Option<usize> {
        self.running.as_ref().map(|r| r.step)
    }

    /// Code and outcome of the most recently ended activity.
    pub fn last_outcome(&self) -> Option<(&str, ActivityOutcome)> {
        self.last.map(|(i, o)| (self.activities[i].code.as_str(), o))
    }

    /// Advance the running activity, or pick one to start.
    pub fn on_tick(&mut self, dt: f32, host: &mut dyn AgentHost) {
        let now = host.now();
        match self.running.as_mut() {
            Some(run) if run.handoff => run.handoff = false,
            Some(_) => self.advance(dt, now, host),
            None => self.select(now, &*host),
        }
    }

    /// Start `code` now, ignoring conditions and cooldown.  A running
    /// activity is aborted first.
    ///
    /// The flag is raised at once; the first action waits until the task
    /// manager has ticked once with it.
    pub fn force(&mut self, code: &str, host: &mut dyn AgentHost) -> ActivityResult<()> {
        let idx = self
            .activities
            .iter()
            .position(|a| a.code == code)
            .ok_or_else(|| ActivityError::UnknownActivity { code: code.to_owned() })?;
        self.cancel(host);
        self.begin(idx, host.now(), true);
        Ok(())
    }

    /// Abort the running activity.  Returns `false` if none was running.
    pub fn cancel(&mut self, host: &mut dyn AgentHost) -> bool {
        if self.running.is_none() {
            return false;
        }
        self.abort(host.now(), host, "cancelled");
        true
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn select(&mut self, now: GameTime, host: &dyn AgentHost) {
        let env = ConditionEnv { now, day_length: self.day_length, flags: &self.flags, host };
        let mut best: Option<usize> = None;
        for (i, activity) in self.activities.iter().enumerate() {
            if now < self.ready_at[i] {
                continue;
            }
            // Ties go to the earlier entry; skip rolling conditions that
            // could not win anyway.
            if best.is_some_and(|b| self.activities[b].priority >= activity.priority) {
                continue;
            }
            if all_hold(&activity.conditions, &env, &mut self.rng) {
                best = Some(i);
            }
        }
        if let Some(idx) = best {
            self.begin(idx, now, false);
        }
    }

    fn begin(&mut self, idx: usize, now: GameTime, handoff: bool) {
        let activity = &self.activities[idx];
        debug!(agent = %self.agent, activity = %activity.code, severity = ?activity.severity, %now, "activity selected");
        self.flag.set(activity.severity);
        self.running = Some(Run {
            activity: idx,
            step:     0,
            handoff,
            begun:    false,
            elapsed:  0.0,
            ticket:   None,
        });
    }

    fn advance(&mut self, dt: f32, now: GameTime, host: &mut dyn AgentHost) {
        let Some(run) = self.running.as_mut() else { return };
        let activity = &self.activities[run.activity];

        if activity.abort_when_false {
            let env = ConditionEnv { now, day_length: self.day_length, flags: &self.flags, host: &*host };
            if !all_hold(&activity.conditions, &env, &mut self.rng) {
                self.abort(now, host, "conditions no longer hold");
                return;
            }
        }

        loop {
            let Some(action) = activity.actions.get(run.step) else {
                self.end(now, ActivityOutcome::Completed);
                return;
            };

            if run.begun {
                run.elapsed += dt;
            } else {
                trace!(agent = %self.agent, activity = %activity.code, step = run.step, action = action.kind(), "action begins");
                run.ticket = start_action(action, host);
                run.begun = true;
                run.elapsed = 0.0;
                if !matches!(action, Action::PlaySound(_)) {
                    return;
                }
            }

            match poll_action(action, run, host) {
                Step::Running => return,
                Step::Failed(reason) => {
                    self.abort(now, host, reason);
                    return;
                }
                Step::Done => {
                    run.step += 1;
                    run.begun = false;
                    run.ticket = None;
                }
            }
        }
    }

    /// Undo the current action's side effects, then end.
    fn abort(&mut self, now: GameTime, host: &mut dyn AgentHost, reason: &'static str) {
        if let Some(run) = &self.running {
            if run.begun {
                match self.activities[run.activity].actions.get(run.step) {
                    Some(Action::GoTo { .. }) => host.stop_move(),
                    Some(Action::PlayAnimation { code, .. }) => host.stop_animation(code),
                    _ => {}
                }
            }
        }
        self.end(now, ActivityOutcome::Aborted { reason });
    }

    fn end(&mut self, now: GameTime, outcome: ActivityOutcome) {
        let Some(run) = self.running.take() else { return };
        let activity = &self.activities[run.activity];
        debug!(agent = %self.agent, activity = %activity.code, ?outcome, %now, "activity ended");
        self.ready_at[run.activity] = now.after_secs(activity.cooldown_secs);
        self.flag.clear();
        self.last = Some((run.activity, outcome));
    }
}

fn start_action(action: &Action, host: &mut dyn AgentHost) -> Option<MoveTicket> {
    match action {
        Action::Wait { .. } => None,
        Action::GoTo { target, speed, tolerance, .. } => Some(host.request_move(MoveRequest {
            target:            *target,
            speed:             *speed,
            arrival_tolerance: *tolerance,
        })),
        Action::PlayAnimation { code, speed, .. } => {
            host.request_animation(code, *speed);
            None
        }
        Action::PlaySound(sound) => {
            host.request_sound(sound);
            None
        }
    }
}

fn poll_action(action: &Action, run: &Run, host: &mut dyn AgentHost) -> Step {
    match action {
        Action::Wait { secs } => {
            if run.elapsed >= *secs { Step::Done } else { Step::Running }
        }
        Action::GoTo { timeout_secs, .. } => {
            let Some(ticket) = run.ticket else { return Step::Failed("no move issued") };
            match host.move_status(ticket) {
                MoveStatus::Arrived => Step::Done,
                MoveStatus::Stuck => Step::Failed("stuck"),
                MoveStatus::Stopped => Step::Failed("move stopped"),
                MoveStatus::Active => {
                    if timeout_secs.is_some_and(|t| run.elapsed >= t) {
                        Step::Failed("timed out")
                    } else {
                        Step::Running
                    }
                }
            }
        }
        Action::PlayAnimation { code, secs, .. } => {
            if run.elapsed >= *secs {
                host.stop_animation(code);
                Step::Done
            } else {
                Step::Running
            }
        }
        Action::PlaySound(_) => Step::Done,
    }
}
