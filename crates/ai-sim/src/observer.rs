//! World observer trait for progress reporting and data collection.

use ai_core::{AgentId, GameTime, SimClock, Vec3};
use ai_sched::{LifecycleEvent, Severity};
use ai_task::SoundRequest;

/// Per-tick counts handed to [`WorldObserver::on_tick_end`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickSummary {
    pub tick:    u64,
    pub at:      GameTime,
    /// Agents with a task manager that are still spawned.
    pub agents:  usize,
    /// Tasks running across all agents after the agent phase.
    pub running: usize,
    /// Agents whose manager is paused.
    pub paused:  usize,
    /// Entities with a move in progress after the movement phase.
    pub moving:  usize,
    /// Lifecycle events reported this tick.
    pub events:  usize,
}

/// One row of a position snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub id:       AgentId,
    pub kind:     String,
    pub position: Vec3,
    pub severity: Severity,
    /// Codes of the running tasks, in slot order.
    pub running:  Vec<String>,
    /// The running activity, if any.
    pub activity: Option<String>,
}

/// Callbacks invoked by [`World::run`][crate::World::run] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait WorldObserver {
    /// Called at the start of each tick, after the clock has advanced.
    fn on_tick_start(&mut self, _clock: &SimClock) {}

    /// Called once per lifecycle event, in ascending agent order.
    fn on_event(&mut self, _agent: AgentId, _event: &LifecycleEvent) {}

    /// Called for every sound an agent emitted this tick.
    fn on_sound(&mut self, _agent: AgentId, _at: GameTime, _sound: &SoundRequest) {}

    fn on_tick_end(&mut self, _clock: &SimClock, _summary: &TickSummary) {}

    /// Called every `config.output_interval_ticks` ticks.
    fn on_snapshot(&mut self, _clock: &SimClock, _agents: &[AgentSnapshot]) {}

    /// Called once after the final tick of [`World::run`][crate::World::run].
    fn on_end(&mut self, _clock: &SimClock) {}
}

/// A [`WorldObserver`] that does nothing.
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}
