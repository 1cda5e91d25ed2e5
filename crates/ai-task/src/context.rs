//! The view a task gets of the world during one callback.

use ai_core::{AgentId, AgentRng, GameTime, Vec3};

use crate::AgentHost;

/// Everything a task may use during one lifecycle callback.
///
/// Built by the task manager once per tick and lent to every task it calls.
/// `now` is sampled from the host at the start of the tick, so all tasks of
/// one agent see the same time within a tick.
///
/// # Lifetimes
///
/// All borrows live for the duration of one scheduler tick.  Tasks must not
/// stash the host or RNG; they are re-lent on every call.
pub struct TaskContext<'a> {
    /// The agent that owns the task.
    pub agent: AgentId,

    /// Absolute game time at the start of this tick.
    pub now: GameTime,

    /// The owning agent's deterministic RNG.
    pub rng: &'a mut AgentRng,

    /// Capability handle into the host engine.
    pub host: &'a mut dyn AgentHost,
}

impl<'a> TaskContext<'a> {
    #[inline]
    pub fn new(
        agent: AgentId,
        now:   GameTime,
        rng:   &'a mut AgentRng,
        host:  &'a mut dyn AgentHost,
    ) -> Self {
        Self { agent, now, rng, host }
    }

    /// Shorthand for `self.host.position()`.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.host.position()
    }
}
