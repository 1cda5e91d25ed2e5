//! Re-execution cooldown embedded by tasks.

use ai_core::{AgentRng, GameTime};

/// A randomised "not again before" deadline.
///
/// Tasks call [`on_finish`](Self::on_finish) from `finish_execute` and check
/// [`is_ready`](Self::is_ready) first thing in `should_execute`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cooldown {
    min_secs: f32,
    max_secs: f32,
    /// When `false`, a cancelled run leaves the task free to retry at once.
    on_cancel: bool,
    until: GameTime,
}

impl Cooldown {
    /// A cooldown of a uniformly random length in `[min_secs, max_secs]`,
    /// applied only after natural completion.
    pub fn new(min_secs: f32, max_secs: f32) -> Self {
        Self {
            min_secs: min_secs.max(0.0),
            max_secs: max_secs.max(min_secs).max(0.0),
            on_cancel: false,
            until: GameTime::ZERO,
        }
    }

    /// Also apply the cooldown when the run was cancelled.
    pub fn also_on_cancel(mut self) -> Self {
        self.on_cancel = true;
        self
    }

    /// A cooldown that is always ready.
    pub fn none() -> Self {
        Self::new(0.0, 0.0)
    }

    #[inline]
    pub fn is_ready(&self, now: GameTime) -> bool {
        now >= self.until
    }

    /// Absolute time at which the task may run again.
    #[inline]
    pub fn until(&self) -> GameTime {
        self.until
    }

    /// Start a cooldown of random length from `now`.
    pub fn trigger(&mut self, now: GameTime, rng: &mut AgentRng) {
        let secs = rng.range_f32(self.min_secs, self.max_secs);
        self.until = now.after_secs(secs);
    }

    /// Apply the finish policy: full cooldown after natural completion, and
    /// after cancellation only if configured with
    /// [`also_on_cancel`](Self::also_on_cancel).
    pub fn on_finish(&mut self, cancelled: bool, now: GameTime, rng: &mut AgentRng) {
        if !cancelled || self.on_cancel {
            self.trigger(now, rng);
        } else {
            self.until = now;
        }
    }

    pub fn clear(&mut self) {
        self.until = GameTime::ZERO;
    }
}
