//! Game time model.
//!
//! # Design
//!
//! The scheduler itself keeps no clock: the host passes `dt` (seconds since
//! the previous tick) into every tick and exposes the absolute game time
//! through its host handle.  Absolute time is a monotonically increasing
//! number of seconds held in `GameTime`; cooldowns are stored as
//! `GameTime` deadlines.
//!
//! `SimClock` is the clock a host (or the sandbox world) advances once per
//! simulation step.

use std::fmt;

// ── GameTime ─────────────────────────────────────────────────────────────────

/// Absolute game time in seconds since the world started.
///
/// `f64` keeps sub-millisecond precision for centuries of simulated time,
/// which `f32` would lose within hours.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameTime(pub f64);

impl GameTime {
    pub const ZERO: GameTime = GameTime(0.0);

    /// The time `secs` seconds after `self`.
    #[inline]
    pub fn after_secs(self, secs: f32) -> GameTime {
        GameTime(self.0 + secs as f64)
    }

    /// Seconds elapsed from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn secs_since(self, earlier: GameTime) -> f64 {
        self.0 - earlier.0
    }

    #[inline]
    pub fn max(self, other: GameTime) -> GameTime {
        if other.0 > self.0 { other } else { self }
    }
}

impl std::ops::Add<f32> for GameTime {
    type Output = GameTime;
    #[inline]
    fn add(self, rhs: f32) -> GameTime {
        self.after_secs(rhs)
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.2}s", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Step counter plus accumulated game time.
///
/// Cheap to copy and holds no heap data.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Number of completed steps.
    pub tick: u64,
    /// Accumulated game time.
    pub now: GameTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one step of `dt` seconds.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.now = self.now.after_secs(dt);
    }

    /// Break elapsed time into (hours, minutes, seconds) for log output.
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let total = self.now.0.max(0.0) as u64;
        let hours = total / 3_600;
        let minutes = ((total % 3_600) / 60) as u32;
        let seconds = (total % 60) as u32;
        (hours, minutes, seconds)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "step {} ({:02}:{:02}:{:02})", self.tick, h, m, s)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration for a world that hosts many agents.
///
/// Typically loaded from a JSON file by the application crate.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seconds of game time per step (the `dt` handed to every scheduler).
    pub dt_secs: f32,

    /// Total steps to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Emit a snapshot every N steps.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt_secs:               0.05,
            total_ticks:           1_200,
            seed:                  0,
            num_threads:           None,
            output_interval_ticks: 20,
        }
    }
}

impl SimConfig {
    /// Game time reached after `total_ticks` steps.
    #[inline]
    pub fn end_time(&self) -> GameTime {
        GameTime(self.total_ticks as f64 * self.dt_secs as f64)
    }
}
