//! The capability boundary between tasks and the host engine.
//!
//! Every method is a synchronous call that either answers a cheap query or
//! enqueues work on one of the host's own subsystems.  Nothing here blocks
//! and nothing returns a future: long-running work (walking to a point
//! several seconds away) is started with [`AgentHost::request_move`] and
//! then polled with [`AgentHost::move_status`] on subsequent ticks.

use ai_core::{AgentId, GameTime, Vec3};
use serde::Deserialize;

// ── Movement ──────────────────────────────────────────────────────────────────

/// A request to walk to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRequest {
    pub target: Vec3,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// The move counts as arrived once within this distance of `target`.
    pub arrival_tolerance: f32,
}

/// Opaque handle identifying one accepted move request.
///
/// A newer request supersedes every older ticket; polling a superseded
/// ticket reports [`MoveStatus::Stopped`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveTicket(pub u64);

/// Progress of a move request, as seen on the tick it is polled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveStatus {
    /// The path traverser is still working on it.
    Active,
    /// Reached the target within tolerance.
    Arrived,
    /// The traverser gave up (obstructed, no path).
    Stuck,
    /// Superseded by a newer request or stopped via `stop_move`.
    Stopped,
}

impl MoveStatus {
    /// `true` once the request will make no further progress.
    #[inline]
    pub fn is_done(self) -> bool {
        !matches!(self, MoveStatus::Active)
    }
}

// ── Sound ─────────────────────────────────────────────────────────────────────

/// A one-shot sound emitted at the agent's position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundRequest {
    /// Asset location, e.g. `"creature/wolf/howl"`.
    pub location: String,
    /// Audible range in world units.
    #[serde(default = "default_sound_range")]
    pub range: f32,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_true")]
    pub randomize_pitch: bool,
}

fn default_sound_range() -> f32 { 24.0 }
fn default_volume() -> f32 { 1.0 }
fn default_true() -> bool { true }

// ── World queries ─────────────────────────────────────────────────────────────

/// Which entities a target search may return.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFilter {
    /// Accepted entity kind codes (e.g. `"player"`, `"chicken"`).  Empty
    /// means any kind.
    #[serde(default)]
    pub kinds: Vec<String>,
}

impl EntityFilter {
    pub fn kinds<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { kinds: kinds.into_iter().map(Into::into).collect() }
    }

    /// `true` if an entity of `kind` passes the filter.
    pub fn accepts(&self, kind: &str) -> bool {
        self.kinds.is_empty() || self.kinds.iter().any(|k| k == kind)
    }
}

/// One entity found by a world query.
#[derive(Debug, Clone, PartialEq)]
pub struct Sighting {
    pub id:       AgentId,
    pub kind:     String,
    pub position: Vec3,
    pub distance: f32,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Capabilities the host engine grants to an agent's tasks.
///
/// One value per agent per tick.  Implementations must only enqueue work;
/// requests take effect on the host's own schedule (typically before the
/// next tick).
pub trait AgentHost {
    /// Current absolute game time.
    fn now(&self) -> GameTime;

    /// The agent's current position.
    fn position(&self) -> Vec3;

    /// Start walking towards `request.target`, replacing any current move.
    fn request_move(&mut self, request: MoveRequest) -> MoveTicket;

    /// Poll the progress of a previously issued move.
    fn move_status(&self, ticket: MoveTicket) -> MoveStatus;

    /// Halt any current move.
    fn stop_move(&mut self);

    fn request_animation(&mut self, code: &str, speed: f32);

    fn stop_animation(&mut self, code: &str);

    fn request_sound(&mut self, sound: &SoundRequest);

    /// Nearest entity within `range` that passes `filter`, excluding the
    /// agent itself.
    fn nearest_entity(&self, filter: &EntityFilter, range: f32) -> Option<Sighting>;

    /// Current position of `id`, or `None` if it no longer exists.
    fn entity_position(&self, id: AgentId) -> Option<Vec3>;
}

// ── NullHost ──────────────────────────────────────────────────────────────────

/// An [`AgentHost`] that ignores every request and sees an empty world.
///
/// Moves are reported as [`MoveStatus::Stopped`] immediately.  Useful as a
/// placeholder in tests and for agents whose tasks only keep time.
#[derive(Debug, Default, Clone)]
pub struct NullHost {
    pub now:      GameTime,
    pub position: Vec3,
}

impl NullHost {
    pub fn at(now: GameTime) -> Self {
        Self { now, position: Vec3::ZERO }
    }
}

impl AgentHost for NullHost {
    fn now(&self) -> GameTime {
        self.now
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn request_move(&mut self, _request: MoveRequest) -> MoveTicket {
        MoveTicket(0)
    }

    fn move_status(&self, _ticket: MoveTicket) -> MoveStatus {
        MoveStatus::Stopped
    }

    fn stop_move(&mut self) {}

    fn request_animation(&mut self, _code: &str, _speed: f32) {}

    fn stop_animation(&mut self, _code: &str) {}

    fn request_sound(&mut self, _sound: &SoundRequest) {}

    fn nearest_entity(&self, _filter: &EntityFilter, _range: f32) -> Option<Sighting> {
        None
    }

    fn entity_position(&self, _id: AgentId) -> Option<Vec3> {
        None
    }
}
