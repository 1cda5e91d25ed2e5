//! Plain data row types written by output backends.

use ai_core::{AgentId, GameTime};
use ai_sched::LifecycleEvent;
use ai_sim::{AgentSnapshot, TickSummary};

/// One lifecycle event or emitted sound.
///
/// Columns that do not apply to the row's `kind` are left empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub tick:      u64,
    pub time_secs: f64,
    pub agent_id:  u32,
    /// `started`, `finished`, `faulted`, `paused`, `resumed`, or `sound`.
    pub kind:      &'static str,
    pub task:      Option<String>,
    pub slot:      Option<usize>,
    pub cancelled: Option<bool>,
    pub phase:     Option<&'static str>,
    pub severity:  Option<&'static str>,
    /// Fault message, or the sound location.
    pub detail:    Option<String>,
}

impl EventRow {
    fn base(tick: u64, at: GameTime, agent: AgentId, kind: &'static str) -> Self {
        Self {
            tick,
            time_secs: at.0,
            agent_id: agent.0,
            kind,
            task: None,
            slot: None,
            cancelled: None,
            phase: None,
            severity: None,
            detail: None,
        }
    }

    pub fn from_event(tick: u64, agent: AgentId, event: &LifecycleEvent) -> Self {
        let mut row = Self::base(tick, event.at(), agent, event.kind());
        row.task = event.code().map(str::to_owned);
        match event {
            LifecycleEvent::Started { slot, .. } => row.slot = Some(*slot),
            LifecycleEvent::Finished { slot, cancelled, .. } => {
                row.slot = Some(*slot);
                row.cancelled = Some(*cancelled);
            }
            LifecycleEvent::Faulted { slot, phase, error, .. } => {
                row.slot = Some(*slot);
                row.phase = Some(phase.as_str());
                row.detail = Some(error.clone());
            }
            LifecycleEvent::Paused { severity, .. } => row.severity = Some(severity.as_str()),
            LifecycleEvent::Resumed { .. } => {}
        }
        row
    }

    pub fn sound(tick: u64, at: GameTime, agent: AgentId, location: &str) -> Self {
        Self { detail: Some(location.to_owned()), ..Self::base(tick, at, agent, "sound") }
    }
}

/// Counts for one world tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:      u64,
    pub time_secs: f64,
    pub agents:    u64,
    pub running:   u64,
    pub paused:    u64,
    pub moving:    u64,
    pub events:    u64,
}

impl From<&TickSummary> for TickSummaryRow {
    fn from(s: &TickSummary) -> Self {
        Self {
            tick:      s.tick,
            time_secs: s.at.0,
            agents:    s.agents as u64,
            running:   s.running as u64,
            paused:    s.paused as u64,
            moving:    s.moving as u64,
            events:    s.events as u64,
        }
    }
}

/// One agent's position and scheduler state at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub tick:     u64,
    pub kind:     String,
    pub x:        f32,
    pub y:        f32,
    pub z:        f32,
    pub severity: &'static str,
    /// Running task codes joined with `;`.
    pub running:  String,
    pub activity: Option<String>,
}

impl AgentSnapshotRow {
    pub fn from_snapshot(tick: u64, s: &AgentSnapshot) -> Self {
        Self {
            agent_id: s.id.0,
            tick,
            kind:     s.kind.clone(),
            x:        s.position.x,
            y:        s.position.y,
            z:        s.position.z,
            severity: s.severity.as_str(),
            running:  s.running.join(";"),
            activity: s.activity.clone(),
        }
    }
}
