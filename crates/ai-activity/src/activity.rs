//! Activity definitions: what gates an activity and what it does.

use std::collections::HashSet;

use ai_core::{AgentRng, GameTime, Vec3};
use ai_sched::Severity;
use ai_task::{AgentHost, EntityFilter, SoundRequest};
use serde::Deserialize;

/// One scripted activity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Activity {
    pub code:             String,
    /// Higher wins when several activities are eligible.
    #[serde(default)]
    pub priority:         f32,
    /// How hard the autonomous scheduler is suspended while this runs.
    #[serde(default = "soft")]
    pub severity:         Severity,
    /// All must hold for the activity to start.
    #[serde(default)]
    pub conditions:       Vec<Condition>,
    pub actions:          Vec<Action>,
    /// Seconds before the activity may run again, counted from its end.
    #[serde(default)]
    pub cooldown_secs:    f32,
    /// Abort as soon as any condition stops holding.
    #[serde(default)]
    pub abort_when_false: bool,
}

fn soft() -> Severity {
    Severity::Soft
}

// ── Actions ───────────────────────────────────────────────────────────────────

/// A single step of an activity.  Steps run strictly in order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Do nothing for `secs`.
    Wait { secs: f32 },

    /// Walk to a fixed point.  Fails if the move gets stuck, is stopped by
    /// someone else, or takes longer than `timeoutSecs`.
    #[serde(rename_all = "camelCase")]
    GoTo {
        target:       Vec3,
        #[serde(default = "walk_speed")]
        speed:        f32,
        #[serde(default = "tolerance")]
        tolerance:    f32,
        #[serde(default)]
        timeout_secs: Option<f32>,
    },

    /// Hold an animation for `secs`.
    PlayAnimation {
        code:  String,
        #[serde(default = "one")]
        speed: f32,
        secs:  f32,
    },

    /// Emit a sound; completes immediately.
    PlaySound(SoundRequest),
}

fn walk_speed() -> f32 { 1.5 }
fn tolerance() -> f32 { 0.5 }
fn one() -> f32 { 1.0 }

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Wait { .. } => "wait",
            Action::GoTo { .. } => "goTo",
            Action::PlayAnimation { .. } => "playAnimation",
            Action::PlaySound(_) => "playSound",
        }
    }
}

// ── Conditions ────────────────────────────────────────────────────────────────

/// A start gate.  Conditions are evaluated in list order and short-circuit,
/// so put `chance` last if it should only be rolled once the rest pass.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Condition {
    /// A named flag set by the host through `ActivitySystem::set_flag`.
    Flag {
        name:  String,
        #[serde(default = "yes")]
        value: bool,
    },

    /// Rolled on every evaluation.
    Chance { p: f64 },

    /// Hour of the in-game day in `[fromHour, toHour)`.  Wraps past midnight
    /// when `fromHour > toHour`.
    #[serde(rename_all = "camelCase")]
    TimeOfDay { from_hour: f32, to_hour: f32 },

    /// Some entity of the given kinds (any kind if empty) within `range`.
    #[serde(rename_all = "camelCase")]
    EntityNear {
        #[serde(default)]
        entity_kinds: Vec<String>,
        range:        f32,
    },
}

fn yes() -> bool {
    true
}

/// What a condition may look at.
pub struct ConditionEnv<'a> {
    pub now:        GameTime,
    pub day_length: f64,
    pub flags:      &'a HashSet<String>,
    pub host:       &'a dyn AgentHost,
}

impl ConditionEnv<'_> {
    /// Hour of the in-game day, `0.0..24.0`.
    pub fn hour(&self) -> f32 {
        if self.day_length <= 0.0 {
            return 0.0;
        }
        (self.now.0.rem_euclid(self.day_length) / self.day_length * 24.0) as f32
    }
}

impl Condition {
    pub fn holds(&self, env: &ConditionEnv<'_>, rng: &mut AgentRng) -> bool {
        match self {
            Condition::Flag { name, value } => env.flags.contains(name) == *value,
            Condition::Chance { p } => rng.gen_bool(*p),
            Condition::TimeOfDay { from_hour, to_hour } => {
                let h = env.hour();
                if from_hour <= to_hour {
                    *from_hour <= h && h < *to_hour
                } else {
                    h >= *from_hour || h < *to_hour
                }
            }
            Condition::EntityNear { entity_kinds, range } => {
                let filter = EntityFilter { kinds: entity_kinds.clone() };
                env.host.nearest_entity(&filter, *range).is_some()
            }
        }
    }
}

/// `true` if every condition holds (vacuously for an empty list).
pub fn all_hold(conditions: &[Condition], env: &ConditionEnv<'_>, rng: &mut AgentRng) -> bool {
    conditions.iter().all(|c| c.holds(env, rng))
}
