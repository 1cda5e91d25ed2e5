//! Payloads the host fans out to every task of an agent.

use ai_core::{AgentId, Vec3};

/// Data attached to a `notify(key, data)` call.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NotifyData {
    #[default]
    None,
    Number(f64),
    Text(String),
    Entity(AgentId),
    Position(Vec3),
}

/// Where a hit came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DamageSource {
    /// Damage kind code, e.g. `"attack"`, `"fall"`, `"fire"`.
    pub kind: String,
    /// The entity that caused the damage, if any.
    pub attacker: Option<AgentId>,
    /// Where the damage originated, if known.
    pub position: Option<Vec3>,
}

impl DamageSource {
    pub fn attack(attacker: AgentId, position: Vec3) -> Self {
        Self {
            kind:     "attack".to_owned(),
            attacker: Some(attacker),
            position: Some(position),
        }
    }
}
