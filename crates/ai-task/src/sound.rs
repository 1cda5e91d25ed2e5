//! Naturalistic start sounds.
//!
//! # Chance model
//!
//! ```text
//! every evaluation:  chance = min(1.01, chance + 0.002)
//! on start:          if rand() <= chance { play; chance = max(0.025, chance - 0.2) }
//! ```
//!
//! The chance climbs slowly while the task is merely considered and drops
//! sharply each time the sound plays, so a frequently started task only
//! vocalises now and then without any per-task tuning.

use ai_core::AgentRng;
use serde::Deserialize;

use crate::{AgentHost, SoundRequest};

const CHANCE_CAP:       f32 = 1.01;
const CHANCE_FLOOR:     f32 = 0.025;
const CHANCE_INCREMENT: f32 = 0.002;
const CHANCE_DROP:      f32 = 0.2;

/// The decaying probability gate for a task's start sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundGate {
    chance: f32,
}

impl Default for SoundGate {
    /// Starts at the cap so the first start always plays.
    fn default() -> Self {
        Self { chance: CHANCE_CAP }
    }
}

impl SoundGate {
    pub fn with_chance(chance: f32) -> Self {
        Self { chance: chance.clamp(CHANCE_FLOOR, CHANCE_CAP) }
    }

    #[inline]
    pub fn chance(&self) -> f32 {
        self.chance
    }

    /// Record one evaluation of the owning task.
    #[inline]
    pub fn on_evaluate(&mut self) {
        self.chance = (self.chance + CHANCE_INCREMENT).min(CHANCE_CAP);
    }

    /// Roll the gate.  On success the chance drops towards the floor.
    pub fn roll(&mut self, rng: &mut AgentRng) -> bool {
        let roll: f32 = rng.random();
        if roll <= self.chance {
            self.chance = (self.chance - CHANCE_DROP).max(CHANCE_FLOOR);
            true
        } else {
            false
        }
    }
}

/// A configured start sound plus its gate.
///
/// Deserialises from the `sound` object of a task config, e.g.
/// `{ "location": "creature/sheep/baa", "range": 16 }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartSound {
    #[serde(flatten)]
    pub request: SoundRequest,
    #[serde(skip)]
    pub gate: SoundGate,
}

impl StartSound {
    pub fn new(request: SoundRequest) -> Self {
        Self { request, gate: SoundGate::default() }
    }

    /// Call from `should_execute`.
    #[inline]
    pub fn on_evaluate(&mut self) {
        self.gate.on_evaluate();
    }

    /// Call from `start_execute`.  Returns `true` if the sound played.
    pub fn try_play(&mut self, rng: &mut AgentRng, host: &mut dyn AgentHost) -> bool {
        if self.gate.roll(rng) {
            host.request_sound(&self.request);
            true
        } else {
            false
        }
    }
}
