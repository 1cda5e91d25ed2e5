//! Config pieces and geometry shared by the stock tasks.

use std::f32::consts::TAU;

use ai_core::{AgentRng, Vec3};
use ai_task::Cooldown;
use serde::Deserialize;

/// `"cooldown": { "minSecs": 2, "maxSecs": 5, "onCancel": false }`
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CooldownConfig {
    pub min_secs:  f32,
    pub max_secs:  f32,
    pub on_cancel: bool,
}

impl CooldownConfig {
    pub fn build(&self) -> Cooldown {
        let cd = Cooldown::new(self.min_secs, self.max_secs);
        if self.on_cancel { cd.also_on_cancel() } else { cd }
    }
}

/// `"animation": { "code": "walk", "speed": 1.2 }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    pub code: String,
    #[serde(default = "one")]
    pub speed: f32,
}

impl AnimationConfig {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into(), speed: 1.0 }
    }
}

pub(crate) fn one() -> f32 {
    1.0
}

/// A point on the horizontal ring `[min_dist, max_dist]` around `origin`.
pub fn random_point_around(origin: Vec3, min_dist: f32, max_dist: f32, rng: &mut AgentRng) -> Vec3 {
    let angle = rng.range_f32(0.0, TAU);
    let dist = rng.range_f32(min_dist, max_dist);
    origin + Vec3::new(angle.cos() * dist, 0.0, angle.sin() * dist)
}

/// The point `distance` away from `threat`, straight through `from`.
///
/// When `from` and `threat` coincide, a random horizontal direction is used.
pub fn point_away_from(from: Vec3, threat: Vec3, distance: f32, rng: &mut AgentRng) -> Vec3 {
    let mut away = Vec3::new(from.x - threat.x, 0.0, from.z - threat.z).normalized();
    if away == Vec3::ZERO {
        let angle = rng.range_f32(0.0, TAU);
        away = Vec3::new(angle.cos(), 0.0, angle.sin());
    }
    from + away * distance
}
