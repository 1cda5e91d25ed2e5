//! `idle`: stand still and play an animation for a while.

use ai_task::{Cooldown, DamageSource, StartSound, Task, TaskContext, TaskMeta, TaskResult};
use serde::Deserialize;

use crate::common::{AnimationConfig, CooldownConfig, one};

/// ```json
/// { "animation": { "code": "graze" }, "minDuration": 4, "maxDuration": 9,
///   "chance": 0.3, "cooldown": { "minSecs": 5, "maxSecs": 10 } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct IdleConfig {
    pub animation:    Option<AnimationConfig>,
    pub min_duration: f32,
    pub max_duration: f32,
    /// Probability per evaluation that the task wants to start.
    pub chance:       f32,
    pub cooldown:     CooldownConfig,
    pub sound:        Option<StartSound>,
    /// Abort the idle when the agent is hurt.
    pub stop_on_hurt: bool,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            animation:    None,
            min_duration: 2.0,
            max_duration: 6.0,
            chance:       one(),
            cooldown:     CooldownConfig::default(),
            sound:        None,
            stop_on_hurt: true,
        }
    }
}

pub struct Idle {
    meta:         TaskMeta,
    animation:    Option<AnimationConfig>,
    min:          f32,
    max:          f32,
    chance:       f32,
    cooldown:     Cooldown,
    sound:        Option<StartSound>,
    stop_on_hurt: bool,

    duration: f32,
    active:   f32,
    hurt:     bool,
}

impl Idle {
    pub fn new(meta: TaskMeta, config: IdleConfig) -> Self {
        Self {
            meta,
            cooldown:     config.cooldown.build(),
            animation:    config.animation,
            min:          config.min_duration,
            max:          config.max_duration,
            chance:       config.chance,
            sound:        config.sound,
            stop_on_hurt: config.stop_on_hurt,
            duration:     0.0,
            active:       0.0,
            hurt:         false,
        }
    }

    /// Seconds the current (or last) run has lasted.
    pub fn seconds_active(&self) -> f32 {
        self.active
    }
}

impl Task for Idle {
    fn meta(&self) -> &TaskMeta {
        &self.meta
    }

    fn should_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        if let Some(sound) = &mut self.sound {
            sound.on_evaluate();
        }
        Ok(self.cooldown.is_ready(ctx.now) && ctx.rng.gen_bool(self.chance as f64))
    }

    fn start_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        self.active = 0.0;
        self.hurt = false;
        self.duration = ctx.rng.range_f32(self.min, self.max);
        if let Some(anim) = &self.animation {
            ctx.host.request_animation(&anim.code, anim.speed);
        }
        if let Some(sound) = &mut self.sound {
            sound.try_play(ctx.rng, ctx.host);
        }
        Ok(())
    }

    fn continue_execute(&mut self, dt: f32, _ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        self.active += dt;
        Ok(!self.hurt && self.active < self.duration)
    }

    fn finish_execute(&mut self, cancelled: bool, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        if let Some(anim) = &self.animation {
            ctx.host.stop_animation(&anim.code);
        }
        self.cooldown.on_finish(cancelled, ctx.now, ctx.rng);
        Ok(())
    }

    fn on_hurt(&mut self, _source: &DamageSource, _damage: f32) {
        if self.stop_on_hurt {
            self.hurt = true;
        }
    }
}
