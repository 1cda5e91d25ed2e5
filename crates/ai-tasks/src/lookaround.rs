//! `lookaround`: watch a nearby entity for a few seconds.
//!
//! Usually configured on its own slot so the agent can look while it walks
//! or idles.

use ai_task::{Cooldown, EntityFilter, Targeting, Task, TaskContext, TaskMeta, TaskResult};
use serde::Deserialize;

use crate::common::{AnimationConfig, CooldownConfig};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LookAroundConfig {
    /// Kinds worth looking at; empty means anything.
    pub entity_kinds:    Vec<String>,
    pub seeking_range:   f32,
    pub search_interval: f32,
    pub min_duration:    f32,
    pub max_duration:    f32,
    pub chance:          f32,
    pub cooldown:        CooldownConfig,
    pub animation:       Option<AnimationConfig>,
}

impl Default for LookAroundConfig {
    fn default() -> Self {
        Self {
            entity_kinds:    Vec::new(),
            seeking_range:   6.0,
            search_interval: 1.0,
            min_duration:    1.5,
            max_duration:    4.0,
            chance:          0.2,
            cooldown:        CooldownConfig { min_secs: 2.0, max_secs: 6.0, on_cancel: false },
            animation:       None,
        }
    }
}

pub struct LookAround {
    meta:      TaskMeta,
    targeting: Targeting,
    cooldown:  Cooldown,
    min:       f32,
    max:       f32,
    chance:    f32,
    animation: Option<AnimationConfig>,

    duration:  f32,
    active:    f32,
}

impl LookAround {
    pub fn new(meta: TaskMeta, config: LookAroundConfig) -> Self {
        Self {
            meta,
            targeting: Targeting::new(
                EntityFilter { kinds: config.entity_kinds },
                config.seeking_range,
                config.search_interval,
            ),
            cooldown:  config.cooldown.build(),
            min:       config.min_duration,
            max:       config.max_duration,
            chance:    config.chance,
            animation: config.animation,
            duration:  0.0,
            active:    0.0,
        }
    }

    pub fn targeting(&self) -> &Targeting {
        &self.targeting
    }
}

impl Task for LookAround {
    fn meta(&self) -> &TaskMeta {
        &self.meta
    }

    fn should_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        if !self.cooldown.is_ready(ctx.now) {
            return Ok(false);
        }
        if self.targeting.acquire(ctx).is_none() {
            return Ok(false);
        }
        Ok(ctx.rng.gen_bool(self.chance as f64))
    }

    fn start_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        self.active = 0.0;
        self.duration = ctx.rng.range_f32(self.min, self.max);
        if let Some(anim) = &self.animation {
            ctx.host.request_animation(&anim.code, anim.speed);
        }
        Ok(())
    }

    fn continue_execute(&mut self, dt: f32, ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        self.active += dt;
        if self.active >= self.duration {
            return Ok(false);
        }
        // Stop once the target is gone or has wandered out of range.
        self.targeting.refresh(ctx);
        Ok(self
            .targeting
            .distance()
            .is_some_and(|d| d <= self.targeting.seek_range))
    }

    fn finish_execute(&mut self, cancelled: bool, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        if let Some(anim) = &self.animation {
            ctx.host.stop_animation(&anim.code);
        }
        self.targeting.clear();
        self.cooldown.on_finish(cancelled, ctx.now, ctx.rng);
        Ok(())
    }
}
