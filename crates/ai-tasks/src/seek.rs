//! `seekentity`: walk up to the nearest entity of a kind.

use ai_core::Vec3;
use ai_task::{
    Cooldown, EntityFilter, MoveRequest, MoveStatus, MoveTicket, Sighting, StartSound, Targeting,
    Task, TaskContext, TaskMeta, TaskResult,
};
use serde::Deserialize;

use crate::common::{AnimationConfig, CooldownConfig};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SeekConfig {
    pub entity_kinds:    Vec<String>,
    pub seeking_range:   f32,
    pub search_interval: f32,
    /// Close enough: the run ends once within this distance.
    pub reach_distance:  f32,
    pub move_speed:      f32,
    pub max_duration:    f32,
    /// Re-issue the move when the target has drifted this far from the
    /// point being walked to.
    pub repath_distance: f32,
    pub cooldown:        CooldownConfig,
    pub animation:       Option<AnimationConfig>,
    pub sound:           Option<StartSound>,
}

impl Default for SeekConfig {
    fn default() -> Self {
        Self {
            entity_kinds:    Vec::new(),
            seeking_range:   16.0,
            search_interval: 1.0,
            reach_distance:  1.5,
            move_speed:      2.0,
            max_duration:    20.0,
            repath_distance: 2.0,
            cooldown:        CooldownConfig::default(),
            animation:       Some(AnimationConfig::new("walk")),
            sound:           None,
        }
    }
}

pub struct SeekEntity {
    meta:      TaskMeta,
    config:    SeekConfig,
    targeting: Targeting,
    cooldown:  Cooldown,

    heading:   Vec3,
    ticket:    Option<MoveTicket>,
    active:    f32,
    reached:   bool,
}

impl SeekEntity {
    pub fn new(meta: TaskMeta, config: SeekConfig) -> Self {
        Self {
            meta,
            targeting: Targeting::new(
                EntityFilter { kinds: config.entity_kinds.clone() },
                config.seeking_range,
                config.search_interval,
            ),
            cooldown:  config.cooldown.build(),
            config,
            heading:   Vec3::ZERO,
            ticket:    None,
            active:    0.0,
            reached:   false,
        }
    }

    pub fn target(&self) -> Option<&Sighting> {
        self.targeting.target()
    }

    /// `true` if the last run ended next to its target.
    pub fn reached(&self) -> bool {
        self.reached
    }

    fn walk_to(&mut self, ctx: &mut TaskContext<'_>, target: Vec3) {
        self.heading = target;
        self.ticket = Some(ctx.host.request_move(MoveRequest {
            target,
            speed:             self.config.move_speed,
            arrival_tolerance: self.config.reach_distance,
        }));
    }
}

impl Task for SeekEntity {
    fn meta(&self) -> &TaskMeta {
        &self.meta
    }

    fn should_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        if let Some(sound) = &mut self.config.sound {
            sound.on_evaluate();
        }
        if !self.cooldown.is_ready(ctx.now) {
            return Ok(false);
        }
        let reach = self.config.reach_distance;
        Ok(self.targeting.acquire(ctx).is_some_and(|t| t.distance > reach))
    }

    fn start_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        self.active = 0.0;
        self.reached = false;
        if let Some(pos) = self.targeting.target().map(|t| t.position) {
            self.walk_to(ctx, pos);
        }
        if let Some(anim) = &self.config.animation {
            ctx.host.request_animation(&anim.code, anim.speed);
        }
        if let Some(sound) = &mut self.config.sound {
            sound.try_play(ctx.rng, ctx.host);
        }
        Ok(())
    }

    fn continue_execute(&mut self, dt: f32, ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        self.active += dt;
        if self.active >= self.config.max_duration {
            return Ok(false);
        }

        let Some(target) = self.targeting.refresh(ctx) else { return Ok(false) };
        if ctx.position().distance(target) <= self.config.reach_distance {
            self.reached = true;
            return Ok(false);
        }

        let status = self.ticket.map(|t| ctx.host.move_status(t));
        if status == Some(MoveStatus::Stuck) {
            return Ok(false);
        }
        if status != Some(MoveStatus::Active)
            || self.heading.distance(target) > self.config.repath_distance
        {
            self.walk_to(ctx, target);
        }
        Ok(true)
    }

    fn finish_execute(&mut self, cancelled: bool, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        ctx.host.stop_move();
        self.ticket = None;
        if let Some(anim) = &self.config.animation {
            ctx.host.stop_animation(&anim.code);
        }
        self.targeting.clear();
        self.cooldown.on_finish(cancelled, ctx.now, ctx.rng);
        Ok(())
    }
}
