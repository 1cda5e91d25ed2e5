//! `wander`: walk to a random nearby point.

use ai_core::Vec3;
use ai_task::{
    Cooldown, MoveRequest, MoveStatus, MoveTicket, StartSound, Task, TaskContext, TaskMeta,
    TaskResult,
};
use serde::Deserialize;
use tracing::trace;

use crate::common::{AnimationConfig, CooldownConfig, one, random_point_around};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct WanderConfig {
    /// World units per second.
    pub move_speed:        f32,
    pub min_distance:      f32,
    /// Targets are picked within this radius of the current position.
    pub range:             f32,
    pub arrival_tolerance: f32,
    /// Give up after this many seconds even if still walking.
    pub max_duration:      f32,
    pub chance:            f32,
    pub cooldown:          CooldownConfig,
    pub animation:         Option<AnimationConfig>,
    pub sound:             Option<StartSound>,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            move_speed:        1.5,
            min_distance:      2.0,
            range:             8.0,
            arrival_tolerance: 0.5,
            max_duration:      15.0,
            chance:            one(),
            cooldown:          CooldownConfig::default(),
            animation:         Some(AnimationConfig::new("walk")),
            sound:             None,
        }
    }
}

pub struct Wander {
    meta:     TaskMeta,
    config:   WanderConfig,
    cooldown: Cooldown,

    target:   Vec3,
    ticket:   Option<MoveTicket>,
    active:   f32,
    arrived:  bool,
}

impl Wander {
    pub fn new(meta: TaskMeta, config: WanderConfig) -> Self {
        Self {
            meta,
            cooldown: config.cooldown.build(),
            config,
            target:   Vec3::ZERO,
            ticket:   None,
            active:   0.0,
            arrived:  false,
        }
    }

    /// Destination of the current (or last) run.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn arrived(&self) -> bool {
        self.arrived
    }
}

impl Task for Wander {
    fn meta(&self) -> &TaskMeta {
        &self.meta
    }

    fn should_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        if let Some(sound) = &mut self.config.sound {
            sound.on_evaluate();
        }
        Ok(self.cooldown.is_ready(ctx.now) && ctx.rng.gen_bool(self.config.chance as f64))
    }

    fn start_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        self.active = 0.0;
        self.arrived = false;
        let c = &self.config;
        self.target = random_point_around(ctx.position(), c.min_distance, c.range, ctx.rng);
        self.ticket = Some(ctx.host.request_move(MoveRequest {
            target:            self.target,
            speed:             c.move_speed,
            arrival_tolerance: c.arrival_tolerance,
        }));
        if let Some(anim) = &c.animation {
            ctx.host.request_animation(&anim.code, anim.speed);
        }
        if let Some(sound) = &mut self.config.sound {
            sound.try_play(ctx.rng, ctx.host);
        }
        Ok(())
    }

    fn continue_execute(&mut self, dt: f32, ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        self.active += dt;
        let Some(ticket) = self.ticket else { return Ok(false) };

        match ctx.host.move_status(ticket) {
            MoveStatus::Active => Ok(self.active < self.config.max_duration),
            MoveStatus::Arrived => {
                self.arrived = true;
                Ok(false)
            }
            status => {
                trace!(agent = %ctx.agent, ?status, "wander move ended early");
                Ok(false)
            }
        }
    }

    fn finish_execute(&mut self, cancelled: bool, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        if !self.arrived {
            ctx.host.stop_move();
        }
        self.ticket = None;
        if let Some(anim) = &self.config.animation {
            ctx.host.stop_animation(&anim.code);
        }
        self.cooldown.on_finish(cancelled, ctx.now, ctx.rng);
        Ok(())
    }
}
