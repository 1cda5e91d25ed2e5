//! `fleeentity`: run from a threatening entity until it is far enough away.
//!
//! A threat is either found by the periodic search (`entityKinds` within
//! `seekingRange`) or handed over by `on_hurt` (the attacker).  While
//! fleeing, the task re-plans a point directly away from the threat each
//! time the previous move ends, until the threat is `safeDistance` away,
//! gone, or `maxDuration` has passed.

use ai_core::{AgentId, Vec3};
use ai_task::{
    Cooldown, DamageSource, EntityFilter, MoveRequest, MoveStatus, MoveTicket, Sighting,
    StartSound, Targeting, Task, TaskContext, TaskMeta, TaskResult,
};
use serde::Deserialize;
use tracing::trace;

use crate::common::{AnimationConfig, CooldownConfig, point_away_from};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FleeConfig {
    pub entity_kinds:    Vec<String>,
    pub seeking_range:   f32,
    pub search_interval: f32,
    /// Stop fleeing once at least this far from the threat.
    pub safe_distance:   f32,
    pub move_speed:      f32,
    pub max_duration:    f32,
    /// Flee from whoever hurt the agent, regardless of kind.
    pub flee_on_hurt:    bool,
    pub cooldown:        CooldownConfig,
    pub animation:       Option<AnimationConfig>,
    pub sound:           Option<StartSound>,
}

impl Default for FleeConfig {
    fn default() -> Self {
        Self {
            entity_kinds:    Vec::new(),
            seeking_range:   10.0,
            search_interval: 0.5,
            safe_distance:   15.0,
            move_speed:      3.0,
            max_duration:    10.0,
            flee_on_hurt:    true,
            cooldown:        CooldownConfig::default(),
            animation:       Some(AnimationConfig::new("run")),
            sound:           None,
        }
    }
}

pub struct FleeEntity {
    meta:      TaskMeta,
    config:    FleeConfig,
    targeting: Targeting,
    cooldown:  Cooldown,

    attacker:  Option<(AgentId, Option<Vec3>)>,
    ticket:    Option<MoveTicket>,
    active:    f32,
}

impl FleeEntity {
    pub fn new(meta: TaskMeta, config: FleeConfig) -> Self {
        Self {
            meta,
            targeting: Targeting::new(
                EntityFilter { kinds: config.entity_kinds.clone() },
                config.seeking_range,
                config.search_interval,
            ),
            cooldown:  config.cooldown.build(),
            config,
            attacker:  None,
            ticket:    None,
            active:    0.0,
        }
    }

    /// The entity being fled from.
    pub fn threat(&self) -> Option<&Sighting> {
        self.targeting.target()
    }

    fn flee_step(&mut self, ctx: &mut TaskContext<'_>, threat: Vec3) {
        let me = ctx.position();
        let dest = point_away_from(me, threat, self.config.safe_distance, ctx.rng);
        self.ticket = Some(ctx.host.request_move(MoveRequest {
            target:            dest,
            speed:             self.config.move_speed,
            arrival_tolerance: 1.0,
        }));
    }

    /// Turn a pending attacker into the current target.  Returns `false` if
    /// the attacker no longer exists.
    fn adopt_attacker(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        let Some((id, hint)) = self.attacker.take() else { return false };
        let Some(position) = ctx.host.entity_position(id).or(hint) else { return false };
        self.targeting.set(Sighting {
            id,
            kind: "attacker".to_owned(),
            position,
            distance: ctx.position().distance(position),
        });
        true
    }
}

impl Task for FleeEntity {
    fn meta(&self) -> &TaskMeta {
        &self.meta
    }

    fn should_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        if let Some(sound) = &mut self.config.sound {
            sound.on_evaluate();
        }
        if self.adopt_attacker(ctx) {
            return Ok(true);
        }
        if !self.cooldown.is_ready(ctx.now) {
            return Ok(false);
        }
        Ok(self.targeting.acquire(ctx).is_some())
    }

    fn start_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        self.active = 0.0;
        if let Some(threat) = self.targeting.target().map(|t| t.position) {
            trace!(agent = %ctx.agent, ?threat, "fleeing");
            self.flee_step(ctx, threat);
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

        // Hit mid-flight: the attacker becomes the threat.
        if self.attacker.is_some() {
            self.adopt_attacker(ctx);
        }
        let Some(threat) = self.targeting.refresh(ctx) else { return Ok(false) };
        if ctx.position().distance(threat) >= self.config.safe_distance {
            return Ok(false);
        }

        match self.ticket.map(|t| ctx.host.move_status(t)) {
            Some(MoveStatus::Active) => {}
            Some(MoveStatus::Stuck) => return Ok(false),
            // Arrived, superseded, or never issued: keep running.
            _ => self.flee_step(ctx, threat),
        }
        Ok(true)
    }

    fn finish_execute(&mut self, cancelled: bool, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        ctx.host.stop_move();
        self.ticket = None;
        self.attacker = None;
        if let Some(anim) = &self.config.animation {
            ctx.host.stop_animation(&anim.code);
        }
        self.targeting.clear();
        self.cooldown.on_finish(cancelled, ctx.now, ctx.rng);
        Ok(())
    }

    fn on_hurt(&mut self, source: &DamageSource, _damage: f32) {
        if self.config.flee_on_hurt {
            if let Some(id) = source.attacker {
                self.attacker = Some((id, source.position));
            }
        }
    }
}
