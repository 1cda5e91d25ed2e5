//! The `World` struct and its tick loop.

use ai_activity::ActivitySystem;
use ai_core::{AgentId, GameTime, SimClock, SimConfig, Vec3};
use ai_sched::{LifecycleEvent, Severity, TaskManager};
use ai_task::{DamageSource, NotifyData, SoundRequest};
use tracing::{debug, info};

use crate::host::{AgentView, Presentation, Snapshot};
use crate::motion::MotionState;
use crate::{AgentSnapshot, SimError, SimResult, TickSummary, WorldObserver};

/// An agent's decision-making: its scheduler and optional activity driver.
pub struct Brain {
    pub manager:    TaskManager,
    pub activities: Option<ActivitySystem>,
}

pub(crate) struct Entity {
    pub(crate) motion:  MotionState,
    pub(crate) present: Presentation,
    pub(crate) brain:   Option<Brain>,
    pub(crate) alive:   bool,
}

/// What one agent produced during the agent phase.
struct AgentOutput {
    id:     AgentId,
    events: Vec<LifecycleEvent>,
    sounds: Vec<SoundRequest>,
}

// ── World ─────────────────────────────────────────────────────────────────────

/// A flat sandbox hosting many scheduled agents and inert props.
///
/// Each tick runs four phases:
///
/// 1. **Snapshot**: record every entity's position.
/// 2. **Agents** (optionally parallel with the `parallel` feature): tick
///    each agent's activity driver, then its task manager, against an
///    [`AgentView`] reading the snapshot.
/// 3. **Movement**: advance every move in progress by one step.
/// 4. **Report** (sequential, ascending `AgentId`): lifecycle events and
///    sounds go to the observer, then the tick summary and, at snapshot
///    intervals, a full snapshot.
///
/// Create via [`WorldBuilder`][crate::WorldBuilder].
pub struct World {
    pub config: SimConfig,
    pub clock:  SimClock,

    pub(crate) bounds:    Option<f32>,
    pub(crate) kinds:     Vec<String>,
    pub(crate) entities:  Vec<Entity>,
    /// Positions as of the last snapshot; `None` once despawned.
    pub(crate) positions: Vec<Option<Vec3>>,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl World {
    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current tick to `config.total_ticks`.
    pub fn run<O: WorldObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let start = self.clock.tick;
        info!(from = start, to = self.config.total_ticks, dt = self.config.dt_secs, "world run started");
        let mut events = 0;
        while self.clock.tick < self.config.total_ticks {
            events += self.process_tick(observer).events;
        }
        observer.on_end(&self.clock);
        info!(ticks = self.clock.tick - start, events, clock = %self.clock, "world run finished");
        Ok(())
    }

    /// Run exactly `n` ticks, ignoring `total_ticks`.  Does not call
    /// `on_end`.
    pub fn run_ticks<O: WorldObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.process_tick(observer);
        }
        Ok(())
    }

    fn process_tick<O: WorldObserver>(&mut self, observer: &mut O) -> TickSummary {
        let dt = self.config.dt_secs;
        self.clock.advance(dt);
        let now = self.clock.now;
        observer.on_tick_start(&self.clock);

        // ── Phase 1: snapshot ─────────────────────────────────────────────
        self.refresh_snapshot();

        // ── Phase 2: agents ───────────────────────────────────────────────
        let outputs = self.agent_phase(now, dt);

        // ── Phase 3: movement ─────────────────────────────────────────────
        let mut moving = 0;
        for entity in self.entities.iter_mut().filter(|e| e.alive) {
            entity.motion.advance(dt);
            if entity.motion.is_moving() {
                moving += 1;
            }
        }

        // ── Phase 4: report ───────────────────────────────────────────────
        let mut summary = TickSummary { tick: self.clock.tick, at: now, moving, ..TickSummary::default() };
        for out in &outputs {
            for event in &out.events {
                observer.on_event(out.id, event);
            }
            for sound in &out.sounds {
                observer.on_sound(out.id, now, sound);
            }
            summary.events += out.events.len();
        }
        for brain in self.entities.iter().filter(|e| e.alive).filter_map(|e| e.brain.as_ref()) {
            summary.agents += 1;
            summary.running += brain.manager.running_count();
            if brain.manager.is_paused() {
                summary.paused += 1;
            }
        }
        observer.on_tick_end(&self.clock, &summary);

        let interval = self.config.output_interval_ticks;
        if interval > 0 && self.clock.tick % interval == 0 {
            observer.on_snapshot(&self.clock, &self.snapshot());
        }
        summary
    }

    /// Tick every live agent.  With the `parallel` feature the agents are
    /// spread over Rayon's pool; results come back in `AgentId` order
    /// either way.
    fn agent_phase(&mut self, now: GameTime, dt: f32) -> Vec<AgentOutput> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let bounds    = self.bounds;
        let positions = self.positions.as_slice();
        let kinds     = self.kinds.as_slice();
        let entities  = &mut self.entities;

        let tick_one = |(i, entity): (usize, &mut Entity)| -> Option<AgentOutput> {
            let Entity { motion, present, brain, alive } = entity;
            let brain = brain.as_mut().filter(|_| *alive)?;
            let id = AgentId(i as u32);
            let mut view = AgentView {
                me: id,
                now,
                bounds,
                world: Snapshot { positions, kinds },
                motion,
                present,
            };
            if let Some(activities) = &mut brain.activities {
                activities.on_tick(dt, &mut view);
            }
            brain.manager.on_tick(dt, &mut view);
            Some(AgentOutput {
                id,
                events: brain.manager.drain_events(),
                sounds: std::mem::take(&mut view.present.sounds),
            })
        };

        #[cfg(not(feature = "parallel"))]
        {
            entities.iter_mut().enumerate().filter_map(tick_one).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let run = || -> Vec<AgentOutput> {
                entities.par_iter_mut().enumerate().filter_map(tick_one).collect()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }

    fn refresh_snapshot(&mut self) {
        self.positions.clear();
        self.positions
            .extend(self.entities.iter().map(|e| e.alive.then_some(e.motion.position)));
    }

    /// Current state of every live entity.
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alive)
            .map(|(i, e)| {
                let (severity, running, activity) = match &e.brain {
                    Some(brain) => (
                        brain.manager.severity(),
                        brain
                            .manager
                            .tasks()
                            .map(|t| t.meta().code.as_str())
                            .filter(|code| brain.manager.is_task_active(code))
                            .map(str::to_owned)
                            .collect(),
                        brain.activities.as_ref().and_then(|a| a.current()).map(|a| a.code.clone()),
                    ),
                    None => (Severity::None, Vec::new(), None),
                };
                AgentSnapshot {
                    id: AgentId(i as u32),
                    kind: self.kinds[i].clone(),
                    position: e.motion.position,
                    severity,
                    running,
                    activity,
                }
            })
            .collect()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Number of entities ever spawned, despawned ones included.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn now(&self) -> GameTime {
        self.clock.now
    }

    pub fn is_alive(&self, id: AgentId) -> bool {
        self.entities.get(id.index()).is_some_and(|e| e.alive)
    }

    pub fn kind(&self, id: AgentId) -> Option<&str> {
        self.kinds.get(id.index()).map(String::as_str)
    }

    /// Live position, `None` if unknown or despawned.
    pub fn position(&self, id: AgentId) -> Option<Vec3> {
        self.live(id).map(|e| e.motion.position)
    }

    /// Where the entity is walking to, if it is moving.
    pub fn destination(&self, id: AgentId) -> Option<Vec3> {
        self.live(id).and_then(|e| e.motion.destination())
    }

    pub fn presentation(&self, id: AgentId) -> Option<&Presentation> {
        self.live(id).map(|e| &e.present)
    }

    pub fn manager(&self, id: AgentId) -> Option<&TaskManager> {
        self.live(id).and_then(|e| e.brain.as_ref()).map(|b| &b.manager)
    }

    pub fn manager_mut(&mut self, id: AgentId) -> Option<&mut TaskManager> {
        self.entities
            .get_mut(id.index())
            .filter(|e| e.alive)
            .and_then(|e| e.brain.as_mut())
            .map(|b| &mut b.manager)
    }

    pub fn activities(&self, id: AgentId) -> Option<&ActivitySystem> {
        self.live(id).and_then(|e| e.brain.as_ref()).and_then(|b| b.activities.as_ref())
    }

    pub fn activities_mut(&mut self, id: AgentId) -> Option<&mut ActivitySystem> {
        self.entities
            .get_mut(id.index())
            .filter(|e| e.alive)
            .and_then(|e| e.brain.as_mut())
            .and_then(|b| b.activities.as_mut())
    }

    fn live(&self, id: AgentId) -> Option<&Entity> {
        self.entities.get(id.index()).filter(|e| e.alive)
    }

    // ── Host-side events ──────────────────────────────────────────────────

    /// Add an inert entity mid-run.
    pub fn spawn_prop(&mut self, kind: impl Into<String>, position: Vec3) -> SimResult<AgentId> {
        let id = AgentId::try_from(self.entities.len())
            .map_err(|_| SimError::Config("too many entities".into()))?;
        self.kinds.push(kind.into());
        self.entities.push(Entity {
            motion:  MotionState::at(position),
            present: Presentation::default(),
            brain:   None,
            alive:   true,
        });
        self.positions.push(Some(position));
        Ok(id)
    }

    /// Teleport an entity.  Any move in progress is stopped.
    pub fn place(&mut self, id: AgentId, position: Vec3) -> SimResult<()> {
        let entity = self.entity_mut(id)?;
        entity.motion.place(position);
        Ok(())
    }

    /// Deliver damage to `target`'s tasks.
    pub fn hurt(&mut self, target: AgentId, source: &DamageSource, damage: f32) -> SimResult<()> {
        self.with_brain(target, |brain, view| brain.manager.on_entity_hurt(source, damage, view))
    }

    /// Fan a notification out to `target`'s tasks.  Returns how many started.
    pub fn notify(&mut self, target: AgentId, key: &str, data: &NotifyData) -> SimResult<usize> {
        self.with_brain(target, |brain, view| brain.manager.notify(key, data, view))
    }

    /// Start `target`'s activity `code` regardless of its conditions.  Its
    /// first action runs two ticks from now, after the task manager has
    /// reacted to the pause.
    pub fn force_activity(&mut self, target: AgentId, code: &str) -> SimResult<()> {
        self.with_brain(target, |brain, view| match brain.activities.as_mut() {
            Some(activities) => activities.force(code, view).map_err(SimError::from),
            None => Err(SimError::NoActivities(target)),
        })?
    }

    /// Remove an entity.  Its activity is aborted and every running task
    /// cancelled before the scheduler is dropped.
    pub fn despawn(&mut self, id: AgentId) -> SimResult<()> {
        self.refresh_snapshot();
        let now = self.clock.now;
        let bounds = self.bounds;
        let entity = self
            .entities
            .get_mut(id.index())
            .ok_or(SimError::UnknownAgent(id))?;
        if !entity.alive {
            return Err(SimError::Despawned(id));
        }

        let Entity { motion, present, brain, alive } = entity;
        if let Some(brain) = brain.take() {
            let mut view = AgentView {
                me: id,
                now,
                bounds,
                world: Snapshot { positions: &self.positions, kinds: &self.kinds },
                motion: &mut *motion,
                present: &mut *present,
            };
            if let Some(mut activities) = brain.activities {
                activities.cancel(&mut view);
            }
            let tasks = brain.manager.shutdown(&mut view);
            debug!(agent = %id, tasks = tasks.len(), %now, "agent despawned");
        }
        motion.stop();
        present.animations.clear();
        *alive = false;
        self.positions[id.index()] = None;
        Ok(())
    }

    fn entity_mut(&mut self, id: AgentId) -> SimResult<&mut Entity> {
        let entity = self.entities.get_mut(id.index()).ok_or(SimError::UnknownAgent(id))?;
        if !entity.alive {
            return Err(SimError::Despawned(id));
        }
        Ok(entity)
    }

    fn with_brain<T>(
        &mut self,
        id: AgentId,
        f:  impl FnOnce(&mut Brain, &mut AgentView<'_>) -> T,
    ) -> SimResult<T> {
        self.refresh_snapshot();
        let now = self.clock.now;
        let bounds = self.bounds;
        let entity = self.entities.get_mut(id.index()).ok_or(SimError::UnknownAgent(id))?;
        if !entity.alive {
            return Err(SimError::Despawned(id));
        }
        let Entity { motion, present, brain, .. } = entity;
        let brain = brain.as_mut().ok_or(SimError::NoBrain(id))?;
        let mut view = AgentView {
            me: id,
            now,
            bounds,
            world: Snapshot { positions: &self.positions, kinds: &self.kinds },
            motion,
            present,
        };
        Ok(f(brain, &mut view))
    }
}
