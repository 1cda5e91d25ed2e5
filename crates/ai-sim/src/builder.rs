//! Fluent builders for a [`World`] and the agents in it.

use ai_activity::{Activity, ActivitySystem, DEFAULT_DAY_LENGTH};
use ai_core::{AgentId, SimClock, SimConfig, Vec3};
use ai_registry::{TaskRegistry, TaskSpec};
use ai_sched::{SchedulerConfig, TaskManagerBuilder};
use ai_task::Task;
use tracing::info;

use crate::host::Presentation;
use crate::motion::MotionState;
use crate::world::{Brain, Entity};
use crate::{SimError, SimResult, World};

/// Everything needed to spawn one scheduled agent.
///
/// Tasks come from two places, appended in this order: ready-made
/// [`task`][Self::task]s, then [`specs`][Self::specs] built through the
/// registry handed to [`WorldBuilder::build_with`].
pub struct AgentSetup {
    kind:       String,
    position:   Vec3,
    tasks:      Vec<Box<dyn Task>>,
    specs:      Vec<TaskSpec>,
    activities: Vec<Activity>,
    scheduler:  SchedulerConfig,
}

impl AgentSetup {
    pub fn new(kind: impl Into<String>, position: Vec3) -> Self {
        Self {
            kind:       kind.into(),
            position,
            tasks:      Vec::new(),
            specs:      Vec::new(),
            activities: Vec::new(),
            scheduler:  SchedulerConfig::default(),
        }
    }

    pub fn task(mut self, task: Box<dyn Task>) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn tasks(mut self, tasks: impl IntoIterator<Item = Box<dyn Task>>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    pub fn specs(mut self, specs: Vec<TaskSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Give the agent an activity driver.  Its pause flag is registered with
    /// the agent's task manager.
    pub fn activities(mut self, activities: Vec<Activity>) -> Self {
        self.activities.extend(activities);
        self
    }

    /// Scheduler knobs.  `record_events` is always switched on: the world
    /// drains every manager's events each tick.
    pub fn scheduler(mut self, config: SchedulerConfig) -> Self {
        self.scheduler = config;
        self
    }
}

enum Setup {
    Prop { kind: String, position: Vec3 },
    Agent(AgentSetup),
}

/// Fluent builder for [`World`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                         |
/// |-------------------|---------------------------------|
/// | `.bounds(h)`      | Unbounded                       |
/// | `.day_length(s)`  | `DEFAULT_DAY_LENGTH` seconds    |
///
/// Entities get `AgentId`s in the order they are added.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = WorldBuilder::new(config)
///     .bounds(32.0)
///     .prop("wolf", Vec3::new(12.0, 0.0, 0.0))
///     .agent(AgentSetup::new("sheep", Vec3::ZERO).specs(specs))
///     .build_with(&registry)?;
/// world.run(&mut NoopObserver)?;
/// ```
pub struct WorldBuilder {
    config:     SimConfig,
    bounds:     Option<f32>,
    day_length: f64,
    entities:   Vec<Setup>,
}

impl WorldBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            bounds:     None,
            day_length: DEFAULT_DAY_LENGTH,
            entities:   Vec::new(),
        }
    }

    /// Limit movement to `|x| <= half_extent` and `|z| <= half_extent`.
    /// Moves targeting anywhere outside report `Stuck`.
    pub fn bounds(mut self, half_extent: f32) -> Self {
        self.bounds = Some(half_extent);
        self
    }

    /// In-game day length for activity `timeOfDay` conditions.
    pub fn day_length(mut self, secs: f64) -> Self {
        self.day_length = secs;
        self
    }

    /// An entity with no scheduler: visible to searches, never acts.
    pub fn prop(mut self, kind: impl Into<String>, position: Vec3) -> Self {
        self.entities.push(Setup::Prop { kind: kind.into(), position });
        self
    }

    pub fn agent(mut self, setup: AgentSetup) -> Self {
        self.entities.push(Setup::Agent(setup));
        self
    }

    /// Build with an empty registry; agents must use ready-made tasks only.
    pub fn build(self) -> SimResult<World> {
        self.build_with(&TaskRegistry::new())
    }

    /// Validate the configuration, build every agent's scheduler through
    /// `registry`, and return a ready-to-run [`World`].
    pub fn build_with(self, registry: &TaskRegistry) -> SimResult<World> {
        if !(self.config.dt_secs > 0.0) {
            return Err(SimError::Config(format!("dt_secs must be positive, got {}", self.config.dt_secs)));
        }
        if let Some(half) = self.bounds {
            if !(half > 0.0) {
                return Err(SimError::Config(format!("bounds must be positive, got {half}")));
            }
        }

        let seed = self.config.seed;
        let mut kinds = Vec::with_capacity(self.entities.len());
        let mut entities = Vec::with_capacity(self.entities.len());

        for (i, setup) in self.entities.into_iter().enumerate() {
            let id = AgentId::try_from(i)
                .map_err(|_| SimError::Config(format!("too many entities ({i})")))?;
            let (kind, position, brain) = match setup {
                Setup::Prop { kind, position } => (kind, position, None),
                Setup::Agent(agent) => {
                    let mut manager = TaskManagerBuilder::new(id, seed)
                        .config(SchedulerConfig { record_events: true, ..agent.scheduler })
                        .tasks(agent.tasks)
                        .specs(registry, &agent.specs)
                        .build();
                    let activities = (!agent.activities.is_empty()).then(|| {
                        let system = ActivitySystem::new(id, seed, agent.activities)
                            .with_day_length(self.day_length);
                        manager.add_interrupt(system.flag());
                        system
                    });
                    (agent.kind, agent.position, Some(Brain { manager, activities }))
                }
            };
            kinds.push(kind);
            entities.push(Entity {
                motion:  MotionState::at(position),
                present: Presentation::default(),
                brain,
                alive:   true,
            });
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(format!("thread pool: {e}")))?,
            ),
            None => None,
        };

        let agents = entities.iter().filter(|e| e.brain.is_some()).count();
        info!(entities = entities.len(), agents, seed, "world built");

        Ok(World {
            positions: entities.iter().map(|e| Some(e.motion.position)).collect(),
            clock: SimClock::new(),
            config: self.config,
            bounds: self.bounds,
            kinds,
            entities,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
