//! Fluent builder for constructing a [`TaskManager`].

use ai_core::{AgentId, AgentRng};
use ai_registry::{TaskRegistry, TaskSpec, parse_task_specs};
use ai_task::Task;
use tracing::warn;

use crate::{InterruptSource, InterruptionController, SchedResult, SchedulerConfig, TaskManager};

/// Fluent builder for [`TaskManager`].
///
/// # Required inputs
///
/// - `agent`: the owning agent's id
/// - `seed` : the run's global seed; the manager's RNG is derived from it
///   and `agent`
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                      |
/// |-------------------------|------------------------------|
/// | `.config(c)`            | `SchedulerConfig::default()` |
/// | `.shuffle(b)` etc.      | see [`SchedulerConfig`]      |
/// | `.task(t)` / `.tasks(v)`| no tasks                     |
/// | `.specs(reg, specs)`    | no tasks                     |
/// | `.interrupt(src)`       | no interruption predicates   |
///
/// # Example
///
/// ```rust,ignore
/// let manager = TaskManagerBuilder::new(AgentId(3), seed)
///     .preemption(true)
///     .json(&registry, include_str!("sheep.json"))?
///     .interrupt(activity.flag())
///     .build();
/// ```
pub struct TaskManagerBuilder {
    agent:      AgentId,
    seed:       u64,
    config:     SchedulerConfig,
    tasks:      Vec<Box<dyn Task>>,
    interrupts: InterruptionController,
}

impl TaskManagerBuilder {
    pub fn new(agent: AgentId, seed: u64) -> Self {
        Self {
            agent,
            seed,
            config:     SchedulerConfig::default(),
            tasks:      Vec::new(),
            interrupts: InterruptionController::new(),
        }
    }

    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn shuffle(mut self, on: bool) -> Self {
        self.config.shuffle = on;
        self
    }

    pub fn preemption(mut self, on: bool) -> Self {
        self.config.preemption = on;
        self
    }

    pub fn catch_panics(mut self, on: bool) -> Self {
        self.config.catch_panics = on;
        self
    }

    pub fn record_events(mut self, on: bool) -> Self {
        self.config.record_events = on;
        self
    }

    /// Append one task.  Order of calls is registration order.
    pub fn task(mut self, task: Box<dyn Task>) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn tasks(mut self, tasks: impl IntoIterator<Item = Box<dyn Task>>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    /// Build `specs` through `registry` and append them.
    ///
    /// Entries that fail to build (unknown code, bad config) are logged by
    /// the registry and skipped; the rest still load.
    pub fn specs(mut self, registry: &TaskRegistry, specs: &[TaskSpec]) -> Self {
        let loaded = registry.create_all(self.agent, specs);
        if !loaded.is_complete() {
            warn!(
                agent   = %self.agent,
                skipped = loaded.skipped.len(),
                loaded  = loaded.tasks.len(),
                "task list partially loaded"
            );
        }
        self.tasks.extend(loaded.tasks);
        self
    }

    /// Parse a JSON task list and append it as [`specs`][Self::specs] does.
    ///
    /// # Errors
    ///
    /// Only a malformed document fails; bad entries are skipped.
    pub fn json(self, registry: &TaskRegistry, json: &str) -> SchedResult<Self> {
        let specs = parse_task_specs(json)?;
        Ok(self.specs(registry, &specs))
    }

    pub fn interrupt<S: InterruptSource + 'static>(mut self, source: S) -> Self {
        self.interrupts.add(source);
        self
    }

    pub fn build(self) -> TaskManager {
        let rng = AgentRng::new(self.seed, self.agent);
        let mut manager = TaskManager::new(self.agent, rng, self.config, self.interrupts);
        for task in self.tasks {
            manager.add_task(task);
        }
        manager
    }
}
