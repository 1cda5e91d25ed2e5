//! JSON task-list loader.
//!
//! # Format
//!
//! A JSON array of [`TaskSpec`] entries, in priority order: the order of
//! the array is the order the scheduler scans candidates in:
//!
//! ```json
//! [
//!   { "code": "fleeentity", "slot": 0, "priority": 3.0,
//!     "config": { "entityKinds": ["wolf"], "seekingRange": 12 } },
//!   { "code": "wander",     "slot": 0, "priority": 1.0 },
//!   { "code": "idle",       "slot": 0, "priority": 0.5,
//!     "config": { "animation": "graze", "minDuration": 4, "maxDuration": 9 } },
//!   { "code": "lookaround", "slot": 1, "priority": 0.2 }
//! ]
//! ```
//!
//! # Partial failure
//!
//! A malformed document fails as a whole ([`RegistryError::Parse`]).  A
//! well-formed document with a bad entry (unknown code, config that does not
//! bind) loses only that entry: it is logged, recorded in
//! [`LoadedTasks::skipped`], and the remaining entries still load.

use std::io::Read;
use std::path::Path;

use ai_core::AgentId;
use ai_task::Task;
use tracing::warn;

use crate::{RegistryError, RegistryResult, TaskRegistry, TaskSpec};

/// The outcome of building an agent's task list.
pub struct LoadedTasks {
    /// Successfully built tasks, in list order.
    pub tasks: Vec<Box<dyn Task>>,
    /// Entries that failed to build.
    pub skipped: Vec<RegistryError>,
}

impl LoadedTasks {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse a task-list document without building anything.
pub fn parse_task_specs(json: &str) -> RegistryResult<Vec<TaskSpec>> {
    Ok(serde_json::from_str(json)?)
}

/// Read a task list from any `Read` source and build it for `agent`.
pub fn load_tasks_reader<R: Read>(
    reader:   R,
    registry: &TaskRegistry,
    agent:    AgentId,
) -> RegistryResult<LoadedTasks> {
    let specs: Vec<TaskSpec> = serde_json::from_reader(reader)?;
    Ok(registry.create_all(agent, &specs))
}

/// Like [`load_tasks_reader`] but opens `path`.
pub fn load_tasks_json(
    path:     &Path,
    registry: &TaskRegistry,
    agent:    AgentId,
) -> RegistryResult<LoadedTasks> {
    let file = std::fs::File::open(path)?;
    load_tasks_reader(std::io::BufReader::new(file), registry, agent)
}

impl TaskRegistry {
    /// Build every enabled entry of `specs` for `agent`, skipping (and
    /// logging) entries that fail.
    pub fn create_all(&self, agent: AgentId, specs: &[TaskSpec]) -> LoadedTasks {
        let mut tasks = Vec::with_capacity(specs.len());
        let mut skipped = Vec::new();

        for spec in specs.iter().filter(|s| s.enabled) {
            match self.create(agent, spec) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    warn!(%agent, task = %spec.code, error = %e, "skipping task entry");
                    skipped.push(e);
                }
            }
        }

        LoadedTasks { tasks, skipped }
    }
}
