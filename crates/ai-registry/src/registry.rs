//! Code → factory map.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use ai_core::AgentId;
use ai_task::{Task, TaskMeta};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{RegistryError, RegistryResult, TaskSpec};

/// Everything a factory receives to build one task instance.
pub struct TaskInit<'a> {
    pub agent:  AgentId,
    pub meta:   TaskMeta,
    pub config: &'a Value,
}

impl TaskInit<'_> {
    /// Bind the opaque config to the task's typed config struct.
    ///
    /// A missing (`null`) config binds as an empty object, so config structs
    /// whose fields all have defaults accept it.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.config.is_null() {
            serde_json::from_value(Value::Object(Default::default()))
        } else {
            T::deserialize(self.config)
        }
    }
}

/// Builds a boxed task from its init data.  Errors are config binding
/// failures.
pub type TaskFactory =
    Box<dyn Fn(TaskInit<'_>) -> Result<Box<dyn Task>, serde_json::Error> + Send + Sync>;

/// Maps task codes to factories.
#[derive(Default)]
pub struct TaskRegistry {
    factories: HashMap<String, TaskFactory>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `code` with `factory`.
    ///
    /// Re-registering a code replaces the previous factory (last wins), so
    /// an application can override a stock task.  Returns `true` if a
    /// factory was replaced.
    pub fn register<F>(&mut self, code: impl Into<String>, factory: F) -> bool
    where
        F: Fn(TaskInit<'_>) -> Result<Box<dyn Task>, serde_json::Error> + Send + Sync + 'static,
    {
        let code = code.into();
        let replaced = self.factories.insert(code.clone(), Box::new(factory)).is_some();
        if replaced {
            debug!(task = %code, "task factory overridden");
        }
        replaced
    }

    pub fn contains(&self, code: &str) -> bool {
        self.factories.contains_key(code)
    }

    /// Registered codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build the task described by `spec` for `agent`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownTaskCode`] if nothing is registered for
    ///   `spec.code`.
    /// - [`RegistryError::Config`] if the factory cannot bind `spec.config`.
    pub fn create(&self, agent: AgentId, spec: &TaskSpec) -> RegistryResult<Box<dyn Task>> {
        let factory = self
            .factories
            .get(spec.code.as_str())
            .ok_or_else(|| RegistryError::UnknownTaskCode { code: spec.code.clone() })?;

        let init = TaskInit { agent, meta: spec.meta(), config: &spec.config };
        factory(init).map_err(|source| RegistryError::Config {
            code: spec.code.clone(),
            agent,
            source,
        })
    }
}
