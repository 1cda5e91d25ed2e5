//! One configured task entry.

use ai_task::TaskMeta;
use serde::Deserialize;
use serde_json::Value;

/// A task entry as it appears in an agent's task list.
///
/// ```json
/// { "code": "wander", "slot": 0, "priority": 1.0,
///   "config": { "moveSpeed": 0.03, "range": 12 } }
/// ```
///
/// `config` is opaque here; the factory registered for `code` binds it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub code: String,

    #[serde(default)]
    pub slot: usize,

    #[serde(default)]
    pub priority: f32,

    /// Defaults to `priority` when absent.
    #[serde(default)]
    pub priority_for_cancel: Option<f32>,

    /// Disabled entries are skipped without error.
    #[serde(default = "enabled_default")]
    pub enabled: bool,

    #[serde(default)]
    pub config: Value,
}

fn enabled_default() -> bool {
    true
}

impl TaskSpec {
    pub fn new(code: impl Into<String>, slot: usize, priority: f32) -> Self {
        Self {
            code: code.into(),
            slot,
            priority,
            priority_for_cancel: None,
            enabled: true,
            config: Value::Null,
        }
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Scheduling metadata derived from this entry.
    pub fn meta(&self) -> TaskMeta {
        let meta = TaskMeta::new(self.code.clone(), self.slot, self.priority);
        match self.priority_for_cancel {
            Some(p) => meta.with_priority_for_cancel(p),
            None    => meta,
        }
    }
}
