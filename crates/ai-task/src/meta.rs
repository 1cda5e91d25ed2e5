//! Task identity and scheduling metadata.

/// Scheduling metadata every task carries.
///
/// Built once at construction time (from a config entry or by hand) and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskMeta {
    /// Stable string code, e.g. `"wander"`.  Used for lookup, logging and
    /// as the registry key.
    pub code: String,

    /// Exclusivity group.  At most one task per slot runs at a time.
    pub slot: usize,

    /// Start priority.  Negative-priority tasks are never started by the
    /// scheduler's selection pass; only `execute_task` or a notification can
    /// start them.
    pub priority: f32,

    /// A candidate must have a priority strictly above this value to
    /// preempt the task while it runs.  Defaults to `priority`.
    pub priority_for_cancel: f32,
}

impl TaskMeta {
    pub fn new(code: impl Into<String>, slot: usize, priority: f32) -> Self {
        Self {
            code: code.into(),
            slot,
            priority,
            priority_for_cancel: priority,
        }
    }

    /// Override the cancel priority.
    pub fn with_priority_for_cancel(mut self, priority_for_cancel: f32) -> Self {
        self.priority_for_cancel = priority_for_cancel;
        self
    }

    /// `true` when a task with `self`'s priority may cancel `running`.
    #[inline]
    pub fn outranks(&self, running: &TaskMeta) -> bool {
        self.priority > running.priority_for_cancel
    }
}
