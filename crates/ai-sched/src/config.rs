//! Scheduler knobs.

/// Behavior switches for one [`TaskManager`][crate::TaskManager].
///
/// | Field          | Default | Effect                                                       |
/// |----------------|---------|--------------------------------------------------------------|
/// | `shuffle`      | `false` | Randomize candidate order each selection pass                |
/// | `preemption`   | `false` | Let a candidate cancel a running task it outranks             |
/// | `catch_panics` | `true`  | Convert panics in task callbacks into `TaskError::Panicked`   |
/// | `record_events`| `false` | Buffer `LifecycleEvent`s for [`drain_events`][crate::TaskManager::drain_events] |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SchedulerConfig {
    /// Without shuffle, candidates are scanned in registration order and the
    /// first one whose precondition holds wins its slot.
    pub shuffle: bool,

    /// With preemption, a candidate may be evaluated for an occupied slot
    /// when its priority is strictly above the occupant's cancel priority.
    /// Off by default so registration order is the only start rule.
    pub preemption: bool,

    pub catch_panics: bool,

    pub record_events: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            shuffle:       false,
            preemption:    false,
            catch_panics:  true,
            record_events: false,
        }
    }
}
