//! Lifecycle records buffered by the task manager.

use std::fmt;

use ai_core::GameTime;

use crate::Severity;

/// The callback a fault was raised from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskPhase {
    Evaluate,
    Start,
    Continue,
    Finish,
    Notify,
    Hurt,
}

impl TaskPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPhase::Evaluate => "should_execute",
            TaskPhase::Start    => "start_execute",
            TaskPhase::Continue => "continue_execute",
            TaskPhase::Finish   => "finish_execute",
            TaskPhase::Notify   => "notify",
            TaskPhase::Hurt     => "on_hurt",
        }
    }
}

impl fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observable scheduler transition.
///
/// Recorded only when `SchedulerConfig::record_events` is set.
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    Started  { code: String, slot: usize, at: GameTime },
    Finished { code: String, slot: usize, cancelled: bool, at: GameTime },
    Faulted  { code: String, slot: usize, phase: TaskPhase, error: String, at: GameTime },
    Paused   { severity: Severity, at: GameTime },
    Resumed  { at: GameTime },
}

impl LifecycleEvent {
    /// Task code for task-level events, `None` for pause transitions.
    pub fn code(&self) -> Option<&str> {
        match self {
            LifecycleEvent::Started { code, .. }
            | LifecycleEvent::Finished { code, .. }
            | LifecycleEvent::Faulted { code, .. } => Some(code),
            LifecycleEvent::Paused { .. } | LifecycleEvent::Resumed { .. } => None,
        }
    }

    pub fn at(&self) -> GameTime {
        match *self {
            LifecycleEvent::Started { at, .. }
            | LifecycleEvent::Finished { at, .. }
            | LifecycleEvent::Faulted { at, .. }
            | LifecycleEvent::Paused { at, .. }
            | LifecycleEvent::Resumed { at } => at,
        }
    }

    /// Short lowercase tag, used as the `kind` column of trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleEvent::Started { .. }  => "started",
            LifecycleEvent::Finished { .. } => "finished",
            LifecycleEvent::Faulted { .. }  => "faulted",
            LifecycleEvent::Paused { .. }   => "paused",
            LifecycleEvent::Resumed { .. }  => "resumed",
        }
    }
}
