//! The `Task` trait: the main extension point for behavior code.

use crate::{DamageSource, NotifyData, TaskContext, TaskMeta, TaskResult};

/// One candidate behavior of an agent.
///
/// # Lifecycle
///
/// ```text
///            should_execute() == true
///   Idle ───────────────────────────────▶ start_execute()
///    ▲                                          │
///    │                                          ▼
///    │        continue_execute(dt) == true ◀── Running
///    │                                          │
///    └──── finish_execute(cancelled) ◀──────────┘
///          (continue returned false, or cancelled)
/// ```
///
/// The task manager guarantees:
///
/// - `continue_execute` is only called between a `start_execute` and its
///   matching `finish_execute`.
/// - `finish_execute` is called exactly once per `start_execute`, unless a
///   callback faults, in which case the task is forced idle without it.
/// - A task started this tick is not continued until the next tick.
///
/// Running state lives in the manager, not the task.  A task that never
/// returns `false` from `continue_execute` runs until something cancels it;
/// the manager enforces no timeout.
///
/// # Required methods
///
/// `meta`, `should_execute`, `continue_execute`.  `start_execute` and
/// `finish_execute` default to doing nothing; the notification hooks default
/// to ignoring the event.
///
/// # Example
///
/// ```rust
/// use ai_task::{Task, TaskContext, TaskMeta, TaskResult};
///
/// struct Nap { meta: TaskMeta, slept: f32 }
///
/// impl Task for Nap {
///     fn meta(&self) -> &TaskMeta { &self.meta }
///
///     fn should_execute(&mut self, _ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
///         Ok(true)
///     }
///
///     fn start_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
///         self.slept = 0.0;
///         ctx.host.request_animation("sleep", 1.0);
///         Ok(())
///     }
///
///     fn continue_execute(&mut self, dt: f32, _ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
///         self.slept += dt;
///         Ok(self.slept < 10.0)
///     }
///
///     fn finish_execute(&mut self, _cancelled: bool, ctx: &mut TaskContext<'_>) -> TaskResult<()> {
///         ctx.host.stop_animation("sleep");
///         Ok(())
///     }
/// }
/// ```
pub trait Task: Send + 'static {
    /// Identity and scheduling metadata.
    fn meta(&self) -> &TaskMeta;

    /// Precondition check, called every tick the task is a start candidate.
    ///
    /// Must be cheap.  Side effects are limited to the task's own caches
    /// (target search results, sound chance).  Must return `false` while a
    /// cooldown set by a previous `finish_execute` has not elapsed.
    fn should_execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult<bool>;

    /// Called once when the task is selected.  Resets per-run accumulators
    /// and fires one-shot side effects (start animation, start sound).
    fn start_execute(&mut self, _ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        Ok(())
    }

    /// Called every tick while running.  Return `true` to keep running,
    /// `false` to finish naturally.
    fn continue_execute(&mut self, dt: f32, ctx: &mut TaskContext<'_>) -> TaskResult<bool>;

    /// Called exactly once when the task stops.  `cancelled` is `true` when
    /// it was interrupted (preemption, pause, despawn) rather than finished
    /// by `continue_execute` returning `false`.  Must undo the side effects
    /// of `start_execute`.
    fn finish_execute(&mut self, _cancelled: bool, _ctx: &mut TaskContext<'_>) -> TaskResult<()> {
        Ok(())
    }

    /// Generic event fan-out.  Return `true` to ask the manager to start
    /// this task right away.
    fn notify(&mut self, _key: &str, _data: &NotifyData) -> bool {
        false
    }

    /// The owning agent was hurt.
    fn on_hurt(&mut self, _source: &DamageSource, _damage: f32) {}
}
