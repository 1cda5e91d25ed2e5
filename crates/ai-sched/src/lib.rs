//! `ai-sched`: the per-agent cooperative task scheduler.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                                |
//! |---------------|-------------------------------------------------------------------------|
//! | [`manager`]   | `TaskManager`: selection, continuation, pause, control API              |
//! | [`builder`]   | `TaskManagerBuilder`: fluent construction, JSON task lists              |
//! | [`interrupt`] | `Severity`, `InterruptSource`, `SeverityFlag`, `InterruptionController` |
//! | [`config`]    | `SchedulerConfig`                                                       |
//! | [`event`]     | `LifecycleEvent`, `TaskPhase`                                           |
//! | [`error`]     | `SchedError`, `SchedResult<T>`                                          |
//!
//! # Concurrency
//!
//! One manager per agent, ticked by one thread at a time.  Nothing here
//! locks or spawns; a host that ticks different agents on different worker
//! threads only needs each agent's manager and host view to stay confined to
//! the thread ticking it (`TaskManager: Send`).
//!
//! # Feature flags
//!
//! | Feature | Effect                                                         |
//! |---------|----------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on `Severity` and `SchedulerConfig`. |

pub mod builder;
pub mod config;
pub mod error;
pub mod event;
pub mod interrupt;
pub mod manager;


pub use builder::TaskManagerBuilder;
pub use config::SchedulerConfig;
pub use error::{SchedError, SchedResult};
pub use event::{LifecycleEvent, TaskPhase};
pub use interrupt::{InterruptSource, InterruptionController, Severity, SeverityFlag};
pub use manager::TaskManager;
