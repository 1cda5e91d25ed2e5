//! `ai-activity`: scripted, condition-gated activities for one agent.
//!
//! An activity is a short script (walk somewhere, play an animation, wait)
//! that runs instead of the agent's autonomous tasks.  The system decides
//! when one should run and signals the agent's `TaskManager` to stand aside
//! through a shared [`SeverityFlag`](ai_sched::SeverityFlag).
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`activity`] | `Activity`, `Action`, `Condition`, `ConditionEnv`               |
//! | [`system`]   | `ActivitySystem`: selection, action stepping, pause signalling  |
//! | [`loader`]   | JSON activity lists                                             |
//! | [`error`]    | `ActivityError`, `ActivityResult<T>`                            |
//!
//! # Wiring
//!
//! ```ignore
//! let mut activities = ActivitySystem::new(agent, seed, load_activities_json(path)?);
//! manager.add_interrupt(activities.flag());
//!
//! // each tick, activities first:
//! activities.on_tick(dt, &mut host);
//! manager.on_tick(dt, &mut host);
//! ```

pub mod activity;
pub mod error;
pub mod loader;
pub mod system;


pub use activity::{Action, Activity, Condition, ConditionEnv};
pub use error::{ActivityError, ActivityResult};
pub use loader::{load_activities_json, load_activities_reader, parse_activities};
pub use system::{ActivityOutcome, ActivitySystem, DEFAULT_DAY_LENGTH};
