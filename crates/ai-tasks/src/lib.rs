//! `ai-tasks`: the stock task library.
//!
//! # Crate layout
//!
//! | Module         | Code           | Task                                             |
//! |----------------|----------------|--------------------------------------------------|
//! | [`idle`]       | `idle`         | Stand and play an animation for a random time    |
//! | [`wander`]     | `wander`       | Walk to a random point nearby                    |
//! | [`lookaround`] | `lookaround`   | Watch a nearby entity                            |
//! | [`flee`]       | `fleeentity`   | Run from a threat (searched for, or the attacker)|
//! | [`seek`]       | `seekentity`   | Walk up to the nearest entity of a kind          |
//! | [`common`]     | -              | Shared config pieces and geometry helpers        |
//!
//! Every task reads a typed config (camelCase JSON, all fields optional,
//! unknown fields rejected) through the registry's `TaskInit::bind`.
//! [`register_defaults`] installs all five under their codes.

pub mod common;
pub mod flee;
pub mod idle;
pub mod lookaround;
pub mod seek;
pub mod wander;


use ai_registry::{TaskInit, TaskRegistry};
use ai_task::{Task, TaskMeta};
use serde::de::DeserializeOwned;

pub use flee::{FleeConfig, FleeEntity};
pub use idle::{Idle, IdleConfig};
pub use lookaround::{LookAround, LookAroundConfig};
pub use seek::{SeekConfig, SeekEntity};
pub use wander::{Wander, WanderConfig};

pub const IDLE:        &str = "idle";
pub const WANDER:      &str = "wander";
pub const LOOK_AROUND: &str = "lookaround";
pub const FLEE_ENTITY: &str = "fleeentity";
pub const SEEK_ENTITY: &str = "seekentity";

/// Register every stock task.  Application tasks registered afterwards
/// under the same code replace the stock one.
pub fn register_defaults(registry: &mut TaskRegistry) {
    registry.register(IDLE, factory(Idle::new));
    registry.register(WANDER, factory(Wander::new));
    registry.register(LOOK_AROUND, factory(LookAround::new));
    registry.register(FLEE_ENTITY, factory(FleeEntity::new));
    registry.register(SEEK_ENTITY, factory(SeekEntity::new));
}

/// A registry factory that binds the config to `C` and calls `build`.
fn factory<C, T>(
    build: fn(TaskMeta, C) -> T,
) -> impl Fn(TaskInit<'_>) -> Result<Box<dyn Task>, serde_json::Error> + Send + Sync + 'static
where
    C: DeserializeOwned + 'static,
    T: Task,
{
    move |init: TaskInit<'_>| {
        let config: C = init.bind()?;
        Ok(Box::new(build(init.meta, config)) as Box<dyn Task>)
    }
}
