//! `ai-task`: the task contract and everything a task may touch.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                           |
//! |---------------|--------------------------------------------------------------------|
//! | [`meta`]      | `TaskMeta`: code, slot, priority, cancel priority                  |
//! | [`task`]      | `Task` trait (evaluate → start → continue → finish)                |
//! | [`context`]   | `TaskContext<'a>`: per-call view of agent, time, RNG, host         |
//! | [`host`]      | `AgentHost` capability trait, move/sound/query types, `NullHost`   |
//! | [`event`]     | `NotifyData`, `DamageSource`                                       |
//! | [`cooldown`]  | `Cooldown` helper                                                  |
//! | [`sound`]     | `SoundGate`, `StartSound`                                          |
//! | [`targeting`] | `Targeting`: throttled target acquisition                          |
//! | [`error`]     | `TaskError`, `TaskResult<T>`                                       |
//!
//! # Design notes
//!
//! Tasks never perform engine I/O themselves.  Every side effect (movement,
//! animation, sound, world queries) goes through the [`AgentHost`] handle in
//! the [`TaskContext`] and is fire-and-forget: a task that needs to know
//! whether it is still moving polls [`AgentHost::move_status`] on a later
//! tick instead of waiting.
//!
//! The helpers are plain structs a task embeds.  There is no base-class
//! hierarchy; a task that needs a target embeds a [`Targeting`], a task with
//! a cooldown embeds a [`Cooldown`], and so on.

pub mod context;
pub mod cooldown;
pub mod error;
pub mod event;
pub mod host;
pub mod meta;
pub mod sound;
pub mod targeting;
pub mod task;

#[cfg(test)]
mod tests;

pub use context::TaskContext;
pub use cooldown::Cooldown;
pub use error::{TaskError, TaskResult};
pub use event::{DamageSource, NotifyData};
pub use host::{
    AgentHost, EntityFilter, MoveRequest, MoveStatus, MoveTicket, NullHost, Sighting, SoundRequest,
};
pub use meta::TaskMeta;
pub use sound::{SoundGate, StartSound};
pub use targeting::Targeting;
pub use task::Task;
