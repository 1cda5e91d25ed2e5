//! `ai-sim`: a sandbox world for running many scheduled agents.
//!
//! The world is the host engine the schedulers never see directly: it owns
//! positions, straight-line movement, and what each agent is animating or
//! saying, and it lends each agent an [`AgentView`] implementing
//! [`AgentHost`](ai_task::AgentHost) while that agent ticks.
//!
//! # Tick loop
//!
//! ```text
//! for tick in clock.tick..config.total_ticks:
//!   ① Snapshot : record every entity's position.
//!   ② Agents   : activities.on_tick, then manager.on_tick, per agent
//!                (parallel with the `parallel` feature).
//!   ③ Movement : advance every move in progress by dt.
//!   ④ Report   : lifecycle events and sounds to the observer in
//!                ascending AgentId order, then the tick summary.
//! ```
//!
//! Agents read the phase-① snapshot, so the result of a tick does not
//! depend on the order (or thread) agents are ticked in.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                          |
//! |------------|-------------------------------------------------|
//! | `parallel` | Runs the agent phase on Rayon's thread pool.    |

pub mod builder;
pub mod error;
pub mod host;
pub mod motion;
pub mod observer;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::{AgentSetup, WorldBuilder};
pub use error::{SimError, SimResult};
pub use host::{AgentView, Presentation};
pub use motion::MotionState;
pub use observer::{AgentSnapshot, NoopObserver, TickSummary, WorldObserver};
pub use world::{Brain, World};
