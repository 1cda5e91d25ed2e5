//! `ai-core`: foundational types for the agent task scheduler.
//!
//! This crate is a dependency of every other `ai-*` crate.  It has no `ai-*`
//! dependencies and only one required external one (`rand`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                        |
//! |----------|-------------------------------------------------|
//! | [`ids`]  | `AgentId`                                       |
//! | [`geo`]  | `Vec3`, distance and direction helpers          |
//! | [`time`] | `GameTime`, `SimClock`, `SimConfig`             |
//! | [`rng`]  | `AgentRng`, per-agent seeded streams            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::Vec3;
pub use ids::AgentId;
pub use rng::{ACTIVITY_STREAM, AgentRng, SCHEDULER_STREAM};
pub use time::{GameTime, SimClock, SimConfig};
