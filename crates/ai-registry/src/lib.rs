//! `ai-registry`: data-driven task construction.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`spec`]     | `TaskSpec`: one `{code, slot, priority, config}` entry        |
//! | [`registry`] | `TaskRegistry`, `TaskFactory`, `TaskInit`                     |
//! | [`loader`]   | `parse_task_specs`, `load_tasks_reader`, `load_tasks_json`    |
//! | [`error`]    | `RegistryError`, `RegistryResult<T>`                          |
//!
//! # Registries are values
//!
//! There is no process-wide registry.  Build a `TaskRegistry`, register the
//! stock and application tasks into it, and pass it by reference to
//! whatever creates task managers.  Tests build their own.

pub mod error;
pub mod loader;
pub mod registry;
pub mod spec;

#[cfg(test)]
mod tests;

pub use error::{RegistryError, RegistryResult};
pub use loader::{LoadedTasks, load_tasks_json, load_tasks_reader, parse_task_specs};
pub use registry::{TaskFactory, TaskInit, TaskRegistry};
pub use spec::TaskSpec;
