use ai_registry::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("no task with code {code:?}")]
    UnknownTask { code: String },

    #[error("task manager is paused; cannot force-start {code:?}")]
    Paused { code: String },

    #[error("task list error: {0}")]
    Registry(#[from] RegistryError),
}

pub type SchedResult<T> = Result<T, SchedError>;
