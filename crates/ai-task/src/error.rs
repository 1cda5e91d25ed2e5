use thiserror::Error;

/// A fault raised by a task callback.
///
/// The task manager contains every `TaskError` at the single-task level: it
/// logs it, forces the task idle, and keeps ticking the agent's other tasks.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task fault: {0}")]
    Fault(String),

    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("host rejected request: {0}")]
    Host(String),
}

impl TaskError {
    pub fn fault(msg: impl Into<String>) -> Self {
        TaskError::Fault(msg.into())
    }
}

pub type TaskResult<T> = Result<T, TaskError>;
