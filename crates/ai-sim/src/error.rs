use ai_activity::ActivityError;
use ai_core::AgentId;
use ai_sched::SchedError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("world configuration error: {0}")]
    Config(String),

    #[error("no entity {0}")]
    UnknownAgent(AgentId),

    #[error("{0} has been despawned")]
    Despawned(AgentId),

    #[error("{0} has no task manager")]
    NoBrain(AgentId),

    #[error("{0} has no activities")]
    NoActivities(AgentId),

    #[error(transparent)]
    Activity(#[from] ActivityError),

    #[error(transparent)]
    Sched(#[from] SchedError),
}

pub type SimResult<T> = Result<T, SimError>;
