use ai_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown task code {code:?}")]
    UnknownTaskCode { code: String },

    #[error("config error for task {code:?} on {agent}: {source}")]
    Config {
        code:   String,
        agent:  AgentId,
        #[source]
        source: serde_json::Error,
    },

    #[error("task list parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
