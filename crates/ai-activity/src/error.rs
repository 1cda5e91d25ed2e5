use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("activity parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("activity {code:?} has no actions")]
    NoActions { code: String },

    #[error("unknown activity {code:?}")]
    UnknownActivity { code: String },
}

pub type ActivityResult<T> = Result<T, ActivityError>;
