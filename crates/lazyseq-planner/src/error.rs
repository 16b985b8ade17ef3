use lazyseq_core::SeqError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid query: {0}")]
    Invalid(String),

    #[error(transparent)]
    Seq(#[from] SeqError),
}

impl PlanError {
    /// The engine error behind this failure, if any.
    pub fn as_seq(&self) -> Option<&SeqError> {
        match self {
            PlanError::Seq(e) => Some(e),
            _ => None,
        }
    }
}
