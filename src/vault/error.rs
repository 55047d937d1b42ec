use crate::dataverse::DataverseError;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("no draft version found for dataset {global_id}")]
    NotFound { global_id: String },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InconsistentState(String),
    #[error(transparent)]
    Repository(#[from] DataverseError),
}

impl TaskError {
    /// Short label used as the log event suffix.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::InconsistentState(_) => "inconsistent_state",
            Self::Repository(_) => "repository",
        }
    }
}
