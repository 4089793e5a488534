//! Pipeline Error Taxonomy

use crate::generator::GeneratorError;

/// Everything a controller command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A collaborator payload failed a structural check, or a command
    /// argument was unusable. Aborts the stage; not retried.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The collaborator call itself failed. Aborts the stage; not retried.
    #[error("generation backend failure: {0}")]
    Backend(String),
    /// A feedback request arrived before every question was answered.
    /// Rejected locally; no pipeline state changes.
    #[error("answers cover {answered} of {expected} questions")]
    IncompleteAnswers { answered: usize, expected: usize },
    /// A command arrived while another one is still being processed.
    #[error("already processing a request")]
    Busy,
}

impl From<GeneratorError> for PipelineError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::Backend(message) => PipelineError::Backend(message),
            GeneratorError::Malformed(message) => PipelineError::Validation(message),
        }
    }
}
