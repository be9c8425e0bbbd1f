//! Engine errors

use tessel_dom::DomError;

/// Errors surfaced by the engine crate
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("script {path} failed: {message}")]
    Script { path: String, message: String },

    #[error("file not found: {0}")]
    MissingFile(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
