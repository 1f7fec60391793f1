//! Error taxonomy for core collage operations
//!
//! Core operations never panic across the dispatch boundary. They return
//! `CoreError`, and the session handlers log and drop the failed mutation.

/// Failure of a core mesh, fitting, or selection operation
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A vertex or piece id was referenced but is absent
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Input rejected at the boundary (out of range, unknown key, bad file)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Operation not applicable to the current state
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl CoreError {
    pub fn vertex_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind: "vertex",
            id: id.into(),
        }
    }

    pub fn piece_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind: "piece",
            id: id.into(),
        }
    }

    pub fn invalid<T: ToString>(msg: T) -> Self {
        CoreError::InvalidInput(msg.to_string())
    }

    pub fn unsupported<T: ToString>(msg: T) -> Self {
        CoreError::Unsupported(msg.to_string())
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
