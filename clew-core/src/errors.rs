//! Crate-wide error taxonomy shared by the extractor, compiler, and facade.
//!
//! One root [`Error`] covers every surfaced failure named in the error
//! taxonomy; each variant carries a short, already-sanitized message so
//! callers can log or display it directly.

use thiserror::Error;

/// Convenient alias used across the pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type. Matches the taxonomy:
/// `Ok | UnsupportedLanguage | SourceTooLarge | ParseTimeout |
/// EmptyConstraintSet | CyclicDependency | InvalidInput |
/// AllocationFailure | CollaboratorUnavailable`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("source exceeds maximum size of {limit_bytes} bytes")]
    SourceTooLarge { limit_bytes: usize },

    #[error("parse timed out after {micros} microseconds")]
    ParseTimeout { micros: u64 },

    #[error("cannot compile an empty constraint set")]
    EmptyConstraintSet,

    #[error("cyclic dependency among constraints: {}", .offending.join(", "))]
    CyclicDependency { offending: Vec<String> },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("allocation failure: {0}")]
    AllocationFailure(String),

    #[error("semantic collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The stable, user-facing taxonomy code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnsupportedLanguage(_) => "UnsupportedLanguage",
            Error::SourceTooLarge { .. } => "SourceTooLarge",
            Error::ParseTimeout { .. } => "ParseTimeout",
            Error::EmptyConstraintSet => "EmptyConstraintSet",
            Error::CyclicDependency { .. } => "CyclicDependency",
            Error::InvalidInput(_) => "InvalidInput",
            Error::AllocationFailure(_) => "AllocationFailure",
            Error::CollaboratorUnavailable(_) => "CollaboratorUnavailable",
            Error::Json(_) => "InvalidInput",
        }
    }
}
