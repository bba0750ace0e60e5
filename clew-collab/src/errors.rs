//! Error type for semantic-collaborator transport failures.
//!
//! One root enum, `#[from]` conversions for `reqwest`/`serde_json`, and a
//! [`clew_util::RetryableError`] impl so [`clew_util::with_retry`] can
//! drive calls into this crate without knowing its error type up front.

use clew_util::RetryableError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollaboratorError>;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("collaborator transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("collaborator returned invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("collaborator endpoint not configured")]
    NotConfigured,

    #[error("collaborator call timed out")]
    Timeout,
}

impl RetryableError for CollaboratorError {
    fn is_network_error(&self) -> bool {
        matches!(self, CollaboratorError::Timeout)
            || matches!(self, CollaboratorError::Transport(e) if e.is_timeout() || e.is_connect())
    }

    fn status_code(&self) -> Option<u16> {
        match self {
            CollaboratorError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
