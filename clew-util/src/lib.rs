//! Interner, regex pool, and retry/backoff utilities.
//!
//! None of this crate depends on `clew-core`: it is pure infrastructure
//! reusable by the extractor, the compiler, and the semantic collaborator.

pub mod interner;
pub mod regex_pool;
pub mod retry;

pub use interner::Interner;
pub use retry::{
    RetryConfig, RetryableError, calculate_backoff, calculate_backoff_with_rng,
    is_retryable_error, is_retryable_status, with_retry,
};
