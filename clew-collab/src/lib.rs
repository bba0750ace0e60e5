//! The semantic collaborator: an abstract, replaceable interface to an
//! external analyzer (typically an LLM) that the extractor and the
//! conflict resolver may optionally consult. Transport is out of scope
//! for this crate; it defines the contract and ships a no-op default plus
//! a thin HTTP-backed implementation other binaries can wire a real
//! endpoint into.

pub mod errors;
pub mod http;
pub mod noop;

pub use errors::{CollaboratorError, Result};

use async_trait::async_trait;
use clew_core::{ConflictPair, Constraint, RefinementCandidate, ResolutionSuggestion};

/// Two operations: refine a batch of candidate constraints, and suggest how
/// to resolve a detected conflict pair. Both are best-effort — callers must
/// treat any error as non-fatal rather than failing the pipeline.
#[async_trait]
pub trait SemanticCollaborator: Send + Sync {
    async fn refine(&self, candidates: &[RefinementCandidate]) -> Result<Vec<Constraint>>;

    async fn suggest_resolution(&self, conflicts: &[ConflictPair]) -> Result<Vec<ResolutionSuggestion>>;
}

pub use http::HttpCollaborator;
pub use noop::NoopCollaborator;
