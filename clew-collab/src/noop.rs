//! A collaborator that never adds constraints and never suggests a
//! resolution. This is the default when no semantic collaborator is
//! configured — extraction and conflict resolution both fall back to
//! offline-only extraction and the priority-based default resolution.

use crate::{Result, SemanticCollaborator};
use async_trait::async_trait;
use clew_core::{ConflictPair, Constraint, RefinementCandidate, ResolutionSuggestion};

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCollaborator;

#[async_trait]
impl SemanticCollaborator for NoopCollaborator {
    async fn refine(&self, _candidates: &[RefinementCandidate]) -> Result<Vec<Constraint>> {
        Ok(Vec::new())
    }

    async fn suggest_resolution(
        &self,
        _conflicts: &[ConflictPair],
    ) -> Result<Vec<ResolutionSuggestion>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refine_returns_empty() {
        let collaborator = NoopCollaborator;
        let out = collaborator.refine(&[]).await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn suggest_resolution_returns_empty() {
        let collaborator = NoopCollaborator;
        let out = collaborator.suggest_resolution(&[]).await.unwrap();
        assert!(out.is_empty());
    }
}
