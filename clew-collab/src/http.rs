//! HTTP-backed semantic collaborator.
//!
//! Talks to a single JSON endpoint exposing `POST {base}/refine` and
//! `POST {base}/resolve`. The wire format on that endpoint is this crate's
//! own business, not a protocol transport layer needs to standardize on —
//! this implementation exists so the trait has one concrete, realistic
//! caller: a single reused `reqwest::Client` with a per-call timeout.
//!
//! The credential string is held only in memory and is never logged.

use crate::errors::{CollaboratorError, Result};
use crate::SemanticCollaborator;
use async_trait::async_trait;
use clew_core::{ConflictPair, Constraint, RefinementCandidate, ResolutionSuggestion};
use clew_util::RetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for an [`HttpCollaborator`]. `credential` is intentionally
/// opaque to this struct's `Debug` impl consumers should avoid logging it
/// directly.
#[derive(Clone)]
pub struct HttpCollaboratorConfig {
    pub base_url: String,
    pub credential: Option<String>,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for HttpCollaboratorConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            credential: None,
            timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
        }
    }
}

pub struct HttpCollaborator {
    client: reqwest::Client,
    config: HttpCollaboratorConfig,
}

#[derive(Serialize)]
struct RefineRequest<'a> {
    candidates: &'a [RefinementCandidate],
}

#[derive(Deserialize)]
struct RefineResponse {
    extra_constraints: Vec<Constraint>,
}

#[derive(Serialize)]
struct ResolveRequest<'a> {
    conflicts: &'a [ConflictPair],
}

#[derive(Deserialize)]
struct ResolveResponse {
    actions: Vec<ResolutionSuggestion>,
}

impl HttpCollaborator {
    pub fn new(config: HttpCollaboratorConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn request_builder(&self, path: &str) -> Result<reqwest::RequestBuilder> {
        if self.config.base_url.is_empty() {
            return Err(CollaboratorError::NotConfigured);
        }
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let mut builder = self.client.post(url);
        if let Some(credential) = &self.config.credential {
            builder = builder.bearer_auth(credential);
        }
        Ok(builder)
    }
}

#[async_trait]
impl SemanticCollaborator for HttpCollaborator {
    async fn refine(&self, candidates: &[RefinementCandidate]) -> Result<Vec<Constraint>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let call = || async {
            let builder = self.request_builder("refine")?;
            let resp = builder
                .json(&RefineRequest { candidates })
                .send()
                .await
                .map_err(CollaboratorError::from)?;
            if !resp.status().is_success() {
                return Err(CollaboratorError::Transport(
                    resp.error_for_status().unwrap_err(),
                ));
            }
            let parsed: RefineResponse = resp.json().await.map_err(CollaboratorError::from)?;
            Ok(parsed.extra_constraints)
        };
        match clew_util::with_retry(&self.config.retry, call).await {
            Ok(v) => {
                debug!(count = v.len(), "collaborator refine returned constraints");
                Ok(v)
            }
            Err(e) => {
                warn!(error = %e, "collaborator refine failed, continuing without it");
                Err(e)
            }
        }
    }

    async fn suggest_resolution(
        &self,
        conflicts: &[ConflictPair],
    ) -> Result<Vec<ResolutionSuggestion>> {
        if conflicts.is_empty() {
            return Ok(Vec::new());
        }
        let call = || async {
            let builder = self.request_builder("resolve")?;
            let resp = builder
                .json(&ResolveRequest { conflicts })
                .send()
                .await
                .map_err(CollaboratorError::from)?;
            if !resp.status().is_success() {
                return Err(CollaboratorError::Transport(
                    resp.error_for_status().unwrap_err(),
                ));
            }
            let parsed: ResolveResponse = resp.json().await.map_err(CollaboratorError::from)?;
            Ok(parsed.actions)
        };
        match clew_util::with_retry(&self.config.retry, call).await {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(error = %e, "collaborator suggest_resolution failed, falling back to default resolution");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refine_without_base_url_is_not_configured() {
        let collaborator = HttpCollaborator::new(HttpCollaboratorConfig::default()).unwrap();
        let candidate = RefinementCandidate {
            constraint: clew_core::Constraint::new(
                1,
                "x",
                "y",
                clew_core::ConstraintKind::Syntactic,
                clew_core::ConstraintSource::Identifier,
                clew_core::Severity::Info,
                0.5,
            ),
        };
        let err = collaborator.refine(&[candidate]).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::NotConfigured));
    }

    #[tokio::test]
    async fn refine_with_empty_candidates_short_circuits() {
        let collaborator = HttpCollaborator::new(HttpCollaboratorConfig::default()).unwrap();
        let out = collaborator.refine(&[]).await.unwrap();
        assert!(out.is_empty());
    }
}
