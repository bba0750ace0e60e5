//! The extractor's four-stage pipeline: parse, extract identifiers,
//! match patterns, optionally refine semantically. Each stage is a plain
//! function the orchestrator calls in sequence, with the result of one
//! stage feeding the next.

use crate::config::ExtractorConfig;
use crate::cst;
use crate::identifiers;
use crate::language::{self, Language};
use crate::patterns;
use clew_core::{ConstraintSet, Error, RefinementCandidate, Result};
use clew_collab::SemanticCollaborator;
use tracing::{debug, info, warn};

/// Runs stages 1-3 (parse, identifiers, patterns) without any semantic
/// refinement. Most callers should use [`extract`] instead; this is exposed
/// for callers that have already decided refinement isn't warranted (e.g.
/// batch re-extraction where a collaborator round-trip would be wasteful).
pub fn extract_offline(
    source: &str,
    language: Language,
    config: &ExtractorConfig,
) -> Result<ConstraintSet> {
    if source.len() > config.max_source_bytes {
        return Err(Error::SourceTooLarge {
            limit_bytes: config.max_source_bytes,
        });
    }

    let set_name = format!("{language}-extract");
    let mut set = ConstraintSet::new(set_name);

    if source.trim().is_empty() {
        debug!(%language, "empty source, returning empty constraint set");
        return Ok(set);
    }

    let tree = cst::parse(source, language, config.parse_timeout_micros)?;
    let declarations = identifiers::extract_declarations(tree.root_node(), source, language);
    info!(%language, count = declarations.len(), "stage 2: identifiers extracted");

    let mut next_id: u64 = 0;
    for decl in &declarations {
        let kind = clew_core::ConstraintKind::Syntactic;
        let id = next_id;
        next_id += 1;
        set.push(
            clew_core::Constraint::new(
                id,
                decl.name.clone(),
                format!("{} `{}` declared", decl.node_kind, decl.name),
                kind,
                clew_core::ConstraintSource::Identifier,
                clew_core::Severity::Info,
                0.6,
            )
            .with_origin(format!("{language}"), decl.start_line as u32),
        );
    }

    for constraint in patterns::apply(source, language, &declarations, &mut next_id) {
        set.push(constraint);
    }
    info!(total = set.len(), "stage 3: pattern matching complete");

    Ok(set)
}

/// Runs the full pipeline, including stage 4 (semantic refinement) when
/// `config.enable_semantic_refinement` is set and `collaborator` is
/// provided. A collaborator failure is logged and swallowed — refinement is
/// always best-effort and never fails extraction.
pub async fn extract(
    source: &str,
    language: Language,
    config: &ExtractorConfig,
    collaborator: Option<&dyn SemanticCollaborator>,
) -> Result<ConstraintSet> {
    let mut set = extract_offline(source, language, config)?;

    if !config.enable_semantic_refinement || set.is_empty() {
        return Ok(set);
    }

    if let Some(collaborator) = collaborator {
        let candidates: Vec<RefinementCandidate> = set
            .iter()
            .map(|c| RefinementCandidate {
                constraint: c.clone(),
            })
            .collect();

        match collaborator.refine(&candidates).await {
            Ok(extra) => {
                let mut next_id = set.len() as u64;
                for mut constraint in extra {
                    constraint.id = next_id;
                    next_id += 1;
                    constraint.source = clew_core::ConstraintSource::LlmAnalysis;
                    set.push(constraint);
                }
            }
            Err(err) => {
                warn!(error = %err, "stage 4: semantic refinement failed, continuing without it");
            }
        }
    }

    Ok(set)
}

/// The extractor's public contract as spec'd: a caller-supplied language
/// label resolved against the supported-language table, `UnsupportedLanguage`
/// for anything not in it. Delegates to [`extract_offline`] once the label
/// resolves.
pub fn extract_offline_labeled(
    source: &str,
    language_label: &str,
    config: &ExtractorConfig,
) -> Result<ConstraintSet> {
    let language = language::resolve(language_label)?;
    extract_offline(source, language, config)
}

/// As [`extract_offline_labeled`], but runs the full pipeline including
/// stage 4 (semantic refinement) like [`extract`].
pub async fn extract_labeled(
    source: &str,
    language_label: &str,
    config: &ExtractorConfig,
    collaborator: Option<&dyn SemanticCollaborator>,
) -> Result<ConstraintSet> {
    let language = language::resolve(language_label)?;
    extract(source, language, config, collaborator).await
}
