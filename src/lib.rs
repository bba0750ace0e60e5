//! High-level orchestration over the Clew/Braid pipeline.
//!
//! This crate contains a single public entry point, [`Pipeline`], tying
//! together extraction (`clew-extract`), compilation (`braid-compile`), and
//! wire-schema serialization as one staged, logged orchestration.
//!
//! # Steps
//! 1. **Extract**: parse source via `clew-extract` into a `ConstraintSet`.
//! 2. **Compile**: resolve conflicts and emit a `ConstraintIr` via
//!    `braid-compile`, optionally served from the content-addressed cache.
//! 3. **Serialize**: encode the `ConstraintIr` as the stable wire JSON shape
//!    downstream constrained decoders consume.

use braid_compile::{compile, compile_cached, compile_with_collaborator, CompileCache};
use clew_collab::SemanticCollaborator;
use clew_core::{ConstraintIr, ConstraintSet, Error, Grammar, Result, TokenMasks};
use clew_extract::{extract, extract_offline, ExtractorConfig, Language};
use serde::Serialize;
use tracing::info;

/// The stable text wire shape external consumers decode against (spec §6):
/// a fixed `{type, version, ...fragments}` envelope, distinct from
/// `ConstraintIr`'s own Rust-side field names (`regex_patterns` vs.
/// `patterns`, no `name`/`hole_specs` on the wire). Absent optional
/// fragments are omitted entirely rather than serialized as `null`.
#[derive(Serialize)]
struct WireSchema<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_schema: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grammar: Option<&'a Grammar>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    patterns: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_masks: Option<&'a TokenMasks>,
    priority: u32,
}

impl<'a> From<&'a ConstraintIr> for WireSchema<'a> {
    fn from(ir: &'a ConstraintIr) -> Self {
        Self {
            kind: "guidance",
            version: "1.0",
            json_schema: ir.json_schema.as_ref(),
            grammar: ir.grammar.as_ref(),
            patterns: ir.regex_patterns.iter().map(|p| p.pattern.as_str()).collect(),
            token_masks: ir.token_masks.as_ref().filter(|m| !m.is_empty()),
            priority: ir.priority,
        }
    }
}

/// Facade over the full constraint-mining pipeline: extraction, compilation,
/// and wire serialization, with an optional semantic collaborator and a
/// bounded in-memory compile cache.
pub struct Pipeline {
    extractor_config: ExtractorConfig,
    collaborator: Option<Box<dyn SemanticCollaborator>>,
    cache: CompileCache,
}

impl Pipeline {
    pub fn new(extractor_config: ExtractorConfig, cache_capacity: usize) -> Self {
        Self {
            extractor_config,
            collaborator: None,
            cache: CompileCache::new(cache_capacity),
        }
    }

    pub fn with_collaborator(mut self, collaborator: Box<dyn SemanticCollaborator>) -> Self {
        self.collaborator = Some(collaborator);
        self
    }

    /// Stage 1: extract a constraint set from `source`, consulting the
    /// wired collaborator for stage-4 refinement when configured.
    #[tracing::instrument(level = "info", skip_all, fields(%language))]
    pub async fn extract(&self, source: &str, language: Language) -> Result<ConstraintSet> {
        let set = match &self.collaborator {
            Some(collaborator) => {
                extract(source, language, &self.extractor_config, Some(collaborator.as_ref())).await?
            }
            None => extract_offline(source, language, &self.extractor_config)?,
        };
        info!(count = set.len(), "extracted constraint set");
        Ok(set)
    }

    /// As [`Self::extract`], but takes the caller-facing language label
    /// (spec §4.1's public contract) instead of a resolved [`Language`],
    /// surfacing `UnsupportedLanguage` for anything not in the table.
    #[tracing::instrument(level = "info", skip_all, fields(%language_label))]
    pub async fn extract_labeled(&self, source: &str, language_label: &str) -> Result<ConstraintSet> {
        let language = clew_extract::Language::from_label(language_label)
            .ok_or_else(|| Error::UnsupportedLanguage(language_label.to_string()))?;
        self.extract(source, language).await
    }

    /// Stage 2: compile a constraint set into a `ConstraintIr`, serving from
    /// (and populating) the compile cache.
    #[tracing::instrument(level = "info", skip_all)]
    pub fn compile(&mut self, set: &ConstraintSet) -> Result<ConstraintIr> {
        compile_cached(set, &mut self.cache)
    }

    /// As [`Self::compile`], but consults the wired collaborator for
    /// conflict resolution instead of the default priority rule. Bypasses
    /// the cache, since the collaborator's answer may differ run to run.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn compile_with_collaborator(&self, set: &ConstraintSet) -> Result<ConstraintIr> {
        match &self.collaborator {
            Some(collaborator) => compile_with_collaborator(set, collaborator.as_ref()).await,
            None => compile(set),
        }
    }

    /// Stage 3: encodes a `ConstraintIr` as the stable wire JSON shape
    /// (`{"type":"guidance","version":"1.0",...}`, see spec §6). Absent
    /// optional fragments are omitted entirely rather than serialized as
    /// `null`.
    pub fn to_wire_schema(ir: &ConstraintIr) -> Result<Vec<u8>> {
        serde_json::to_vec(&WireSchema::from(ir)).map_err(Error::from)
    }
}
