//! Core data model: [`Constraint`], [`ConstraintSet`], [`ConstraintGraph`],
//! and [`ConstraintIR`].
//!
//! Kept as a closed set of sum types rather than any form of dynamic
//! introspection: `ConstraintKind`, `Severity`, and
//! `ConstraintSource` are plain enums, and `ConstraintIR`'s fragments are
//! just optional fields rather than a tagged union over a trait object.

use serde::{Deserialize, Serialize};

/// Category of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Syntactic,
    TypeSafety,
    Semantic,
    Architectural,
    Operational,
    Security,
}

/// Where a constraint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintSource {
    AstPattern,
    Identifier,
    UserDefined,
    LlmAnalysis,
    Dsl,
}

/// Totally ordered severity label, used for conflict tie-breaking.
///
/// Declaration order is significant: `Hint < Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Hint,
    Info,
    Warning,
    Error,
}

/// A named, typed rule about what generated code must or must not contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    /// Stable identifier within a set.
    pub id: u64,
    /// Short lowercase identifier (sanitized).
    pub name: String,
    /// Free-form text (sanitized).
    pub description: String,
    pub kind: ConstraintKind,
    pub source: ConstraintSource,
    pub severity: Severity,
    /// Real in `[0, 1]`.
    pub confidence: f64,
    /// Observed occurrence count.
    pub frequency: u64,
    pub origin_file: Option<String>,
    pub origin_line: Option<u32>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Constraint {
    /// Builds a constraint with sanitized `name`/`description` and
    /// `confidence` clamped to `[0, 1]`.
    pub fn new(
        id: u64,
        name: impl AsRef<str>,
        description: impl AsRef<str>,
        kind: ConstraintKind,
        source: ConstraintSource,
        severity: Severity,
        confidence: f64,
    ) -> Self {
        Self {
            id,
            name: crate::sanitize::sanitize_name(name.as_ref()),
            description: crate::sanitize::sanitize_description(description.as_ref()),
            kind,
            source,
            severity,
            confidence: confidence.clamp(0.0, 1.0),
            frequency: 1,
            origin_file: None,
            origin_line: None,
            enabled: true,
        }
    }

    pub fn with_origin(mut self, file: impl Into<String>, line: u32) -> Self {
        self.origin_file = Some(file.into());
        self.origin_line = Some(line);
        self
    }

    pub fn with_frequency(mut self, frequency: u64) -> Self {
        self.frequency = frequency;
        self
    }
}

/// An ordered, named collection of constraints produced by the extractor.
///
/// Insertion order is preserved until compilation; the set may be empty
/// (compiling an empty set is a declared error, see [`crate::errors::Error::EmptyConstraintSet`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintSet {
    pub name: String,
    pub constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: crate::sanitize::sanitize_name(&name.into()),
            constraints: Vec::new(),
        }
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Folds constraints sharing the same `(kind, name)` pair, summing
    /// `frequency` and keeping the highest-confidence description. A
    /// `ConstraintSet` may hold duplicate `(kind, name)` pairs from
    /// independent extraction passes; this is the compiler-side folding
    /// step that reconciles them before compilation.
    pub fn deduplicated(&self) -> Vec<Constraint> {
        let mut seen: Vec<Constraint> = Vec::with_capacity(self.constraints.len());
        for c in &self.constraints {
            if let Some(existing) = seen
                .iter_mut()
                .find(|e| e.kind == c.kind && e.name == c.name)
            {
                existing.frequency += c.frequency;
                if c.confidence > existing.confidence {
                    existing.description = c.description.clone();
                    existing.confidence = c.confidence;
                }
            } else {
                seen.push(c.clone());
            }
        }
        seen
    }
}

/// One compiled field fragment: `{pattern, flags}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegexPattern {
    pub pattern: String,
    pub flags: String,
}

/// Allowed/forbidden token-mask fragment for downstream constrained decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenMasks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_tokens: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forbidden_tokens: Option<Vec<String>>,
}

impl TokenMasks {
    pub fn is_empty(&self) -> bool {
        self.allowed_tokens.is_none() && self.forbidden_tokens.is_none()
    }
}

/// A single refinement slot reserved for a collaborator-driven follow-up
/// pass (e.g. "ask the model to fill in this union's member list").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoleSpec {
    pub slot_name: String,
    pub description: String,
}

/// A context-free grammar fragment: rules plus a start symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grammar {
    pub start_symbol: String,
    /// Rule name -> ordered list of alternative literal/nonterminal productions.
    pub rules: Vec<GrammarRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarRule {
    pub name: String,
    pub productions: Vec<String>,
}

/// The compiled, machine-consumable bundle: schema + grammar + regex + masks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintIr {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar: Option<Grammar>,
    pub regex_patterns: Vec<RegexPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_masks: Option<TokenMasks>,
    pub priority: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole_specs: Option<Vec<HoleSpec>>,
}
