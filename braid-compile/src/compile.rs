//! Braid's compile pipeline: build the dependency graph, detect
//! and resolve conflicts, topologically order the survivors, mark priority,
//! and emit the four IR fragments (schema, grammar, regex, token mask).

use crate::cache::{self, CompileCache};
use crate::conflict;
use crate::graph::ConstraintGraph;
use crate::{json_schema, token_mask};
use clew_core::{
    Constraint, ConstraintIr, ConstraintKind, ConstraintSet, Error, Grammar, GrammarRule,
    RegexPattern, Result, ResolutionSuggestion, Severity,
};
use clew_collab::SemanticCollaborator;
use clew_util::Interner;
use tracing::{debug, info};

/// Priority assigned to any constraint whose severity is `Error`:
/// error-severity constraints are pinned to the top decode priority.
const ERROR_PRIORITY: u32 = 1000;

/// Compiles `set` into a [`ConstraintIr`] with no collaborator consulted
/// and no cache. Most callers should go through [`compile_cached`] or
/// [`compile_with_collaborator`] instead.
pub fn compile(set: &ConstraintSet) -> Result<ConstraintIr> {
    if set.is_empty() {
        return Err(Error::EmptyConstraintSet);
    }

    let deduplicated = set.deduplicated();
    let mut constraints = deduplicated;

    let pairs = conflict::detect(&constraints);
    debug!(count = pairs.len(), "stage b: conflicts detected");
    let mut resolutions: Vec<ResolutionSuggestion> = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        resolutions.push(conflict::resolve_default(pair, &mut constraints));
    }

    finish_compile(set.name.clone(), constraints, resolutions)
}

/// As [`compile`], but consults `collaborator` for each detected conflict
/// before falling back to the default resolution, and offers every enabled
/// constraint up for semantic refinement first. Collaborator failures are
/// logged and treated as "no suggestion".
pub async fn compile_with_collaborator(
    set: &ConstraintSet,
    collaborator: &dyn SemanticCollaborator,
) -> Result<ConstraintIr> {
    if set.is_empty() {
        return Err(Error::EmptyConstraintSet);
    }

    let mut constraints = set.deduplicated();
    let pairs = conflict::detect(&constraints);

    let conflict_pairs: Vec<_> = pairs.clone();
    let suggestions = if !conflict_pairs.is_empty() {
        collaborator
            .suggest_resolution(&conflict_pairs)
            .await
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let mut resolutions = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        if let Some(suggestion) = suggestions.iter().find(|s| s.pair == *pair) {
            resolutions.push(conflict::apply_suggestion(suggestion, &mut constraints));
        } else {
            resolutions.push(conflict::resolve_default(pair, &mut constraints));
        }
    }

    finish_compile(set.name.clone(), constraints, resolutions)
}

/// As [`compile`], but checks `cache` first, keyed by the set's content
/// fingerprint, and stores the result before returning it.
pub fn compile_cached(set: &ConstraintSet, cache: &mut CompileCache) -> Result<ConstraintIr> {
    let key = cache::fingerprint(set);
    if let Some(hit) = cache.get(&key) {
        info!(%key, "compile cache hit");
        return Ok(hit);
    }
    let ir = compile(set)?;
    cache.put(key, ir.clone());
    Ok(ir)
}

fn finish_compile(
    name: String,
    constraints: Vec<Constraint>,
    resolutions: Vec<ResolutionSuggestion>,
) -> Result<ConstraintIr> {
    let enabled: Vec<Constraint> = constraints.iter().filter(|c| c.enabled).cloned().collect();
    if enabled.is_empty() {
        return Err(Error::EmptyConstraintSet);
    }

    let names: Vec<String> = enabled.iter().map(|c| c.name.clone()).collect();
    let graph = ConstraintGraph::build(&enabled);
    let order = graph.topological_order_named(Some(&names))?;
    debug!(count = order.len(), "stage c: topological order computed");

    let priority = if enabled.iter().any(|c| c.severity == Severity::Error) {
        ERROR_PRIORITY
    } else {
        enabled.iter().map(|c| (c.confidence * 100.0) as u32).max().unwrap_or(0)
    };

    let ordered: Vec<&Constraint> = order.iter().map(|&i| &enabled[i]).collect();

    let json_schema = ordered
        .iter()
        .find(|c| c.kind == ConstraintKind::TypeSafety)
        .map(|c| json_schema::compile(&c.description));

    let grammar = Some(emit_grammar(&ordered));
    let regex_patterns = emit_regex(&ordered);
    let security = token_mask::security_subset(&enabled);
    let token_masks = token_mask::build(&security);

    debug!(resolved_conflicts = resolutions.len(), "stage e: IR assembled");

    Ok(ConstraintIr {
        json_schema,
        grammar,
        regex_patterns,
        token_masks,
        priority,
        name,
        hole_specs: None,
    })
}

/// Emits a grammar with one rule per kind present among `ordered`, each
/// rule's productions the (interned, deduplicated) constraint names of that
/// kind, and a `root` rule referencing every kind-rule in dependency order.
fn emit_grammar(ordered: &[&Constraint]) -> Grammar {
    let mut interner = Interner::new();
    let mut rules: Vec<GrammarRule> = Vec::new();
    let mut root_productions: Vec<String> = Vec::new();

    for kind in [
        ConstraintKind::Syntactic,
        ConstraintKind::TypeSafety,
        ConstraintKind::Semantic,
        ConstraintKind::Architectural,
        ConstraintKind::Operational,
        ConstraintKind::Security,
    ] {
        let names: Vec<String> = ordered
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| interner.intern(&c.name).to_string())
            .collect();
        if names.is_empty() {
            continue;
        }
        let rule_name = format!("{kind:?}").to_ascii_lowercase();
        root_productions.push(rule_name.clone());
        rules.push(GrammarRule {
            name: rule_name,
            productions: names,
        });
    }

    rules.push(GrammarRule {
        name: "root".to_string(),
        productions: root_productions,
    });

    Grammar {
        start_symbol: "root".to_string(),
        rules,
    }
}

/// Baseline regex set (the static pool) plus one case-insensitive literal
/// pattern per enabled security constraint's trigger name.
fn emit_regex(ordered: &[&Constraint]) -> Vec<RegexPattern> {
    let mut patterns: Vec<RegexPattern> = clew_util::regex_pool::POOL
        .iter()
        .map(|p| RegexPattern {
            pattern: p.pattern.to_string(),
            flags: String::new(),
        })
        .collect();

    for c in ordered {
        if c.kind == ConstraintKind::Security {
            patterns.push(RegexPattern {
                pattern: format!("(?i){}", regex::escape(&c.name)),
                flags: String::new(),
            });
        }
    }

    patterns
}
