//! Conflict detection and resolution: constraints in the
//! same kind bucket are compared pairwise against a table of mutually
//! exclusive rule names (spec §4.5), extended with an antonym-description
//! heuristic for rule pairs that weren't registered by name. Bucketing by
//! kind first keeps the comparison to O(n^2/k) instead of O(n^2) over the
//! whole set.

use clew_core::{Constraint, ConflictPair, ResolutionAction, ResolutionSuggestion, Severity};
use std::collections::HashMap;

/// Rule-name pairs registered as mutually exclusive, per spec §4.5's
/// example ("the set containing `forbid_any` conflicts with the set
/// containing `allow_any`"). Extensible: add further pairs here as new
/// rules are registered.
const NAME_CONFLICTS: &[(&str, &str)] = &[("forbid_any", "allow_any")];

/// Antonym keyword pairs that, when one appears in constraint A's
/// description and the other in constraint B's, mark the pair as
/// conflicting (assuming they otherwise address the same named subject).
/// A fallback for rule pairs not registered in `NAME_CONFLICTS` by name.
const ANTONYMS: &[(&str, &str)] = &[
    ("avoid", "require"),
    ("forbidden", "allowed"),
    ("disable", "enable"),
    ("must not", "must"),
    ("never", "always"),
];

fn mentions(description: &str, keyword: &str) -> bool {
    description.to_ascii_lowercase().contains(keyword)
}

fn is_opposing(a: &str, b: &str) -> bool {
    ANTONYMS.iter().any(|(x, y)| {
        (mentions(a, x) && mentions(b, y)) || (mentions(a, y) && mentions(b, x))
    })
}

/// True if `a`/`b` form a registered mutually-exclusive name pair,
/// case-insensitively and in either order.
fn conflicts_by_name(a: &str, b: &str) -> bool {
    NAME_CONFLICTS.iter().any(|(x, y)| {
        (a.eq_ignore_ascii_case(x) && b.eq_ignore_ascii_case(y))
            || (a.eq_ignore_ascii_case(y) && b.eq_ignore_ascii_case(x))
    })
}

fn conflicts(a: &Constraint, b: &Constraint) -> bool {
    conflicts_by_name(&a.name, &b.name) || is_opposing(&a.description, &b.description)
}

/// Groups constraint indices by kind, then scans only within-bucket pairs.
pub fn detect(constraints: &[Constraint]) -> Vec<ConflictPair> {
    let mut buckets: HashMap<clew_core::ConstraintKind, Vec<usize>> = HashMap::new();
    for (i, c) in constraints.iter().enumerate() {
        buckets.entry(c.kind).or_default().push(i);
    }

    let mut pairs = Vec::new();
    for indices in buckets.values() {
        for (pos, &i) in indices.iter().enumerate() {
            for &j in &indices[pos + 1..] {
                let a = &constraints[i];
                let b = &constraints[j];
                if conflicts(a, b) {
                    pairs.push(ConflictPair { a: a.id, b: b.id });
                }
            }
        }
    }
    pairs
}

/// Default priority-based resolution: absent a collaborator suggestion,
/// the higher-severity constraint wins; ties favor the lower id. Disables
/// the loser's `enabled` flag in place.
pub fn resolve_default(pair: &ConflictPair, constraints: &mut [Constraint]) -> ResolutionSuggestion {
    let a_idx = constraints.iter().position(|c| c.id == pair.a).expect("pair.a must exist");
    let b_idx = constraints.iter().position(|c| c.id == pair.b).expect("pair.b must exist");

    let (a_severity, b_severity) = (constraints[a_idx].severity, constraints[b_idx].severity);
    let disable_a = match a_severity.cmp(&b_severity) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Greater => false,
        std::cmp::Ordering::Equal => {
            let (a_confidence, b_confidence) =
                (constraints[a_idx].confidence, constraints[b_idx].confidence);
            match a_confidence.partial_cmp(&b_confidence) {
                Some(std::cmp::Ordering::Less) => true,
                Some(std::cmp::Ordering::Greater) => false,
                _ => pair.a > pair.b,
            }
        }
    };

    let action = if disable_a {
        constraints[a_idx].enabled = false;
        ResolutionAction::DisableA
    } else {
        constraints[b_idx].enabled = false;
        ResolutionAction::DisableB
    };

    let rationale = format!(
        "default priority resolution: kept severity={:?} over severity={:?}",
        if disable_a { b_severity } else { a_severity },
        if disable_a { a_severity } else { b_severity },
    );

    ResolutionSuggestion {
        pair: pair.clone(),
        action,
        rationale,
    }
}

/// Applies a collaborator-suggested action, falling back to the default
/// rule for any action the compiler doesn't implement as a mutation
/// (`Merge`/`ModifyA`/`ModifyB` — accepted as data, logged, not applied;
/// see the Open Questions resolution in the design notes).
pub fn apply_suggestion(
    suggestion: &ResolutionSuggestion,
    constraints: &mut [Constraint],
) -> ResolutionSuggestion {
    match suggestion.action {
        ResolutionAction::DisableA => {
            if let Some(c) = constraints.iter_mut().find(|c| c.id == suggestion.pair.a) {
                c.enabled = false;
            }
            suggestion.clone()
        }
        ResolutionAction::DisableB => {
            if let Some(c) = constraints.iter_mut().find(|c| c.id == suggestion.pair.b) {
                c.enabled = false;
            }
            suggestion.clone()
        }
        ResolutionAction::Merge | ResolutionAction::ModifyA | ResolutionAction::ModifyB => {
            tracing::warn!(
                pair = ?suggestion.pair,
                action = ?suggestion.action,
                "collaborator suggested an unsupported resolution action, falling back to default priority resolution"
            );
            resolve_default(&suggestion.pair, constraints)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clew_core::{ConstraintSource, ConstraintKind};

    fn c(id: u64, desc: &str, severity: Severity) -> Constraint {
        Constraint::new(id, format!("c{id}"), desc, ConstraintKind::Operational, ConstraintSource::AstPattern, severity, 0.7)
    }

    #[test]
    fn detects_opposing_keywords_in_same_bucket() {
        let constraints = vec![
            c(0, "avoid using raw pointers", Severity::Warning),
            c(1, "require raw pointers for FFI", Severity::Warning),
        ];
        let pairs = detect(&constraints);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn detects_registered_name_conflict_with_unrelated_descriptions() {
        let mut a = Constraint::new(
            0,
            "forbid_any",
            "disallow the `any` type in public signatures",
            ConstraintKind::TypeSafety,
            ConstraintSource::AstPattern,
            Severity::Warning,
            0.7,
        );
        a.kind = ConstraintKind::TypeSafety;
        let mut b = Constraint::new(
            1,
            "allow_any",
            "permit the `any` type for legacy interop",
            ConstraintKind::TypeSafety,
            ConstraintSource::AstPattern,
            Severity::Warning,
            0.7,
        );
        b.kind = ConstraintKind::TypeSafety;
        let pairs = detect(&[a, b]);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn no_conflict_across_kind_buckets() {
        let mut a = c(0, "avoid X", Severity::Warning);
        a.kind = ConstraintKind::Security;
        let b = c(1, "require X", Severity::Warning);
        let pairs = detect(&[a, b]);
        assert!(pairs.is_empty());
    }

    #[test]
    fn default_resolution_disables_lower_severity() {
        let mut constraints = vec![
            c(0, "avoid X", Severity::Hint),
            c(1, "require X", Severity::Error),
        ];
        let pair = ConflictPair { a: 0, b: 1 };
        let suggestion = resolve_default(&pair, &mut constraints);
        assert!(matches!(suggestion.action, ResolutionAction::DisableA));
        assert!(!constraints[0].enabled);
        assert!(constraints[1].enabled);
    }
}
