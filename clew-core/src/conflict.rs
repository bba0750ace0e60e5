//! Conflict vocabulary shared between `braid-compile`'s conflict resolver
//! and the semantic collaborator's `suggest_resolution` operation.

use crate::model::Constraint;
use serde::{Deserialize, Serialize};

/// A pair of constraints (by id) flagged as mutually conflicting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPair {
    pub a: u64,
    pub b: u64,
}

/// A collaborator's suggested way to resolve a [`ConflictPair`].
///
/// `Merge` and `Modify*` are accepted as data so the contract is complete,
/// but the default implementation in `braid-compile` logs them and falls
/// back to priority-based resolution rather than executing them (Open
/// Question (a), see DESIGN.md).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResolutionAction {
    DisableA,
    DisableB,
    Merge,
    ModifyA,
    ModifyB,
}

/// A collaborator's full answer for one conflicting pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionSuggestion {
    pub pair: ConflictPair,
    pub action: ResolutionAction,
    pub rationale: String,
}

/// One constraint batched up for semantic refinement (stage 4 of the
/// extractor pipeline).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementCandidate {
    pub constraint: Constraint,
}
