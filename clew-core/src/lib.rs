//! Shared data model and error taxonomy for the constraint-mining pipeline.
//!
//! This crate has no knowledge of parsing or compilation; it only defines
//! the vocabulary (`Constraint`, `ConstraintSet`, `ConstraintIr`, ...) that
//! `clew-extract` produces and `braid-compile` consumes.

pub mod conflict;
pub mod errors;
pub mod model;
pub mod sanitize;

pub use conflict::{ConflictPair, RefinementCandidate, ResolutionAction, ResolutionSuggestion};
pub use errors::{Error, Result};
pub use model::{
    Constraint, ConstraintIr, ConstraintKind, ConstraintSet, ConstraintSource, Grammar,
    GrammarRule, HoleSpec, RegexPattern, Severity, TokenMasks,
};
