//! Braid: compiles a [`clew_core::ConstraintSet`] into a [`clew_core::ConstraintIr`]
//! — a dependency-ordered, conflict-resolved bundle of JSON-Schema, grammar,
//! regex, and token-mask fragments for constrained decoding.

pub mod cache;
pub mod compile;
pub mod conflict;
pub mod graph;
pub mod json_schema;
pub mod token_mask;

pub use cache::CompileCache;
pub use compile::{compile, compile_cached, compile_with_collaborator};
pub use graph::ConstraintGraph;
