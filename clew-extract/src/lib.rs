//! Clew: the constraint extractor. Parses source via `tree-sitter`, mines
//! constraints through identifier extraction and pattern rules, and
//! optionally refines the result through a [`clew_collab::SemanticCollaborator`].

pub mod config;
pub mod cst;
pub mod extract;
pub mod identifiers;
pub mod language;
pub mod patterns;
pub mod ringbuffer;

pub use config::ExtractorConfig;
pub use extract::{extract, extract_labeled, extract_offline, extract_offline_labeled};
pub use language::Language;
