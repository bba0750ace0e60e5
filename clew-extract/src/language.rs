//! Supported source languages and the table that resolves a caller-supplied
//! label to a grammar; unknown labels produce `UnsupportedLanguage`.

use clew_core::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Rust,
    Go,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
        })
    }
}

impl Language {
    /// Resolves a label (case-insensitive) to a supported language, or
    /// `None` for anything not in the table.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "typescript" | "ts" | "tsx" => Some(Language::TypeScript),
            "javascript" | "js" | "jsx" => Some(Language::JavaScript),
            "python" | "py" => Some(Language::Python),
            "rust" | "rs" => Some(Language::Rust),
            "go" | "golang" => Some(Language::Go),
            _ => None,
        }
    }

    pub fn grammar(self) -> tree_sitter::Language {
        match self {
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
        }
    }
}

/// Resolves `label` to a [`Language`], mapping an unknown label to the
/// taxonomy's `UnsupportedLanguage` error.
pub fn resolve(label: &str) -> Result<Language, Error> {
    Language::from_label(label).ok_or_else(|| Error::UnsupportedLanguage(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_resolve() {
        assert_eq!(resolve("typescript").unwrap(), Language::TypeScript);
        assert_eq!(resolve("Python").unwrap(), Language::Python);
        assert_eq!(resolve("rs").unwrap(), Language::Rust);
    }

    #[test]
    fn unknown_label_is_unsupported() {
        let err = resolve("cobol").unwrap_err();
        assert_eq!(err.code(), "UnsupportedLanguage");
    }
}
