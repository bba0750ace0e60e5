//! Identifier extraction: walks the CST in pre-order and
//! emits a [`NamedDeclaration`] for each node matching a per-language
//! declaration-kind table, built on a stack-based DFS generalized from a
//! single-language traversal into a table-driven, multi-language one.

use crate::cst::{self, Control};
use crate::language::Language;
use tree_sitter::Node;

/// Coarse category a declaration-kind table maps a CST node kind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclCategory {
    FunctionLike,
    TypeLike,
    ImportLike,
}

/// One identifier pulled out of a declaration node.
#[derive(Debug, Clone)]
pub struct NamedDeclaration {
    pub name: String,
    pub category: DeclCategory,
    pub node_kind: &'static str,
    pub start_line: usize,
    pub end_line: usize,
}

/// Per-language table of CST node kinds considered function-like,
/// type-like, or import-like.
fn category_for(language: Language, node_kind: &str) -> Option<DeclCategory> {
    use DeclCategory::*;
    match language {
        Language::Rust => match node_kind {
            "function_item" => Some(FunctionLike),
            "struct_item" | "enum_item" | "trait_item" => Some(TypeLike),
            "use_declaration" => Some(ImportLike),
            _ => None,
        },
        Language::TypeScript => match node_kind {
            "function_declaration" | "method_definition" | "arrow_function" => Some(FunctionLike),
            "interface_declaration" | "type_alias_declaration" | "class_declaration" => {
                Some(TypeLike)
            }
            "import_statement" => Some(ImportLike),
            _ => None,
        },
        Language::JavaScript => match node_kind {
            "function_declaration" | "method_definition" | "arrow_function" => Some(FunctionLike),
            "class_declaration" => Some(TypeLike),
            "import_statement" => Some(ImportLike),
            _ => None,
        },
        Language::Python => match node_kind {
            "function_definition" => Some(FunctionLike),
            "class_definition" => Some(TypeLike),
            "import_statement" | "import_from_statement" => Some(ImportLike),
            _ => None,
        },
        Language::Go => match node_kind {
            "function_declaration" | "method_declaration" => Some(FunctionLike),
            "type_declaration" => Some(TypeLike),
            "import_spec" | "import_declaration" => Some(ImportLike),
            _ => None,
        },
    }
}

/// Returns the node kind as a `'static str` for logging/reporting, falling
/// back to the smallest stable label when tree-sitter's kind isn't in our
/// known table (should not happen given `category_for` already filtered).
fn leak_kind(kind: &str) -> &'static str {
    match kind {
        "function_item" => "function_item",
        "struct_item" => "struct_item",
        "enum_item" => "enum_item",
        "trait_item" => "trait_item",
        "use_declaration" => "use_declaration",
        "function_declaration" => "function_declaration",
        "method_definition" => "method_definition",
        "arrow_function" => "arrow_function",
        "interface_declaration" => "interface_declaration",
        "type_alias_declaration" => "type_alias_declaration",
        "class_declaration" => "class_declaration",
        "import_statement" => "import_statement",
        "function_definition" => "function_definition",
        "class_definition" => "class_definition",
        "import_from_statement" => "import_from_statement",
        "method_declaration" => "method_declaration",
        "type_declaration" => "type_declaration",
        "import_spec" => "import_spec",
        "import_declaration" => "import_declaration",
        _ => "unknown",
    }
}

/// Looks for the first child named `identifier` (function-like/import-like)
/// or `type_identifier` (type-like), falling back to the `name`/`identifier`
/// field, then to any `identifier` descendant.
fn declared_name(node: Node<'_>, category: DeclCategory, source: &str) -> Option<String> {
    let preferred_kind = match category {
        DeclCategory::TypeLike => "type_identifier",
        DeclCategory::FunctionLike | DeclCategory::ImportLike => "identifier",
    };

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == preferred_kind {
            return child.utf8_text(source.as_bytes()).ok().map(str::to_string);
        }
    }

    for field in ["name", "identifier"] {
        if let Some(child) = node.child_by_field_name(field) {
            if let Ok(text) = child.utf8_text(source.as_bytes()) {
                return Some(text.to_string());
            }
        }
    }

    // Last-resort fallback: any direct "identifier" child, regardless of
    // category, covers grammars where type declarations still use the
    // plain "identifier" kind for their name.
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "identifier" {
            return child.utf8_text(source.as_bytes()).ok().map(str::to_string);
        }
    }

    None
}

/// Runs identifier extraction over an already-parsed tree. Individual node
/// failures (no resolvable name) are skipped, never propagated — a
/// constraint is never emitted with an empty name.
pub fn extract_declarations(
    root: Node<'_>,
    source: &str,
    language: Language,
) -> Vec<NamedDeclaration> {
    let mut out = Vec::new();
    cst::pre_order(root, |node| {
        if let Some(category) = category_for(language, node.kind()) {
            if let Some(name) = declared_name(node, category, source) {
                if !name.is_empty() {
                    out.push(NamedDeclaration {
                        name,
                        category,
                        node_kind: leak_kind(node.kind()),
                        start_line: node.start_position().row + 1,
                        end_line: node.end_position().row + 1,
                    });
                }
            }
        }
        Control::Continue
    });
    out
}
