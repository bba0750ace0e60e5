//! Static, process-lifetime regex pool.
//!
//! These are the canonical patterns the compiler's regex emission step
//! draws from before appending any rule-provided patterns. Compiled
//! once via `once_cell::sync::Lazy` and shared across every compilation —
//! the only global, mutable-free state in the pipeline besides the pattern
//! tables.

use once_cell::sync::Lazy;
use regex::Regex;

macro_rules! pooled {
    ($name:ident, $pattern:expr) => {
        pub static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).expect("static regex"));
    };
}

pooled!(CAMEL_CASE, r"^[a-z][a-zA-Z0-9]*$");
pooled!(PASCAL_CASE, r"^[A-Z][a-zA-Z0-9]*$");
pooled!(SNAKE_CASE, r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$");
pooled!(SCREAMING_SNAKE_CASE, r"^[A-Z][A-Z0-9]*(_[A-Z0-9]+)*$");
pooled!(KEBAB_CASE, r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$");
pooled!(
    EMAIL,
    r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$"
);
pooled!(URL, r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s]+$");
pooled!(
    UUID,
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
);

/// A named pattern paired with its source text, suitable for direct IR
/// emission (`{pattern, flags}`, flags empty for the static pool).
#[derive(Debug, Clone, Copy)]
pub struct NamedPattern {
    pub name: &'static str,
    pub pattern: &'static str,
}

/// The canonical pool, in the fixed order the compiler emits them in.
pub const POOL: &[NamedPattern] = &[
    NamedPattern {
        name: "camel_case",
        pattern: r"^[a-z][a-zA-Z0-9]*$",
    },
    NamedPattern {
        name: "pascal_case",
        pattern: r"^[A-Z][a-zA-Z0-9]*$",
    },
    NamedPattern {
        name: "snake_case",
        pattern: r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$",
    },
    NamedPattern {
        name: "screaming_snake_case",
        pattern: r"^[A-Z][A-Z0-9]*(_[A-Z0-9]+)*$",
    },
    NamedPattern {
        name: "kebab_case",
        pattern: r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$",
    },
    NamedPattern {
        name: "email",
        pattern: r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$",
    },
    NamedPattern {
        name: "url",
        pattern: r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s]+$",
    },
    NamedPattern {
        name: "uuid",
        pattern: r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    },
];

/// Looks up a canonical pattern by keyword (e.g. `"email"`, `"uuid"`).
pub fn lookup(keyword: &str) -> Option<&'static NamedPattern> {
    POOL.iter().find(|p| p.name == keyword)
}
