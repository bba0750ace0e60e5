//! Pattern-rule matching: a table of keyword/regex rules,
//! bucketed by the first ASCII byte of their trigger keyword so a scan over
//! source text only walks the bucket that can possibly match, instead of
//! comparing against every rule in the table.

use crate::identifiers::{DeclCategory, NamedDeclaration};
use crate::language::Language;
use clew_core::{Constraint, ConstraintKind, ConstraintSource};
use clew_util::regex_pool;

/// A single pattern rule: on `keyword` appearing in the source (or, for
/// naming rules, on a declaration's name failing `naming_check`), emit a
/// constraint with the given kind/severity/description template.
#[derive(Debug, Clone, Copy)]
struct PatternRule {
    keyword: &'static str,
    kind: ConstraintKind,
    severity_is_error: bool,
    description: &'static str,
    /// `None` applies to every language; `Some` restricts the rule.
    language: Option<Language>,
}

/// Rules are bucketed by the first ASCII byte of their trigger keyword.
/// Index 0..128 covers the full ASCII range; non-ASCII keywords never
/// occur in this table so bucket 0 is unused. Buckets hold indices into
/// `RULES` rather than copies, so the scan can mark a rule matched in
/// place.
type Bucket = Vec<usize>;

fn bucket_index(keyword: &str) -> usize {
    keyword.as_bytes().first().copied().unwrap_or(0) as usize
}

fn build_buckets() -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = (0..128).map(|_| Vec::new()).collect();
    for (i, rule) in RULES.iter().enumerate() {
        buckets[bucket_index(rule.keyword)].push(i);
    }
    buckets
}

use ConstraintKind::*;

const RULES: &[PatternRule] = &[
    // --- security: code/command execution sinks -----------------------
    PatternRule { keyword: "eval(", kind: Security, severity_is_error: true, description: "avoid eval(): arbitrary code execution sink", language: None },
    PatternRule { keyword: "exec(", kind: Security, severity_is_error: true, description: "avoid exec(): arbitrary code execution sink", language: None },
    PatternRule { keyword: "os.system(", kind: Security, severity_is_error: true, description: "avoid os.system(): shell injection sink", language: Some(Language::Python) },
    PatternRule { keyword: "subprocess.call(", kind: Security, severity_is_error: false, description: "subprocess.call() should use shell=False", language: Some(Language::Python) },
    PatternRule { keyword: "child_process.exec(", kind: Security, severity_is_error: true, description: "child_process.exec() is a shell injection sink", language: None },
    PatternRule { keyword: "Runtime.getRuntime().exec(", kind: Security, severity_is_error: true, description: "Runtime.exec() is a shell injection sink", language: None },
    PatternRule { keyword: "pickle.loads(", kind: Security, severity_is_error: true, description: "pickle.loads() deserializes untrusted data unsafely", language: Some(Language::Python) },
    PatternRule { keyword: "yaml.load(", kind: Security, severity_is_error: false, description: "yaml.load() without SafeLoader permits code execution", language: Some(Language::Python) },
    PatternRule { keyword: "innerHTML", kind: Security, severity_is_error: false, description: "innerHTML assignment is an XSS sink", language: None },
    PatternRule { keyword: "dangerouslySetInnerHTML", kind: Security, severity_is_error: false, description: "dangerouslySetInnerHTML bypasses React's escaping", language: Some(Language::TypeScript) },
    // --- security: credentials / secrets -------------------------------
    PatternRule { keyword: "password=", kind: Security, severity_is_error: true, description: "literal credential assignment", language: None },
    PatternRule { keyword: "api_key=", kind: Security, severity_is_error: true, description: "literal API key assignment", language: None },
    PatternRule { keyword: "secret=", kind: Security, severity_is_error: false, description: "literal secret assignment", language: None },
    PatternRule { keyword: "private_key", kind: Security, severity_is_error: true, description: "private key material referenced inline", language: None },
    // --- security: query construction ----------------------------------
    PatternRule { keyword: "SELECT * FROM", kind: Security, severity_is_error: false, description: "unparameterized SQL literal", language: None },
    PatternRule { keyword: "f\"SELECT", kind: Security, severity_is_error: true, description: "f-string SQL interpolation", language: Some(Language::Python) },
    // --- memory / unsafe (Rust/Go) --------------------------------------
    PatternRule { keyword: "unsafe {", kind: Operational, severity_is_error: false, description: "unsafe block requires justification", language: Some(Language::Rust) },
    PatternRule { keyword: "unsafe.Pointer", kind: Operational, severity_is_error: false, description: "unsafe.Pointer bypasses Go's type system", language: Some(Language::Go) },
    PatternRule { keyword: ".unwrap()", kind: Operational, severity_is_error: false, description: "unwrap() panics on None/Err; prefer explicit handling", language: Some(Language::Rust) },
    PatternRule { keyword: ".expect(", kind: Operational, severity_is_error: false, description: "expect() panics on None/Err; prefer explicit handling", language: Some(Language::Rust) },
    // --- type-safety: weak typing escape hatches -------------------------
    PatternRule { keyword: ": any", kind: TypeSafety, severity_is_error: false, description: "`any` disables type checking for this binding", language: Some(Language::TypeScript) },
    PatternRule { keyword: "as any", kind: TypeSafety, severity_is_error: false, description: "`as any` cast discards static type information", language: Some(Language::TypeScript) },
    PatternRule { keyword: "interface{}", kind: TypeSafety, severity_is_error: false, description: "empty interface accepts any value", language: Some(Language::Go) },
    PatternRule { keyword: "# type: ignore", kind: TypeSafety, severity_is_error: false, description: "type checker suppression", language: Some(Language::Python) },
    // --- operational: error handling discipline --------------------------
    PatternRule { keyword: "except:", kind: Operational, severity_is_error: true, description: "bare except swallows all exceptions including SystemExit", language: Some(Language::Python) },
    PatternRule { keyword: "except Exception:", kind: Operational, severity_is_error: false, description: "overly broad exception handler", language: Some(Language::Python) },
    PatternRule { keyword: "catch (e) {}", kind: Operational, severity_is_error: false, description: "empty catch block discards the error", language: None },
    PatternRule { keyword: "recover()", kind: Operational, severity_is_error: false, description: "recover() without re-panicking on unexpected errors", language: Some(Language::Go) },
    // --- architectural: layering / TODO markers --------------------------
    PatternRule { keyword: "TODO", kind: Architectural, severity_is_error: false, description: "unresolved TODO marker", language: None },
    PatternRule { keyword: "FIXME", kind: Architectural, severity_is_error: false, description: "unresolved FIXME marker", language: None },
    PatternRule { keyword: "console.log(", kind: Operational, severity_is_error: false, description: "console.log left in source", language: None },
    PatternRule { keyword: "print(", kind: Operational, severity_is_error: false, description: "print() left in source; prefer structured logging", language: Some(Language::Python) },
    PatternRule { keyword: "fmt.Println(", kind: Operational, severity_is_error: false, description: "fmt.Println left in source; prefer structured logging", language: Some(Language::Go) },
    PatternRule { keyword: "dbg!(", kind: Operational, severity_is_error: false, description: "dbg!() left in source", language: Some(Language::Rust) },
    // --- security: additional sinks --------------------------------------
    PatternRule { keyword: "new Function(", kind: Security, severity_is_error: true, description: "Function() constructor is an eval()-equivalent code execution sink", language: None },
    PatternRule { keyword: "document.write(", kind: Security, severity_is_error: false, description: "document.write() is an XSS sink", language: None },
    PatternRule { keyword: "os.popen(", kind: Security, severity_is_error: true, description: "os.popen() is a shell injection sink", language: Some(Language::Python) },
    PatternRule { keyword: "shell=True", kind: Security, severity_is_error: true, description: "shell=True permits shell metacharacter injection", language: Some(Language::Python) },
    PatternRule { keyword: "md5(", kind: Security, severity_is_error: false, description: "MD5 is not collision-resistant; unsuitable for credential hashing", language: None },
    PatternRule { keyword: "http://", kind: Security, severity_is_error: false, description: "plaintext HTTP endpoint", language: None },
    // --- type-safety: additional escape hatches ---------------------------
    PatternRule { keyword: "as unknown as", kind: TypeSafety, severity_is_error: false, description: "double cast through `unknown` discards static type information", language: Some(Language::TypeScript) },
    PatternRule { keyword: "@ts-ignore", kind: TypeSafety, severity_is_error: false, description: "type checker suppression", language: Some(Language::TypeScript) },
    PatternRule { keyword: "PyAny", kind: TypeSafety, severity_is_error: false, description: "dynamically-typed FFI boundary value", language: Some(Language::Rust) },
    PatternRule { keyword: "json.Unmarshal(", kind: TypeSafety, severity_is_error: false, description: "untyped JSON unmarshal target should validate shape before use", language: Some(Language::Go) },
    // --- operational: additional error-handling and lifecycle rules ------
    PatternRule { keyword: "var ", kind: Operational, severity_is_error: false, description: "var has function scope; prefer let/const", language: Some(Language::JavaScript) },
    PatternRule { keyword: "static mut ", kind: Operational, severity_is_error: true, description: "static mut is unsynchronized shared mutable state", language: Some(Language::Rust) },
    PatternRule { keyword: "std::mem::transmute", kind: Operational, severity_is_error: true, description: "transmute bypasses the type system's layout guarantees", language: Some(Language::Rust) },
    PatternRule { keyword: "Box::leak(", kind: Operational, severity_is_error: false, description: "Box::leak() intentionally leaks memory", language: Some(Language::Rust) },
    PatternRule { keyword: "println!(", kind: Operational, severity_is_error: false, description: "println!() left in source; prefer structured logging", language: Some(Language::Rust) },
    PatternRule { keyword: "panic(", kind: Operational, severity_is_error: false, description: "panic() aborts the goroutine; prefer returning an error", language: Some(Language::Go) },
    PatternRule { keyword: "input(", kind: Operational, severity_is_error: false, description: "input() blocks and is unsuitable for untrusted automation", language: Some(Language::Python) },
    PatternRule { keyword: "global ", kind: Architectural, severity_is_error: false, description: "global statement introduces implicit module-level coupling", language: Some(Language::Python) },
    // --- architectural: additional markers and layering ------------------
    PatternRule { keyword: "XXX", kind: Architectural, severity_is_error: false, description: "unresolved XXX marker", language: None },
    PatternRule { keyword: "HACK", kind: Architectural, severity_is_error: false, description: "unresolved HACK marker", language: None },
    PatternRule { keyword: "require(", kind: Architectural, severity_is_error: false, description: "dynamic require() obscures the module dependency graph", language: Some(Language::JavaScript) },
    PatternRule { keyword: "#[allow(", kind: Architectural, severity_is_error: false, description: "suppressed lint warrants a justification comment", language: Some(Language::Rust) },
];

/// Applies every source-text rule (the `Some(language)`-or-`None` table
/// above) to the raw source, then applies naming-convention checks to each
/// already-extracted declaration. Returns one [`Constraint`] per match; ids
/// are assigned sequentially starting at `*next_id`, which is advanced past
/// every id handed out.
///
/// The scan walks `source` byte by byte; at each position it only tests the
/// rules bucketed under that byte (rather than every rule in the table),
/// and records the first match per rule so each rule fires at most once
/// regardless of how many times its keyword recurs.
pub fn apply(
    source: &str,
    language: Language,
    declarations: &[NamedDeclaration],
    next_id: &mut u64,
) -> Vec<Constraint> {
    let buckets = build_buckets();
    let mut matched = vec![false; RULES.len()];
    let bytes = source.as_bytes();

    for pos in 0..bytes.len() {
        let byte = bytes[pos];
        if byte >= 128 {
            // Continuation/lead bytes of multi-byte UTF-8 sequences never
            // start an ASCII keyword and `pos` wouldn't be a char boundary.
            continue;
        }
        for &rule_idx in &buckets[byte as usize] {
            if matched[rule_idx] {
                continue;
            }
            let rule = &RULES[rule_idx];
            if let Some(lang) = rule.language {
                if lang != language {
                    continue;
                }
            }
            if source[pos..].starts_with(rule.keyword) {
                matched[rule_idx] = true;
            }
        }
    }

    let mut out = Vec::new();
    for (idx, rule) in RULES.iter().enumerate() {
        if !matched[idx] {
            continue;
        }
        let severity = if rule.severity_is_error {
            clew_core::Severity::Error
        } else {
            clew_core::Severity::Warning
        };
        let id = *next_id;
        *next_id += 1;
        out.push(Constraint::new(
            id,
            rule.keyword,
            rule.description,
            rule.kind,
            ConstraintSource::AstPattern,
            severity,
            0.8,
        ));
    }

    out.extend(naming_violations(language, declarations, next_id));
    out
}

/// Function-like declarations are expected to follow the idiomatic casing
/// convention of their language; type-like declarations the pascal-case
/// convention. Violations become low-confidence syntactic constraints
/// rather than hard errors.
fn naming_violations(
    language: Language,
    declarations: &[NamedDeclaration],
    next_id: &mut u64,
) -> Vec<Constraint> {
    let mut out = Vec::new();
    for decl in declarations {
        let (expected_name, matches) = match (language, decl.category) {
            (Language::Python | Language::Rust, DeclCategory::FunctionLike) => {
                ("snake_case", regex_pool::SNAKE_CASE.is_match(&decl.name))
            }
            (Language::TypeScript | Language::JavaScript | Language::Go, DeclCategory::FunctionLike) => {
                ("camelCase", regex_pool::CAMEL_CASE.is_match(&decl.name))
            }
            (_, DeclCategory::TypeLike) => {
                ("PascalCase", regex_pool::PASCAL_CASE.is_match(&decl.name))
            }
            _ => continue,
        };
        if !matches {
            let id = *next_id;
            *next_id += 1;
            out.push(Constraint::new(
                id,
                format!("{}-naming", decl.name),
                format!("`{}` does not follow {expected_name}", decl.name),
                ConstraintKind::Syntactic,
                ConstraintSource::Identifier,
                clew_core::Severity::Hint,
                0.5,
            ));
        }
    }
    out
}
