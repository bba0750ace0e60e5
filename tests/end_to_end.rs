//! Cross-crate scenario tests: extractor → compiler → wire schema, the six
//! literal input/output scenarios the pipeline is expected to handle.

use braid_compile::compile;
use clew_core::{Constraint, ConstraintKind, ConstraintSet, ConstraintSource, Severity};
use clew_extract::{extract_offline, ExtractorConfig, Language};
use clew_util::{with_retry, RetryConfig, RetryableError};

#[test]
fn empty_source_yields_empty_constraint_set() {
    let config = ExtractorConfig::default();
    let set = extract_offline("", Language::Rust, &config).unwrap();
    assert!(set.is_empty());
}

#[test]
fn single_interface_compiles_to_a_json_schema() {
    let mut set = ConstraintSet::new("typescript-extract");
    set.push(Constraint::new(
        0,
        "user-shape",
        "interface User { id: string; age?: number }",
        ConstraintKind::TypeSafety,
        ConstraintSource::AstPattern,
        Severity::Warning,
        0.9,
    ));
    let ir = compile(&set).unwrap();
    let schema = ir.json_schema.expect("schema fragment present");
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["required"], serde_json::json!(["id"]));
    assert_eq!(schema["properties"]["id"], serde_json::json!({ "type": "string" }));
    assert_eq!(schema["properties"]["age"], serde_json::json!({ "type": "integer" }));
}

#[test]
fn conflicting_rules_leave_exactly_one_enabled() {
    let mut set = ConstraintSet::new("conflicts");
    set.push(Constraint::new(
        0,
        "forbid_any",
        "disallow the `any` type in public signatures",
        ConstraintKind::TypeSafety,
        ConstraintSource::AstPattern,
        Severity::Error,
        0.8,
    ));
    set.push(Constraint::new(
        1,
        "allow_any",
        "permit the `any` type for legacy interop",
        ConstraintKind::TypeSafety,
        ConstraintSource::AstPattern,
        Severity::Warning,
        0.8,
    ));
    let ir = compile(&set).unwrap();
    let rule = ir
        .grammar
        .unwrap()
        .rules
        .into_iter()
        .find(|r| r.name == "typesafety")
        .unwrap();
    assert_eq!(rule.productions.len(), 1);
}

#[test]
fn security_constraint_emits_forbidden_token_mask() {
    let mut set = ConstraintSet::new("security");
    set.push(Constraint::new(
        0,
        "no-shell-injection",
        "must not interpolate untrusted input into a shell command",
        ConstraintKind::Security,
        ConstraintSource::AstPattern,
        Severity::Error,
        0.95,
    ));
    let ir = compile(&set).unwrap();
    let masks = ir.token_masks.expect("security constraint yields a token mask");
    let forbidden = masks.forbidden_tokens.unwrap();
    assert_eq!(forbidden.len(), 15);
    assert!(forbidden.iter().any(|t| t.contains("rm -rf")));
    assert_eq!(ir.priority, 1000);
}

#[test]
fn cyclic_graph_never_arises_from_the_real_extractor() {
    // The kind-dependency table (syntactic -> type_safety -> semantic) is
    // acyclic by construction, so a constraint set built by the real
    // extractor always compiles; `ConstraintGraph`'s own cycle-detection
    // path is exercised directly in braid-compile::graph's unit tests.
    let config = ExtractorConfig::default();
    let set = extract_offline(
        "interface Foo { x: number }\nfn compute() -> i32 { 0 }\n",
        Language::Rust,
        &config,
    )
    .unwrap();
    assert!(compile(&set).is_ok());
}

struct FlakyTwice {
    status: Option<u16>,
}

impl RetryableError for FlakyTwice {
    fn status_code(&self) -> Option<u16> {
        self.status
    }
}

#[tokio::test(start_paused = true)]
async fn retry_succeeds_on_third_attempt_with_three_milliseconds_of_backoff() {
    let config = RetryConfig {
        max_retries: 3,
        initial_backoff_ms: 1,
        max_backoff_ms: 8,
        multiplier: 2.0,
        jitter: false,
    };
    let mut calls = 0u32;
    let started = tokio::time::Instant::now();
    let result: Result<u32, FlakyTwice> = with_retry(&config, || {
        calls += 1;
        let this_call = calls;
        async move {
            if this_call < 3 {
                Err(FlakyTwice { status: Some(500) })
            } else {
                Ok(42)
            }
        }
    })
    .await;
    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls, 3);
    // Two backoffs elapsed between the three attempts: 1ms then 2ms.
    assert_eq!(started.elapsed().as_millis(), 3);
}
