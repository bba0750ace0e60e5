//! JSON-Schema emission from a type-safety constraint's description: a
//! small recursive-descent reader over a TypeScript-flavored
//! type expression embedded in the description text — interface bodies,
//! object literals, arrays, unions, and bare type names with a handful of
//! format heuristics (email/url/date).
//!
//! Deliberately hand-rolled rather than pulling in a parser-combinator
//! crate: the grammar is small and fixed enough that a tiny bespoke reader
//! is clearer than a combinator dependency.

use serde_json::{json, Value};

/// Parses `description` as a type expression and emits the corresponding
/// JSON-Schema fragment. Falls back to `{"type": "string"}` for anything
/// that doesn't parse as a recognized shape — schema emission never fails
/// the compile; an unparseable description degrades to an unconstrained
/// string schema rather than aborting.
pub fn compile(description: &str) -> Value {
    let text = strip_interface_keyword(description.trim());
    parse_type_expr(text)
}

fn strip_interface_keyword(text: &str) -> &str {
    let text = text.trim_start_matches("interface");
    let text = text.trim_start();
    // Skip a leading name token ("User { ... }" -> "{ ... }").
    if let Some(brace) = text.find('{') {
        if !text[..brace].trim().is_empty() && !text.starts_with('{') {
            return &text[brace..];
        }
    }
    text
}

fn parse_type_expr(text: &str) -> Value {
    let text = text.trim().trim_end_matches(';');
    if text.is_empty() {
        return json!({ "type": "string" });
    }

    if let Some(union_parts) = split_top_level(text, '|') {
        if union_parts.len() > 1 {
            return json!({ "anyOf": union_parts.iter().map(|p| parse_type_expr(p)).collect::<Vec<_>>() });
        }
    }

    if text.starts_with('{') && text.ends_with('}') {
        return parse_object(&text[1..text.len() - 1]);
    }

    if let Some(inner) = text.strip_prefix("Array<").and_then(|s| s.strip_suffix('>')) {
        return json!({ "type": "array", "items": parse_type_expr(inner) });
    }

    if let Some(inner) = text.strip_suffix("[]") {
        return json!({ "type": "array", "items": parse_type_expr(inner) });
    }

    parse_bare_type(text)
}

/// Splits `text` on `sep` at brace/bracket depth zero only, so `{a: B|C}`
/// doesn't get split on the `|` nested inside the object body. Returns
/// `None` if `sep` never occurs at depth zero.
fn split_top_level(text: &str, sep: char) -> Option<Vec<&str>> {
    let mut depth: i32 = 0;
    let mut parts = Vec::new();
    let mut start = 0;
    let mut found = false;
    for (i, ch) in text.char_indices() {
        match ch {
            '{' | '[' | '<' | '(' => depth += 1,
            '}' | ']' | '>' | ')' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + c.len_utf8();
                found = true;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    if found {
        Some(parts)
    } else {
        None
    }
}

/// Parses the body of an object literal (without the surrounding braces):
/// semicolon- or comma-separated `name: Type` / `name?: Type` entries.
fn parse_object(body: &str) -> Value {
    let entries = split_top_level(body, ';')
        .or_else(|| split_top_level(body, ','))
        .unwrap_or_else(|| vec![body]);

    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some(colon) = entry.find(':') else { continue };
        let (name_part, type_part) = entry.split_at(colon);
        let type_part = &type_part[1..];
        let optional = name_part.trim_end().ends_with('?');
        let name = name_part.trim().trim_end_matches('?').trim();
        if name.is_empty() {
            continue;
        }
        properties.insert(name.to_string(), parse_type_expr(type_part));
        if !optional {
            required.push(Value::String(name.to_string()));
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": Value::Object(properties),
    });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

/// Resolves a bare type name to a primitive schema, applying a handful of
/// format heuristics by substring (case-insensitive) in the name: `email`,
/// `url`/`uri`, `date`, plus the two structured heuristics `pattern:<re>`
/// and `range:<min>-<max>`. Unrecognized names become an unconstrained
/// string.
fn parse_bare_type(name: &str) -> Value {
    let trimmed = name.trim();
    if let Some(re) = trimmed.strip_prefix("pattern:") {
        return json!({ "type": "string", "pattern": re.trim() });
    }
    if let Some(range) = trimmed.strip_prefix("range:") {
        if let Some((min, max)) = range.trim().split_once('-') {
            if let (Ok(min), Ok(max)) = (min.trim().parse::<f64>(), max.trim().parse::<f64>()) {
                return json!({ "type": "number", "minimum": min, "maximum": max });
            }
        }
    }

    let lower = trimmed.to_ascii_lowercase();
    match lower.as_str() {
        "string" => return json!({ "type": "string" }),
        "float" | "double" => return json!({ "type": "number" }),
        "integer" | "int" | "number" => return json!({ "type": "integer" }),
        "boolean" | "bool" => return json!({ "type": "boolean" }),
        "any" | "unknown" | "object" => return json!({}),
        "null" | "void" => return json!({ "type": "null" }),
        _ => {}
    }

    if lower.contains("email") {
        return json!({ "type": "string", "format": "email" });
    }
    if lower.contains("url") || lower.contains("uri") {
        return json!({ "type": "string", "format": "uri" });
    }
    if lower.contains("date") {
        return json!({ "type": "string", "format": "date" });
    }

    json!({ "type": "string" })
}
