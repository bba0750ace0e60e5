//! String sanitization shared by the extractor and compiler.
//!
//! Both `name` and `description` fields on a [`crate::model::Constraint`] are
//! routed through here before they are stored, and again before the compiler
//! copies them into IR-owned buffers. Neither function can fail: malformed
//! input degrades to a safe default rather than erroring.

const MAX_NAME_LEN: usize = 64;
const MAX_DESCRIPTION_LEN: usize = 512;

/// Keeps only `[A-Za-z0-9_-]`, substituting anything else with `_`,
/// truncates to 64 bytes, and falls back to `"unnamed"` if the result would
/// be empty.
pub fn sanitize_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_NAME_LEN));
    for b in s.bytes() {
        if out.len() >= MAX_NAME_LEN {
            break;
        }
        let c = b as char;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        "unnamed".to_string()
    } else {
        out
    }
}

/// Escapes `"`, `\`, `\n`, `\r`, `\t`; replaces other control bytes (0x00-0x1F
/// except the escaped three, and 0x7F) with a space; truncates the escaped
/// output to 512 bytes.
pub fn sanitize_description(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_DESCRIPTION_LEN));
    for c in s.chars() {
        let piece: &str = match c {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            c if (c as u32) < 0x20 || c as u32 == 0x7F => " ",
            c => {
                let mut buf = [0u8; 4];
                let s = c.encode_utf8(&mut buf);
                if out.len() + s.len() > MAX_DESCRIPTION_LEN {
                    break;
                }
                out.push_str(s);
                continue;
            }
        };
        if out.len() + piece.len() > MAX_DESCRIPTION_LEN {
            break;
        }
        out.push_str(piece);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_name_falls_back() {
        assert_eq!(sanitize_name(""), "unnamed");
    }

    #[test]
    fn non_charset_name_substitutes_underscores() {
        assert_eq!(sanitize_name("!!!"), "___");
    }

    #[test]
    fn name_keeps_allowed_charset() {
        assert_eq!(sanitize_name("forbid any!"), "forbid_any_");
    }

    #[test]
    fn name_truncates_to_64() {
        let long = "a".repeat(100);
        assert_eq!(sanitize_name(&long).len(), 64);
    }

    #[test]
    fn description_escapes_quotes_and_backslashes() {
        let out = sanitize_description("say \"hi\"\\now");
        assert!(!out.contains('"') || out.contains("\\\""));
        assert!(out.contains("\\\\"));
    }

    #[test]
    fn description_preserves_escape_sequences() {
        let out = sanitize_description("line1\nline2\ttab\rcr");
        assert!(out.contains("\\n"));
        assert!(out.contains("\\t"));
        assert!(out.contains("\\r"));
    }

    #[test]
    fn description_truncates_to_512() {
        let long = "x".repeat(1000);
        assert!(sanitize_description(&long).len() <= MAX_DESCRIPTION_LEN);
    }

    proptest! {
        #[test]
        fn name_is_always_nonempty_charset_and_bounded(s in ".*") {
            let out = sanitize_name(&s);
            prop_assert!(!out.is_empty());
            prop_assert!(out.len() <= MAX_NAME_LEN);
            prop_assert!(out.bytes().all(|b| {
                let c = b as char;
                c.is_ascii_alphanumeric() || c == '_' || c == '-'
            }));
        }

        #[test]
        fn description_is_always_bounded_and_unescaped_quote_free(s in ".*") {
            let out = sanitize_description(&s);
            prop_assert!(out.len() <= MAX_DESCRIPTION_LEN);
            // Every `"` or `\` in the output must be part of an escape pair
            // introduced by this function, never a bare unescaped one.
            let bytes = out.as_bytes();
            let mut i = 0;
            while i < bytes.len() {
                if bytes[i] == b'"' {
                    prop_assert!(i > 0 && bytes[i - 1] == b'\\');
                }
                i += 1;
            }
            prop_assert!(!out.chars().any(|c| (c as u32) < 0x20 || c as u32 == 0x7F));
        }
    }
}
