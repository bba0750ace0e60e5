//! Thin adapter over `tree-sitter`: language-keyed parsing, and the two
//! traversal utilities the identifier extractor and pattern engine build
//! on.

use crate::language::Language;
use crate::ringbuffer::RingBuffer;
use clew_core::Error;
use tree_sitter::{Node, Parser, Tree};

/// What a pre-order visitor asks the traversal to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

/// Parses `source` as `language`, honoring `timeout_micros` (0 disables the
/// timeout). CST parse errors (`root.has_error()`) are not treated as
/// failures here — only a hard timeout or a `None` tree from tree-sitter
/// itself surfaces an error.
pub fn parse(source: &str, language: Language, timeout_micros: u64) -> Result<Tree, Error> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.grammar())
        .map_err(|e| Error::InvalidInput(format!("grammar setup failed: {e}")))?;
    if timeout_micros > 0 {
        parser.set_timeout_micros(timeout_micros);
    }
    match parser.parse(source, None) {
        Some(tree) => Ok(tree),
        None => Err(Error::ParseTimeout {
            micros: timeout_micros,
        }),
    }
}

/// Pre-order (root, then each child's subtree left to right) traversal.
/// Stops immediately once `visitor` returns [`Control::Stop`].
pub fn pre_order<'a>(root: Node<'a>, mut visitor: impl FnMut(Node<'a>) -> Control) {
    let mut stack: Vec<Node<'a>> = vec![root];
    while let Some(node) = stack.pop() {
        if visitor(node) == Control::Stop {
            return;
        }
        // Push children in reverse so the leftmost child is popped first.
        let mut cursor = node.walk();
        let children: Vec<Node<'a>> = node.children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }
}

/// Level-order (breadth-first) traversal using the power-of-two ring
/// buffer from [`crate::ringbuffer`]. Returns every node paired with its
/// depth from `root` (depth 0).
pub fn level_order(root: Node<'_>) -> Vec<(Node<'_>, usize)> {
    let mut out = Vec::new();
    let mut queue: RingBuffer<(Node<'_>, usize)> = RingBuffer::with_capacity(64);
    queue.push_back((root, 0));
    while let Some((node, depth)) = queue.pop_front() {
        out.push((node, depth));
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            queue.push_back((child, depth + 1));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_rust_source() {
        let tree = parse("fn main() {}", Language::Rust, 0).unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn unsupported_grammar_never_reached_via_resolve() {
        // language::resolve is the public surface for unsupported labels;
        // parse() itself always receives an already-resolved Language.
        let tree = parse("def f(): pass", Language::Python, 0).unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }

    #[test]
    fn pre_order_visits_root_first() {
        let tree = parse("fn main() { let x = 1; }", Language::Rust, 0).unwrap();
        let mut kinds = Vec::new();
        pre_order(tree.root_node(), |n| {
            kinds.push(n.kind().to_string());
            Control::Continue
        });
        assert_eq!(kinds.first().unwrap(), "source_file");
    }

    #[test]
    fn pre_order_stops_early() {
        let tree = parse("fn a() {} fn b() {} fn c() {}", Language::Rust, 0).unwrap();
        let mut visited = 0;
        pre_order(tree.root_node(), |_n| {
            visited += 1;
            if visited == 3 {
                Control::Stop
            } else {
                Control::Continue
            }
        });
        assert_eq!(visited, 3);
    }

    #[test]
    fn level_order_is_non_decreasing_depth() {
        let tree = parse("fn main() { let x = 1; }", Language::Rust, 0).unwrap();
        let visited = level_order(tree.root_node());
        let mut last_depth = 0usize;
        for (_, depth) in &visited {
            assert!(*depth >= last_depth, "depth decreased mid-traversal");
            last_depth = *depth;
        }
        // Every node visited exactly once.
        let unique: std::collections::HashSet<usize> =
            visited.iter().map(|(n, _)| n.id()).collect();
        assert_eq!(visited.len(), unique.len());
    }
}
