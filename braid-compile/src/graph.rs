//! The constraint dependency graph: one node per constraint, edges drawn
//! from the fixed kind-dependency table (type-safety constraints depend on
//! syntactic ones; semantic constraints depend on type-safety ones). Built
//! as a flat adjacency list with an in-degree array rather than a
//! `petgraph::Graph` — the dependency table is small and fixed, so a
//! compact edge model fits better than a general graph crate here.

use clew_core::{Constraint, ConstraintKind, Error, Result};

/// Returns the kinds a constraint of `kind` depends on, i.e. the kinds that
/// must be ordered before it in the topological sort. Architectural,
/// operational, and security constraints carry no ordering dependency of
/// their own — they sit alongside syntactic ones.
fn depends_on(kind: ConstraintKind) -> &'static [ConstraintKind] {
    use ConstraintKind::*;
    match kind {
        Syntactic | Architectural | Operational | Security => &[],
        TypeSafety => &[Syntactic],
        Semantic => &[TypeSafety],
    }
}

/// A directed graph over constraint indices (positions into the slice the
/// graph was built from).
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    /// `edges[i]` lists the nodes that `i` depends on (must precede `i`).
    edges: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl ConstraintGraph {
    /// Builds the graph by connecting every constraint to every constraint
    /// of a kind it depends on, per the fixed kind table above.
    pub fn build(constraints: &[Constraint]) -> Self {
        let n = constraints.len();
        let mut edges: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];

        for (i, c) in constraints.iter().enumerate() {
            let required_kinds = depends_on(c.kind);
            if required_kinds.is_empty() {
                continue;
            }
            for (j, other) in constraints.iter().enumerate() {
                if i == j {
                    continue;
                }
                if required_kinds.contains(&other.kind) {
                    edges[i].push(j);
                    in_degree[i] += 1;
                }
            }
        }

        Self { edges, in_degree }
    }

    /// Builds a graph directly from an edge list (`edges[i]` = nodes `i`
    /// depends on). Only used by tests exercising cycle detection, since
    /// `build`'s kind-table edges can never actually form a cycle.
    #[cfg(test)]
    pub(crate) fn from_edges(edges: Vec<Vec<usize>>) -> Self {
        let in_degree = edges.iter().map(|deps| deps.len()).collect();
        Self { edges, in_degree }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Kahn's algorithm: repeatedly removes nodes with in-degree zero. If
    /// every node is eventually removed, returns the order; otherwise the
    /// remaining nodes form at least one cycle, reported by node index
    /// (see [`Self::topological_order_named`] for name-bearing callers).
    pub fn topological_order(&self) -> Result<Vec<usize>> {
        self.topological_order_named(None)
    }

    /// As [`Self::topological_order`], but `names[i]` (if given) is used to
    /// label node `i` in a `CyclicDependency` report instead of its bare
    /// index — callers that built the graph from a `Constraint` slice
    /// should pass the constraints' `name`s so a cycle report is
    /// human-readable.
    pub fn topological_order_named(&self, names: Option<&[String]>) -> Result<Vec<usize>> {
        let n = self.len();
        let mut in_degree = self.in_degree.clone();
        let mut queue: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        let mut head = 0;

        // `edges[i]` holds i's dependencies, so removing `i` decrements the
        // in-degree of every node that depends on `i` — we need the reverse
        // adjacency to walk that efficiently.
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, deps) in self.edges.iter().enumerate() {
            for &dep in deps {
                dependents[dep].push(i);
            }
        }

        while head < queue.len() {
            let node = queue[head];
            head += 1;
            order.push(node);
            for &dependent in &dependents[node] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push(dependent);
                }
            }
        }

        if order.len() == n {
            Ok(order)
        } else {
            let offending = self
                .find_cycle(&order)
                .into_iter()
                .map(|idx_str| {
                    let idx: usize = idx_str.parse().expect("find_cycle emits decimal indices");
                    names
                        .and_then(|n| n.get(idx))
                        .cloned()
                        .unwrap_or(idx_str)
                })
                .collect();
            Err(Error::CyclicDependency { offending })
        }
    }

    /// White/gray/black DFS cycle detection, used once Kahn's algorithm has
    /// already told us a cycle exists, to report which nodes are on it.
    fn find_cycle(&self, resolved: &[usize]) -> Vec<String> {
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let n = self.len();
        let mut color = vec![Color::White; n];
        for &r in resolved {
            color[r] = Color::Black;
        }

        let mut stack: Vec<(usize, usize)> = Vec::new();
        let mut cycle = Vec::new();

        for start in 0..n {
            if color[start] != Color::White {
                continue;
            }
            stack.push((start, 0));
            color[start] = Color::Gray;

            while let Some(&mut (node, ref mut next_idx)) = stack.last_mut() {
                let deps = &self.edges[node];
                if *next_idx < deps.len() {
                    let dep = deps[*next_idx];
                    *next_idx += 1;
                    match color[dep] {
                        Color::White => {
                            color[dep] = Color::Gray;
                            stack.push((dep, 0));
                        }
                        Color::Gray => {
                            // Found the cycle: everything currently gray is on it.
                            cycle = stack.iter().map(|(n, _)| n.to_string()).collect();
                            return cycle;
                        }
                        Color::Black => {}
                    }
                } else {
                    color[node] = Color::Black;
                    stack.pop();
                }
            }
        }

        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clew_core::{ConstraintSource, Severity};

    fn c(id: u64, kind: ConstraintKind) -> Constraint {
        Constraint::new(id, format!("c{id}"), "d", kind, ConstraintSource::AstPattern, Severity::Info, 0.5)
    }

    #[test]
    fn independent_kinds_have_no_edges() {
        let constraints = vec![c(0, ConstraintKind::Syntactic), c(1, ConstraintKind::Security)];
        let graph = ConstraintGraph::build(&constraints);
        let order = graph.topological_order().unwrap();
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn type_safety_follows_syntactic() {
        let constraints = vec![
            c(0, ConstraintKind::TypeSafety),
            c(1, ConstraintKind::Syntactic),
        ];
        let graph = ConstraintGraph::build(&constraints);
        let order = graph.topological_order().unwrap();
        let pos_syntactic = order.iter().position(|&i| i == 1).unwrap();
        let pos_type_safety = order.iter().position(|&i| i == 0).unwrap();
        assert!(pos_syntactic < pos_type_safety);
    }

    #[test]
    fn three_layer_chain_orders_correctly() {
        let constraints = vec![
            c(0, ConstraintKind::Semantic),
            c(1, ConstraintKind::TypeSafety),
            c(2, ConstraintKind::Syntactic),
        ];
        let graph = ConstraintGraph::build(&constraints);
        let order = graph.topological_order().unwrap();
        let pos = |id: usize| order.iter().position(|&i| i == id).unwrap();
        assert!(pos(2) < pos(1));
        assert!(pos(1) < pos(0));
    }

    #[test]
    fn direct_cycle_is_rejected() {
        // 0 depends on 1, 1 depends on 0: a cycle the kind table itself can
        // never produce, but the detector must still catch it.
        let graph = ConstraintGraph::from_edges(vec![vec![1], vec![0]]);
        let err = graph.topological_order().unwrap_err();
        assert_eq!(err.code(), "CyclicDependency");
    }

    #[test]
    fn cyclic_report_names_the_offending_nodes() {
        let graph = ConstraintGraph::from_edges(vec![vec![1], vec![0]]);
        let names = vec!["a".to_string(), "b".to_string()];
        let err = graph.topological_order_named(Some(&names)).unwrap_err();
        match err {
            Error::CyclicDependency { offending } => {
                assert!(offending.contains(&"a".to_string()));
                assert!(offending.contains(&"b".to_string()));
            }
            other => panic!("expected CyclicDependency, got {other:?}"),
        }
    }
}
