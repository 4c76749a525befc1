//! Graphviz rendering of the dependency graph.

use std::collections::HashSet;
use std::fmt::Write;

use kernelplan_protocols::KernelGraph;

use super::escape_quoted;

/// Render the dependency graph as Graphviz DOT.
///
/// Edges point from a dependency to its dependent. Dependencies on unknown
/// kernels are drawn as dashed edges from a placeholder node.
pub fn dot(graph: &KernelGraph) -> String {
    let mut out = String::from("digraph kernels {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [shape=box, style=rounded];\n");

    let kernels = graph.unique_kernels();
    for (_, kernel) in &kernels {
        let mut label = escape_quoted(&kernel.name);
        if !kernel.agent_type.is_empty() {
            label.push_str("\\n");
            label.push_str(&escape_quoted(&kernel.agent_type));
        }
        let _ = writeln!(
            out,
            "    \"{}\" [label=\"{}\"];",
            escape_quoted(&kernel.name),
            label
        );
    }

    let mut missing = HashSet::new();
    for (_, kernel) in &kernels {
        for dep in kernel.distinct_dependencies() {
            if graph.contains(dep) {
                let _ = writeln!(
                    out,
                    "    \"{}\" -> \"{}\";",
                    escape_quoted(dep),
                    escape_quoted(&kernel.name)
                );
            } else {
                if missing.insert(dep) {
                    let _ = writeln!(
                        out,
                        "    \"{}\" [color=red, style=dashed];",
                        escape_quoted(dep)
                    );
                }
                let _ = writeln!(
                    out,
                    "    \"{}\" -> \"{}\" [color=red, style=dashed];",
                    escape_quoted(dep),
                    escape_quoted(&kernel.name)
                );
            }
        }
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernelplan_protocols::Kernel;

    #[test]
    fn test_dot_edges() {
        let graph = KernelGraph::new(vec![
            Kernel::new("A", "fetcher", "a"),
            Kernel::new("B", "", "b").with_dependencies(["A", "A"]),
        ]);
        let rendered = dot(&graph);

        assert!(rendered.starts_with("digraph kernels {"));
        assert!(rendered.contains("\"A\" [label=\"A\\nfetcher\"];"));
        assert!(rendered.contains("\"B\" [label=\"B\"];"));
        assert_eq!(rendered.matches("\"A\" -> \"B\";").count(), 1);
        assert!(rendered.trim_end().ends_with('}'));
    }

    #[test]
    fn test_dot_marks_dangling_dependencies() {
        let graph = KernelGraph::new(vec![Kernel::new("B", "w", "b").with_dependencies(["Ghost"])]);
        let rendered = dot(&graph);
        assert!(rendered.contains("\"Ghost\" [color=red, style=dashed];"));
        assert!(rendered.contains("\"Ghost\" -> \"B\" [color=red, style=dashed];"));
    }

    #[test]
    fn test_dot_empty_graph() {
        let rendered = dot(&KernelGraph::default());
        assert_eq!(rendered.lines().count(), 4);
    }
}
