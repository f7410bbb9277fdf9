//! Instruction graph model
//!
//! Nodes are the schedulable instructions of one block; an edge
//! `producer -> consumer` means the consumer reads the producer's result.

use parallelism_ir::{BlockId, Function, InstId};
use serde::Serialize;

/// Schedulable instructions of `block` in program order
///
/// Markers and the terminator are left out. The schedulers still
/// special-case them when reached through operand or user lists.
pub fn filter_schedulable(function: &Function, block: BlockId) -> Vec<InstId> {
    function
        .block_insts(block)
        .filter(|inst| inst.is_schedulable())
        .map(|inst| inst.id)
        .collect()
}

/// A data dependency between two instructions of the same block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyEdge {
    pub producer: InstId,
    pub consumer: InstId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub inst: InstId,
    pub label: String,
}

/// Dependency graph of one basic block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    /// Nodes in label order
    pub nodes: Vec<GraphNode>,
    /// Edges in discovery order
    pub edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    pub fn label_of(&self, inst: InstId) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.inst == inst)
            .map(|n| n.label.as_str())
    }

    pub fn contains(&self, inst: InstId) -> bool {
        self.nodes.iter().any(|n| n.inst == inst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallelism_parser::parse;

    #[test]
    fn test_filter_drops_markers_and_terminator() {
        let source = r#"
fn f(%x) {
entry:
  %a = add %x, 1
  dbg.value %a
  %b = mul %a, 2
  llvm.dbg.declare %b
  ret %b
}
"#;
        let module = parse(source).unwrap();
        let f = module.function("f").unwrap();
        let entry = f.blocks()[0].id;
        let kept: Vec<_> = filter_schedulable(f, entry)
            .into_iter()
            .map(|id| f.inst(id).opcode.clone())
            .collect();
        assert_eq!(kept, vec!["add", "mul"]);
    }

    #[test]
    fn test_filter_empty_block() {
        let module = parse("fn f() {\nentry:\n  ret\n}\n").unwrap();
        let f = module.function("f").unwrap();
        assert!(filter_schedulable(f, f.blocks()[0].id).is_empty());
    }

    #[test]
    fn test_graph_lookup() {
        let graph = DependencyGraph {
            nodes: vec![
                GraphNode { inst: InstId(0), label: "add1".into() },
                GraphNode { inst: InstId(1), label: "sub2".into() },
                GraphNode { inst: InstId(2), label: "add3".into() },
            ],
            edges: vec![
                DependencyEdge { producer: InstId(0), consumer: InstId(2) },
                DependencyEdge { producer: InstId(1), consumer: InstId(2) },
            ],
        };
        assert_eq!(graph.label_of(InstId(1)), Some("sub2"));
        assert_eq!(graph.label_of(InstId(7)), None);
        assert!(graph.contains(InstId(2)));
        assert!(!graph.contains(InstId(7)));
    }
}
