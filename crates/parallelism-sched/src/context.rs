//! Per-block scheduling state
//!
//! Everything the schedulers mutate lives in a [`BlockContext`]. A fresh
//! context is created for each block and dropped once its results have been
//! extracted, so nothing computed for one block is visible to the next.

use std::collections::{HashMap, HashSet};

use parallelism_ir::{BlockId, Function, InstId};

use crate::graph::{DependencyEdge, DependencyGraph, GraphNode};
use crate::SchedError;

/// Cycle numbers; in-block cycles start at 0
pub type Cycle = i64;

/// Instruction identity to cycle
pub type CycleMap = HashMap<InstId, Cycle>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    Asap,
    Alap,
}

pub struct BlockContext<'f> {
    pub(crate) function: &'f Function,
    pub(crate) block: BlockId,
    pub(crate) asap: CycleMap,
    pub(crate) alap: CycleMap,
    pub(crate) greatest_cycle: Cycle,
    /// ASAP discovery order; also the label order
    order: Vec<InstId>,
    labels: HashMap<InstId, String>,
    next_label: usize,
    edges: Vec<DependencyEdge>,
    seen_edges: HashSet<DependencyEdge>,
    /// Instructions whose computation is in progress, outermost first
    stack: Vec<InstId>,
}

impl<'f> BlockContext<'f> {
    pub fn new(function: &'f Function, block: BlockId) -> Self {
        Self {
            function,
            block,
            asap: CycleMap::new(),
            alap: CycleMap::new(),
            greatest_cycle: 0,
            order: Vec::new(),
            labels: HashMap::new(),
            next_label: 1,
            edges: Vec::new(),
            seen_edges: HashSet::new(),
            stack: Vec::new(),
        }
    }

    pub fn function(&self) -> &'f Function {
        self.function
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn asap_map(&self) -> &CycleMap {
        &self.asap
    }

    pub fn alap_map(&self) -> &CycleMap {
        &self.alap
    }

    /// Largest ASAP cycle seen so far in this block
    pub fn greatest_cycle(&self) -> Cycle {
        self.greatest_cycle
    }

    /// Instructions in the order the ASAP traversal first reached them
    pub fn discovery_order(&self) -> &[InstId] {
        &self.order
    }

    pub fn label(&self, inst: InstId) -> Option<&str> {
        self.labels.get(&inst).map(String::as_str)
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Whether `inst` belongs to the block under analysis
    pub(crate) fn is_local(&self, inst: InstId) -> bool {
        self.function.inst(inst).parent == self.block
    }

    /// Assign `{opcode}{n}` the first time an instruction is reached
    pub(crate) fn discover(&mut self, inst: InstId) {
        if self.labels.contains_key(&inst) {
            return;
        }
        let label = format!("{}{}", self.function.inst(inst).opcode, self.next_label);
        self.next_label += 1;
        self.labels.insert(inst, label);
        self.order.push(inst);
    }

    pub(crate) fn add_edge(&mut self, producer: InstId, consumer: InstId) {
        let edge = DependencyEdge { producer, consumer };
        if self.seen_edges.insert(edge) {
            log::trace!(
                "edge {} -> {}",
                self.function.inst(producer).display_name(),
                self.function.inst(consumer).display_name()
            );
            self.edges.push(edge);
        }
    }

    /// Mark `inst` as being computed, failing if it already is
    pub(crate) fn enter(&mut self, inst: InstId, pass: Pass) -> Result<(), SchedError> {
        if let Some(start) = self.stack.iter().position(|&i| i == inst) {
            let mut path: Vec<String> = self.stack[start..]
                .iter()
                .map(|&i| self.function.inst(i).display_name())
                .collect();
            path.push(self.function.inst(inst).display_name());
            if pass == Pass::Asap {
                // Operands were followed, so the path runs against the data flow
                path.reverse();
            }
            return Err(SchedError::DependencyCycle {
                function: self.function.name.clone(),
                block: self.function.block(self.block).label.clone(),
                inst: self.function.inst(inst).display_name(),
                cycle: path.join(" -> "),
            });
        }
        self.stack.push(inst);
        Ok(())
    }

    pub(crate) fn leave(&mut self, inst: InstId) {
        debug_assert_eq!(self.stack.last(), Some(&inst));
        self.stack.pop();
    }

    /// Nodes and edges collected by the ASAP pass
    pub fn graph(&self) -> DependencyGraph {
        let nodes = self
            .order
            .iter()
            .map(|&inst| GraphNode {
                inst,
                label: self.labels[&inst].clone(),
            })
            .collect();
        DependencyGraph {
            nodes,
            edges: self.edges.clone(),
        }
    }
}
