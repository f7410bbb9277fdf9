//! Instructions, operands and instruction kinds

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Span;

/// Identity of an instruction: a dense index into its function's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstId(pub u32);

impl InstId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a basic block within its function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The closed set of instruction kinds the analysis distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstKind {
    /// Produces (or may produce) a value; takes part in scheduling
    Compute,
    /// Final control transfer of a block
    Terminator,
    /// Non-computational annotation such as `dbg.value`
    Marker,
}

const TERMINATOR_OPCODES: &[&str] = &["ret", "br", "jmp", "switch", "unreachable", "resume", "invoke"];

impl InstKind {
    /// Classify an opcode by name
    pub fn classify(opcode: &str) -> Self {
        if TERMINATOR_OPCODES.contains(&opcode) {
            InstKind::Terminator
        } else if opcode.starts_with("dbg.") || opcode.starts_with("llvm.dbg.") {
            InstKind::Marker
        } else {
            InstKind::Compute
        }
    }
}

/// An instruction operand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// Result of another instruction in the same function
    Inst(InstId),
    /// Function parameter by position
    Arg(usize),
    /// Integer constant
    Const(i64),
    /// Module-level symbol, e.g. `@table`
    Global(String),
    /// Branch target
    Label(BlockId),
}

impl Operand {
    /// The producing instruction, if this operand is one
    pub fn as_inst(&self) -> Option<InstId> {
        match self {
            Operand::Inst(id) => Some(*id),
            _ => None,
        }
    }
}

/// A single instruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub id: InstId,
    /// Result name without the `%` sigil
    pub name: Option<String>,
    pub opcode: String,
    pub kind: InstKind,
    pub operands: Vec<Operand>,
    /// Owning block
    pub parent: BlockId,
    pub span: Span,
}

impl Instruction {
    pub fn is_terminator(&self) -> bool {
        self.kind == InstKind::Terminator
    }

    /// Whether the instruction is assigned a cycle by the schedulers
    pub fn is_schedulable(&self) -> bool {
        self.kind == InstKind::Compute
    }

    /// Operands that are results of other instructions, in operand order
    pub fn operand_insts(&self) -> impl Iterator<Item = InstId> + '_ {
        self.operands.iter().filter_map(Operand::as_inst)
    }

    /// `%name` for named results, the opcode otherwise
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => format!("%{}", name),
            None => self.opcode.clone(),
        }
    }
}

impl fmt::Display for InstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstKind::Compute => "compute",
            InstKind::Terminator => "terminator",
            InstKind::Marker => "marker",
        };
        f.write_str(s)
    }
}
