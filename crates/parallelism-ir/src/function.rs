//! Functions and basic blocks

use serde::Serialize;

use crate::{BlockId, InstId, Instruction, Span};

/// A straight-line sequence of instructions
#[derive(Debug, Clone, Serialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub label: String,
    /// Instructions in program order
    pub insts: Vec<InstId>,
    pub span: Span,
}

/// A function: an instruction arena plus ordered basic blocks
///
/// Built through [`crate::FunctionBuilder`], which validates operands and
/// fills in the user index. Serialize-only: a `Function` can only come
/// out of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct Function {
    pub name: String,
    /// Parameter names without the `%` sigil
    pub params: Vec<String>,
    pub span: Span,
    pub(crate) blocks: Vec<BasicBlock>,
    pub(crate) insts: Vec<Instruction>,
    /// `users[i]` lists the instructions that read instruction `i`, in program order
    pub(crate) users: Vec<Vec<InstId>>,
}

impl Function {
    /// Get an instruction by ID
    ///
    /// IDs are only meaningful for the function that created them.
    pub fn inst(&self, id: InstId) -> &Instruction {
        &self.insts[id.index()]
    }

    /// Get an instruction by ID, if it belongs to this function
    pub fn get_inst(&self, id: InstId) -> Option<&Instruction> {
        self.insts.get(id.index())
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.index()]
    }

    /// Blocks in layout order
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn block_by_label(&self, label: &str) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.label == label)
    }

    /// Instructions that consume the result of `id`
    pub fn users(&self, id: InstId) -> &[InstId] {
        self.users.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Instructions of a block, in program order
    pub fn block_insts(&self, id: BlockId) -> impl Iterator<Item = &Instruction> + '_ {
        self.block(id).insts.iter().map(move |&i| self.inst(i))
    }

    /// All instructions in program order
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.blocks.iter().flat_map(move |b| b.insts.iter().map(move |&i| self.inst(i)))
    }

    /// Rebuild the user index from the operand lists
    pub(crate) fn rebuild_users(&mut self) {
        let mut users: Vec<Vec<InstId>> = vec![Vec::new(); self.insts.len()];
        for block in &self.blocks {
            for &id in &block.insts {
                for op in self.insts[id.index()].operand_insts() {
                    let list = &mut users[op.index()];
                    if !list.contains(&id) {
                        list.push(id);
                    }
                }
            }
        }
        self.users = users;
    }
}
