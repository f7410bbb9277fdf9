//! In-memory construction of functions
//!
//! IDs are handed out in creation order: the n-th call to [`FunctionBuilder::inst`]
//! yields `InstId(n)`, the n-th block `BlockId(n)`. The parser relies on this
//! to resolve forward references before building.

use std::collections::HashMap;

use crate::{
    BasicBlock, BlockId, Function, InstId, InstKind, Instruction, IrError, Operand, Span,
};

pub struct FunctionBuilder {
    name: String,
    params: Vec<String>,
    span: Span,
    blocks: Vec<BasicBlock>,
    insts: Vec<Instruction>,
    values: HashMap<String, Operand>,
    labels: HashMap<String, BlockId>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            span: Span::dummy(),
            blocks: Vec::new(),
            insts: Vec::new(),
            values: HashMap::new(),
            labels: HashMap::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Declare a parameter and return the operand that reads it
    pub fn param(&mut self, name: impl Into<String>) -> Result<Operand, IrError> {
        self.param_at(name, Span::dummy())
    }

    pub fn param_at(&mut self, name: impl Into<String>, span: Span) -> Result<Operand, IrError> {
        let name = name.into();
        let operand = Operand::Arg(self.params.len());
        self.define(&name, operand.clone(), span)?;
        self.params.push(name);
        Ok(operand)
    }

    /// Append a new, empty block
    pub fn block(&mut self, label: impl Into<String>) -> Result<BlockId, IrError> {
        self.block_at(label, Span::dummy())
    }

    pub fn block_at(&mut self, label: impl Into<String>, span: Span) -> Result<BlockId, IrError> {
        let label = label.into();
        if self.labels.contains_key(&label) {
            return Err(IrError::DuplicateLabel { label, span });
        }
        let id = BlockId(self.blocks.len() as u32);
        self.labels.insert(label.clone(), id);
        self.blocks.push(BasicBlock {
            id,
            label,
            insts: Vec::new(),
            span,
        });
        Ok(id)
    }

    /// Append an instruction to `block`
    pub fn inst(
        &mut self,
        block: BlockId,
        name: Option<&str>,
        opcode: &str,
        operands: Vec<Operand>,
    ) -> Result<InstId, IrError> {
        self.inst_at(block, name.map(str::to_string), opcode.to_string(), operands, Span::dummy())
    }

    pub fn inst_at(
        &mut self,
        block: BlockId,
        name: Option<String>,
        opcode: String,
        operands: Vec<Operand>,
        span: Span,
    ) -> Result<InstId, IrError> {
        if block.index() >= self.blocks.len() {
            return Err(IrError::DanglingOperand {
                opcode,
                what: "block",
                span,
            });
        }
        let id = InstId(self.insts.len() as u32);
        if let Some(name) = &name {
            self.define(name, Operand::Inst(id), span)?;
        }
        self.blocks[block.index()].insts.push(id);
        self.insts.push(Instruction {
            id,
            name,
            kind: InstKind::classify(&opcode),
            opcode,
            operands,
            parent: block,
            span,
        });
        Ok(id)
    }

    /// Look up a named value (parameter or instruction result)
    pub fn value(&self, name: &str) -> Option<Operand> {
        self.values.get(name).cloned()
    }

    pub fn label(&self, label: &str) -> Option<BlockId> {
        self.labels.get(label).copied()
    }

    fn define(&mut self, name: &str, operand: Operand, span: Span) -> Result<(), IrError> {
        if self.values.contains_key(name) {
            return Err(IrError::DuplicateValue {
                name: name.to_string(),
                span,
            });
        }
        self.values.insert(name.to_string(), operand);
        Ok(())
    }

    /// Verify the function and compute its user index
    pub fn finish(self) -> Result<Function, IrError> {
        for inst in &self.insts {
            for operand in &inst.operands {
                let dangling = match operand {
                    Operand::Inst(id) if id.index() >= self.insts.len() => Some("instruction"),
                    Operand::Label(id) if id.index() >= self.blocks.len() => Some("block"),
                    Operand::Arg(i) if *i >= self.params.len() => Some("parameter"),
                    _ => None,
                };
                if let Some(what) = dangling {
                    return Err(IrError::DanglingOperand {
                        opcode: inst.opcode.clone(),
                        what,
                        span: inst.span,
                    });
                }
            }
        }

        for block in &self.blocks {
            let count = block.insts.len();
            for (pos, &id) in block.insts.iter().enumerate() {
                let inst = &self.insts[id.index()];
                if inst.is_terminator() && pos + 1 != count {
                    return Err(IrError::MisplacedTerminator {
                        opcode: inst.opcode.clone(),
                        block: block.label.clone(),
                        span: inst.span,
                    });
                }
            }
        }

        let mut function = Function {
            name: self.name,
            params: self.params,
            span: self.span,
            blocks: self.blocks,
            insts: self.insts,
            users: Vec::new(),
        };
        function.rebuild_users();
        Ok(function)
    }
}
