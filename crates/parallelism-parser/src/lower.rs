//! Name resolution: raw syntax to IR

use std::collections::HashMap;

use parallelism_ir::{Function, FunctionBuilder, InstId, IrError, Module, Operand};

use crate::parser::{RawFunction, RawOperand, RawOperandKind};
use crate::ParseError;

/// Resolve every function and collect them into a module
pub fn lower_module(functions: Vec<RawFunction>) -> Result<Module, ParseError> {
    let mut module = Module::new();
    for raw in functions {
        let function = lower_function(raw)?;
        module.add_function(function)?;
    }
    Ok(module)
}

fn lower_function(raw: RawFunction) -> Result<Function, ParseError> {
    let mut builder = FunctionBuilder::new(raw.name.clone()).with_span(raw.span);

    for (name, span) in &raw.params {
        builder.param_at(name.clone(), *span)?;
    }
    // Declare all blocks first so branches can target later labels
    for block in &raw.blocks {
        builder.block_at(block.label.clone(), block.span)?;
    }

    // The builder numbers instructions in creation order, so forward
    // references can be resolved up front.
    let mut results: HashMap<&str, InstId> = HashMap::new();
    let mut next = 0u32;
    for block in &raw.blocks {
        for inst in &block.insts {
            if let Some(name) = &inst.name {
                results.entry(name.as_str()).or_insert(InstId(next));
            }
            next += 1;
        }
    }

    for block in &raw.blocks {
        let block_id = builder.label(&block.label).ok_or_else(|| IrError::UndefinedLabel {
            label: block.label.clone(),
            span: block.span,
        })?;
        for inst in &block.insts {
            let operands = inst
                .operands
                .iter()
                .map(|op| resolve_operand(&builder, &results, op))
                .collect::<Result<Vec<_>, _>>()?;
            builder.inst_at(
                block_id,
                inst.name.clone(),
                inst.opcode.clone(),
                operands,
                inst.span,
            )?;
        }
    }

    Ok(builder.finish()?)
}

fn resolve_operand(
    builder: &FunctionBuilder,
    results: &HashMap<&str, InstId>,
    operand: &RawOperand,
) -> Result<Operand, IrError> {
    match &operand.kind {
        RawOperandKind::Local(name) => {
            // Parameters are defined before any instruction
            if let Some(Operand::Arg(i)) = builder.value(name) {
                return Ok(Operand::Arg(i));
            }
            results
                .get(name.as_str())
                .map(|id| Operand::Inst(*id))
                .ok_or_else(|| IrError::UndefinedValue {
                    name: name.clone(),
                    span: operand.span,
                })
        }
        RawOperandKind::Global(name) => Ok(Operand::Global(name.clone())),
        RawOperandKind::Label(label) => {
            builder
                .label(label)
                .map(Operand::Label)
                .ok_or_else(|| IrError::UndefinedLabel {
                    label: label.clone(),
                    span: operand.span,
                })
        }
        RawOperandKind::Int(value) => Ok(Operand::Const(*value)),
    }
}
