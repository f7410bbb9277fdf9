//! As-soon-as-possible scheduling
//!
//! An instruction can issue one cycle after the last of its in-block
//! operands. Values produced outside the block are available before it
//! starts, which [`EXTERNAL_CYCLE`] encodes.

use parallelism_ir::InstId;

use crate::context::{BlockContext, Cycle, Pass};
use crate::SchedError;

/// ASAP cycle of a value defined outside the block under analysis
pub const EXTERNAL_CYCLE: Cycle = -1;

/// Earliest cycle of `inst`, memoized in the context
///
/// Records a dependency edge for every in-block operand and assigns the
/// node label on first visit.
pub fn asap(ctx: &mut BlockContext<'_>, inst: InstId) -> Result<Cycle, SchedError> {
    if !ctx.is_local(inst) {
        return Ok(EXTERNAL_CYCLE);
    }
    if let Some(&cycle) = ctx.asap.get(&inst) {
        return Ok(cycle);
    }

    let function = ctx.function;
    ctx.enter(inst, Pass::Asap)?;
    ctx.discover(inst);

    let mut cycle: Cycle = 0;
    for operand in function.inst(inst).operand_insts() {
        let local = ctx.is_local(operand);
        // In-block terminators and markers carry no schedulable result
        if local && !function.inst(operand).is_schedulable() {
            continue;
        }
        let operand_cycle = asap(ctx, operand)?;
        cycle = cycle.max(operand_cycle + 1);
        if local {
            ctx.add_edge(operand, inst);
        }
    }

    ctx.leave(inst);
    ctx.asap.insert(inst, cycle);
    ctx.greatest_cycle = ctx.greatest_cycle.max(cycle);
    Ok(cycle)
}

/// Run [`asap`] over the block's schedulable instructions in program order
pub fn schedule_asap(ctx: &mut BlockContext<'_>, insts: &[InstId]) -> Result<(), SchedError> {
    for &inst in insts {
        asap(ctx, inst)?;
    }
    Ok(())
}
