//! As-late-as-possible scheduling
//!
//! Runs after ASAP and is anchored at the block's greatest ASAP cycle: an
//! instruction may slip until one cycle before its earliest-scheduled user.

use parallelism_ir::InstId;

use crate::context::{BlockContext, Cycle, Pass};
use crate::SchedError;

/// Latest cycle of `inst`, memoized in the context
pub fn alap(ctx: &mut BlockContext<'_>, inst: InstId) -> Result<Cycle, SchedError> {
    if !ctx.is_local(inst) {
        // Consumers in other blocks only run after this block finishes
        return Ok(ctx.greatest_cycle + 1);
    }
    if let Some(&cycle) = ctx.alap.get(&inst) {
        return Ok(cycle);
    }

    let function = ctx.function;
    ctx.enter(inst, Pass::Alap)?;

    let mut bound = ctx.greatest_cycle;
    for &user in function.users(inst) {
        if ctx.is_local(user) && !function.inst(user).is_schedulable() {
            continue;
        }
        let user_cycle = alap(ctx, user)?;
        bound = bound.min(user_cycle - 1);
    }

    ctx.leave(inst);
    ctx.alap.insert(inst, bound);
    Ok(bound)
}

/// Run [`alap`] over every instruction ASAP discovered, latest first
pub fn schedule_alap(ctx: &mut BlockContext<'_>) -> Result<(), SchedError> {
    let order: Vec<InstId> = ctx.discovery_order().iter().rev().copied().collect();
    for inst in order {
        alap(ctx, inst)?;
    }
    Ok(())
}
