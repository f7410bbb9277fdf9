//! Scheduling a single basic block

use parallelism_ir::{BlockId, Function, InstId};
use serde::Serialize;

use crate::alap::schedule_alap;
use crate::asap::schedule_asap;
use crate::context::{BlockContext, Cycle};
use crate::graph::{filter_schedulable, DependencyGraph};
use crate::metrics::BlockMetrics;
use crate::mobility::mobility;
use crate::SchedError;

/// The per-instruction result: both cycles and the slack between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub inst: InstId,
    pub label: String,
    /// The instruction in `.pir` syntax
    pub text: String,
    pub asap: Cycle,
    pub alap: Cycle,
    pub mobility: Cycle,
}

/// Everything computed for one basic block
#[derive(Debug, Clone, Serialize)]
pub struct BlockSchedule {
    pub function: String,
    pub block: String,
    /// Position of the block within its function
    pub index: usize,
    /// Entries in discovery (label) order
    pub entries: Vec<ScheduleEntry>,
    pub greatest_cycle: Cycle,
    pub graph: DependencyGraph,
    pub metrics: BlockMetrics,
}

impl BlockSchedule {
    pub fn entry(&self, inst: InstId) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.inst == inst)
    }

    /// Name used for the exported digraph
    pub fn graph_name(&self) -> String {
        format!("{}.{}", self.function, self.block)
    }
}

/// Build the dependency graph of `block` and compute ASAP, ALAP and mobility
///
/// Uses a fresh [`BlockContext`]; on error nothing from this block is kept.
pub fn analyze_block(function: &Function, block: BlockId) -> Result<BlockSchedule, SchedError> {
    let label = &function.block(block).label;
    let insts = filter_schedulable(function, block);
    log::debug!(
        "scheduling {}::{} ({} instructions)",
        function.name,
        label,
        insts.len()
    );

    let mut ctx = BlockContext::new(function, block);
    schedule_asap(&mut ctx, &insts)?;
    schedule_alap(&mut ctx)?;

    let slack = mobility(ctx.asap_map(), ctx.alap_map(), ctx.discovery_order()).map_err(|e| {
        SchedError::Inconsistent {
            function: function.name.clone(),
            block: label.clone(),
            inst: function.inst(e.inst()).display_name(),
            reason: e.to_string(),
        }
    })?;

    // Both maps hold every instruction mobility() accepted
    let entries: Vec<ScheduleEntry> = slack
        .into_iter()
        .map(|(inst, mobility)| {
            let asap = ctx.asap_map()[&inst];
            ScheduleEntry {
                inst,
                label: ctx.label(inst).unwrap_or_default().to_string(),
                text: function.format_inst(function.inst(inst)),
                asap,
                alap: asap + mobility,
                mobility,
            }
        })
        .collect();

    let greatest_cycle = ctx.greatest_cycle();
    Ok(BlockSchedule {
        function: function.name.clone(),
        block: label.clone(),
        index: block.index(),
        metrics: BlockMetrics::compute(&entries, greatest_cycle),
        graph: ctx.graph(),
        entries,
        greatest_cycle,
    })
}
