//! Parallelism Sched - Instruction-level parallelism analysis per basic block
//!
//! For every basic block this crate builds the data-dependency graph of its
//! schedulable instructions and computes:
//!
//! - **ASAP**: the earliest cycle each instruction's operands allow
//! - **ALAP**: the latest cycle that does not delay any in-block user,
//!   anchored at the block's greatest ASAP cycle
//! - **Mobility**: `ALAP - ASAP`, the scheduling slack
//!
//! Every instruction takes one cycle. Blocks are analyzed independently and
//! in order; a block that cannot be scheduled (a dependency cycle inside
//! it) is reported without affecting the others.
//!
//! # Usage
//!
//! ```ignore
//! use parallelism_sched::{analyze_module, render_text, AnalysisSettings};
//!
//! let module = parallelism_parser::parse(&source)?;
//! let settings = AnalysisSettings {
//!     graph_dir: Some("graphs".into()),
//!     ..Default::default()
//! };
//! let report = analyze_module(&module, &settings);
//! print!("{}", render_text(&report));
//! ```

mod alap;
mod asap;
mod context;
mod error;
mod export;
mod graph;
mod metrics;
mod mobility;
mod report;
mod schedule;

pub use alap::{alap, schedule_alap};
pub use asap::{asap, schedule_asap, EXTERNAL_CYCLE};
pub use context::{BlockContext, Cycle, CycleMap};
pub use error::SchedError;
pub use export::{export_graph, function_dir, graph_path, render_dot};
pub use graph::{filter_schedulable, DependencyEdge, DependencyGraph, GraphNode};
pub use metrics::BlockMetrics;
pub use mobility::{mobility, MobilityError};
pub use report::{render_text, BlockOutcome, BlockReport, FunctionReport, ModuleReport};
pub use schedule::{analyze_block, BlockSchedule, ScheduleEntry};

use std::fs;
use std::path::PathBuf;

use parallelism_ir::{Function, Module};

/// Settings controlling what the analysis produces
#[derive(Debug, Clone, Default)]
pub struct AnalysisSettings {
    /// Root directory for per-block DOT files; no export when unset
    pub graph_dir: Option<PathBuf>,
    /// Only analyze the function with this name
    pub function_filter: Option<String>,
}

/// Analyze every block of `function`, in layout order
pub fn analyze_function(function: &Function, settings: &AnalysisSettings) -> FunctionReport {
    log::debug!(
        "analyzing function {} ({} blocks)",
        function.name,
        function.blocks().len()
    );

    if let Some(root) = &settings.graph_dir {
        let dir = function_dir(root, &function.name);
        if let Err(e) = fs::create_dir_all(&dir) {
            // Each block's export will report the failure
            log::warn!("cannot create {}: {}", dir.display(), e);
        }
    }

    let mut blocks = Vec::with_capacity(function.blocks().len());
    for block in function.blocks() {
        let index = block.id.index();
        let mut graph_file = None;
        let mut export_error = None;

        let outcome = match analyze_block(function, block.id) {
            Ok(schedule) => {
                if let Some(root) = &settings.graph_dir {
                    let path = graph_path(root, &function.name, index);
                    match export_graph(&schedule.graph_name(), &schedule.graph, &path) {
                        Ok(()) => graph_file = Some(path),
                        Err(e) => {
                            log::warn!("{}", e);
                            export_error = Some(e.to_string());
                        }
                    }
                }
                BlockOutcome::Scheduled(schedule)
            }
            Err(e) => {
                log::warn!("{}::{} not scheduled: {}", function.name, block.label, e);
                BlockOutcome::Failed {
                    code: e.code(),
                    message: e.to_string(),
                }
            }
        };

        blocks.push(BlockReport {
            index,
            label: block.label.clone(),
            outcome,
            graph_path: graph_file,
            export_error,
        });
    }

    FunctionReport {
        name: function.name.clone(),
        blocks,
    }
}

/// Analyze every function of `module` selected by the settings
pub fn analyze_module(module: &Module, settings: &AnalysisSettings) -> ModuleReport {
    let functions = module
        .functions()
        .iter()
        .filter(|f| {
            settings
                .function_filter
                .as_deref()
                .map_or(true, |name| f.name == name)
        })
        .map(|f| analyze_function(f, settings))
        .collect();
    ModuleReport { functions }
}
