//! Analysis results for functions and modules, and their text rendering

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::BlockSchedule;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BlockOutcome {
    Scheduled(BlockSchedule),
    Failed { code: &'static str, message: String },
}

#[derive(Debug, Serialize)]
pub struct BlockReport {
    pub index: usize,
    pub label: String,
    pub outcome: BlockOutcome,
    /// Where the graph was written, if it was
    pub graph_path: Option<PathBuf>,
    pub export_error: Option<String>,
}

impl BlockReport {
    pub fn schedule(&self) -> Option<&BlockSchedule> {
        match &self.outcome {
            BlockOutcome::Scheduled(schedule) => Some(schedule),
            BlockOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, BlockOutcome::Failed { .. })
    }
}

#[derive(Debug, Serialize)]
pub struct FunctionReport {
    pub name: String,
    pub blocks: Vec<BlockReport>,
}

impl FunctionReport {
    pub fn block(&self, label: &str) -> Option<&BlockReport> {
        self.blocks.iter().find(|b| b.label == label)
    }

    pub fn failed_blocks(&self) -> impl Iterator<Item = &BlockReport> {
        self.blocks.iter().filter(|b| b.is_failed())
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ModuleReport {
    pub functions: Vec<FunctionReport>,
}

impl ModuleReport {
    pub fn function(&self, name: &str) -> Option<&FunctionReport> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Whether any block failed to schedule
    pub fn has_failures(&self) -> bool {
        self.functions.iter().any(|f| f.failed_blocks().next().is_some())
    }

    pub fn export_failures(&self) -> usize {
        self.functions
            .iter()
            .flat_map(|f| &f.blocks)
            .filter(|b| b.export_error.is_some())
            .count()
    }
}

/// Human-readable report: one table per block
pub fn render_text(report: &ModuleReport) -> String {
    let mut out = String::new();
    for function in &report.functions {
        let _ = writeln!(out, "function {}", function.name);
        for block in &function.blocks {
            render_block(&mut out, block);
        }
    }
    out
}

fn render_block(out: &mut String, block: &BlockReport) {
    let schedule = match &block.outcome {
        BlockOutcome::Scheduled(schedule) => schedule,
        BlockOutcome::Failed { code, message } => {
            let _ = writeln!(
                out,
                "  block {} (#{}): failed [{}] {}",
                block.label, block.index, code, message
            );
            return;
        }
    };

    let m = &schedule.metrics;
    let _ = writeln!(
        out,
        "  block {} (#{}): {} instructions, critical path {}, ilp {:.2}, max width {}",
        block.label, block.index, m.instructions, m.critical_path, m.ilp, m.max_width
    );

    if !schedule.entries.is_empty() {
        let label_width = schedule
            .entries
            .iter()
            .map(|e| e.label.len())
            .max()
            .unwrap_or(0)
            .max("label".len());
        let text_width = schedule
            .entries
            .iter()
            .map(|e| e.text.len())
            .max()
            .unwrap_or(0)
            .max("instruction".len());

        let _ = writeln!(
            out,
            "    {:<lw$}  {:<tw$}  {:>4}  {:>4}  {:>8}",
            "label",
            "instruction",
            "asap",
            "alap",
            "mobility",
            lw = label_width,
            tw = text_width
        );
        for e in &schedule.entries {
            let _ = writeln!(
                out,
                "    {:<lw$}  {:<tw$}  {:>4}  {:>4}  {:>8}",
                e.label,
                e.text,
                e.asap,
                e.alap,
                e.mobility,
                lw = label_width,
                tw = text_width
            );
        }
    }

    if let Some(path) = &block.graph_path {
        let _ = writeln!(out, "    graph: {}", path.display());
    }
    if let Some(err) = &block.export_error {
        let _ = writeln!(out, "    graph export failed: {}", err);
    }
}
