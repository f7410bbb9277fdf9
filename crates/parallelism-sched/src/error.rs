//! Error types for block scheduling and graph export

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    /// E-SCHED-001: an instruction depends on itself within one block
    #[error("dependency cycle in {function}::{block} at {inst}: {cycle}")]
    DependencyCycle {
        function: String,
        block: String,
        inst: String,
        /// Full cycle path, e.g. "%i -> %next -> %i"
        cycle: String,
    },

    /// E-SCHED-002: the two cycle maps disagree
    #[error("inconsistent schedule in {function}::{block} at {inst}: {reason}")]
    Inconsistent {
        function: String,
        block: String,
        inst: String,
        reason: String,
    },

    /// E-SCHED-003
    #[error("failed to write graph {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SchedError {
    pub fn export(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SchedError::Export {
            path: path.into(),
            source,
        }
    }

    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            SchedError::DependencyCycle { .. } => "E-SCHED-001",
            SchedError::Inconsistent { .. } => "E-SCHED-002",
            SchedError::Export { .. } => "E-SCHED-003",
        }
    }
}
