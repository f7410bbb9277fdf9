//! Parallelism - Instruction-level parallelism analysis of basic blocks
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use parallelism_ir as ir;
pub use parallelism_lexer as lexer;
pub use parallelism_parser as parser;
pub use parallelism_sched as sched;
