//! Parallelism IR - The host intermediate representation
//!
//! A deliberately small SSA form: functions own an instruction arena and an
//! ordered list of basic blocks. Instructions carry an opcode, a closed
//! [`InstKind`] (compute, terminator, marker) and typed operands; the reverse
//! "used by" relation is precomputed per function.

mod builder;
mod error;
mod function;
mod instruction;
mod module;
mod printer;
mod span;

pub use builder::*;
pub use error::*;
pub use function::*;
pub use instruction::*;
pub use module::*;
pub use span::*;
