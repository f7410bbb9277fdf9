//! Parallelism Parser - Recursive descent parser for the textual IR
//!
//! Parsing happens in two steps: the token stream is turned into raw
//! functions, then names are resolved function-wide (so operands may refer
//! to values defined later, e.g. by a loop-carried `phi`) and the result is
//! built and verified through [`parallelism_ir::FunctionBuilder`].

mod error;
mod lower;
mod parser;

pub use error::*;
pub use parser::*;

use parallelism_ir::Module;
use parallelism_lexer::tokenize;

/// Parse a source string into a verified Module
pub fn parse(source: &str) -> Result<Module, ParseError> {
    let tokens = tokenize(source);
    let mut parser = Parser::new(source, tokens);
    let functions = parser.parse_module()?;
    lower::lower_module(functions)
}
