//! Error types for IR construction and verification

use crate::Span;
use thiserror::Error;

/// Errors raised while building or verifying a function
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IrError {
    /// E-IR-001
    #[error("undefined value: %{name}")]
    UndefinedValue { name: String, span: Span },

    /// E-IR-002
    #[error("undefined block label: {label}")]
    UndefinedLabel { label: String, span: Span },

    /// E-IR-003
    #[error("value %{name} is defined more than once")]
    DuplicateValue { name: String, span: Span },

    /// E-IR-004
    #[error("block label {label} is defined more than once")]
    DuplicateLabel { label: String, span: Span },

    /// E-IR-005
    #[error("function {name} is defined more than once")]
    DuplicateFunction { name: String, span: Span },

    /// E-IR-006: a terminator followed by more instructions in the same block
    #[error("terminator '{opcode}' must be the last instruction of block {block}")]
    MisplacedTerminator {
        opcode: String,
        block: String,
        span: Span,
    },

    /// E-IR-007: operand refers to an instruction or block the function does not own
    #[error("operand of '{opcode}' refers to a missing {what}")]
    DanglingOperand {
        opcode: String,
        what: &'static str,
        span: Span,
    },
}

impl IrError {
    pub fn span(&self) -> Span {
        match self {
            IrError::UndefinedValue { span, .. } => *span,
            IrError::UndefinedLabel { span, .. } => *span,
            IrError::DuplicateValue { span, .. } => *span,
            IrError::DuplicateLabel { span, .. } => *span,
            IrError::DuplicateFunction { span, .. } => *span,
            IrError::MisplacedTerminator { span, .. } => *span,
            IrError::DanglingOperand { span, .. } => *span,
        }
    }

    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            IrError::UndefinedValue { .. } => "E-IR-001",
            IrError::UndefinedLabel { .. } => "E-IR-002",
            IrError::DuplicateValue { .. } => "E-IR-003",
            IrError::DuplicateLabel { .. } => "E-IR-004",
            IrError::DuplicateFunction { .. } => "E-IR-005",
            IrError::MisplacedTerminator { .. } => "E-IR-006",
            IrError::DanglingOperand { .. } => "E-IR-007",
        }
    }
}
