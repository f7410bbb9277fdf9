//! Parser error types

use parallelism_ir::{IrError, Span};
use parallelism_lexer::TokenKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unexpected end of file")]
    UnexpectedEof { span: Span },

    #[error("integer literal out of range: {text}")]
    InvalidInteger { text: String, span: Span },

    #[error("instruction appears before any block label")]
    InstructionOutsideBlock { span: Span },

    #[error(transparent)]
    Ir(#[from] IrError),
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span } => *span,
            ParseError::InvalidInteger { span, .. } => *span,
            ParseError::InstructionOutsideBlock { span } => *span,
            ParseError::Ir(err) => err.span(),
        }
    }

    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        if found == TokenKind::Eof {
            return ParseError::UnexpectedEof { span };
        }
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.describe().to_string(),
            span,
        }
    }
}
