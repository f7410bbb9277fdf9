//! Token definitions for the textual IR

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")] // Newlines are significant
#[logos(skip r";[^\n]*")] // Line comments
pub enum TokenKind {
    #[token("fn")]
    Fn,

    /// `%name`: parameter or instruction result
    #[regex(r"%[A-Za-z0-9_.]+")]
    Local,
    /// `@name`: module-level symbol
    #[regex(r"@[A-Za-z0-9_.]+")]
    Global,
    /// Opcodes, block labels and function names
    #[regex(r"[A-Za-z_][A-Za-z0-9_.]*")]
    Ident,
    #[regex(r"-?[0-9]+")]
    Int,

    #[token("=")]
    Eq,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("\n")]
    Newline,

    Error,
    Eof,
}

impl TokenKind {
    /// Human-readable description for diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Fn => "'fn'",
            TokenKind::Local => "local value",
            TokenKind::Global => "global symbol",
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer",
            TokenKind::Eq => "'='",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Newline => "end of line",
            TokenKind::Error => "error",
            TokenKind::Eof => "end of file",
        }
    }

    /// Whether this token can begin an operand
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Local | TokenKind::Global | TokenKind::Ident | TokenKind::Int
        )
    }
}
