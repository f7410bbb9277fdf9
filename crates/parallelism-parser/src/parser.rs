//! Recursive descent parser producing unresolved syntax

use parallelism_ir::Span;
use parallelism_lexer::{Token, TokenKind};

use crate::ParseError;

/// A function as written, before name resolution
#[derive(Debug, Clone)]
pub struct RawFunction {
    pub name: String,
    pub params: Vec<(String, Span)>,
    pub blocks: Vec<RawBlock>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct RawBlock {
    pub label: String,
    pub insts: Vec<RawInst>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct RawInst {
    pub name: Option<String>,
    pub opcode: String,
    pub operands: Vec<RawOperand>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOperandKind {
    Local(String),
    Global(String),
    Label(String),
    Int(i64),
}

#[derive(Debug, Clone)]
pub struct RawOperand {
    pub kind: RawOperandKind,
    pub span: Span,
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    // === Utilities ===

    fn current(&self) -> &Token {
        // tokenize() always ends the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_ahead(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(
                kind.describe(),
                self.peek(),
                self.current().span,
            ))
        }
    }

    fn text(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    /// Text of a sigil-prefixed token without its sigil
    fn sigil_text(&self, token: &Token) -> String {
        self.text(token)[1..].to_string()
    }

    fn span(&self) -> Span {
        self.current().span
    }

    fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    /// End of an instruction or label line
    fn end_of_line(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            // `}` closes the function; let the caller consume it
            TokenKind::RBrace => Ok(()),
            other => Err(ParseError::unexpected("end of line", other, self.span())),
        }
    }

    // === Module ===

    pub fn parse_module(&mut self) -> Result<Vec<RawFunction>, ParseError> {
        let mut functions = Vec::new();
        self.skip_newlines();
        while !self.at(TokenKind::Eof) {
            functions.push(self.parse_function()?);
            self.skip_newlines();
        }
        Ok(functions)
    }

    // === Functions ===

    fn parse_function(&mut self) -> Result<RawFunction, ParseError> {
        let start = self.span();
        self.consume(TokenKind::Fn)?;
        let name_token = self.consume(TokenKind::Ident)?;
        let name = self.text(&name_token).to_string();

        self.consume(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                let token = self.consume(TokenKind::Local)?;
                params.push((self.sigil_text(&token), token.span));
                if self.at(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen)?;
        self.skip_newlines();
        self.consume(TokenKind::LBrace)?;

        let mut blocks: Vec<RawBlock> = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek() {
                TokenKind::RBrace => break,
                TokenKind::Ident if self.peek_ahead(1) == TokenKind::Colon => {
                    let label_token = self.advance();
                    self.advance();
                    blocks.push(RawBlock {
                        label: self.text(&label_token).to_string(),
                        insts: Vec::new(),
                        span: label_token.span,
                    });
                    self.end_of_line()?;
                }
                TokenKind::Local | TokenKind::Ident => {
                    let inst = self.parse_instruction()?;
                    let block = blocks
                        .last_mut()
                        .ok_or(ParseError::InstructionOutsideBlock { span: inst.span })?;
                    block.span = block.span.merge(inst.span);
                    block.insts.push(inst);
                }
                other => {
                    return Err(ParseError::unexpected(
                        "block label or instruction",
                        other,
                        self.span(),
                    ));
                }
            }
        }

        let end = self.consume(TokenKind::RBrace)?.span;
        Ok(RawFunction {
            name,
            params,
            blocks,
            span: start.merge(end),
        })
    }

    // === Instructions ===

    fn parse_instruction(&mut self) -> Result<RawInst, ParseError> {
        let start = self.span();
        let name = if self.at(TokenKind::Local) {
            let token = self.advance();
            self.consume(TokenKind::Eq)?;
            Some(self.sigil_text(&token))
        } else {
            None
        };

        let opcode_token = self.consume(TokenKind::Ident)?;
        let opcode = self.text(&opcode_token).to_string();
        let mut end = opcode_token.span;

        let mut operands = Vec::new();
        if self.peek().starts_operand() {
            loop {
                let operand = self.parse_operand()?;
                end = operand.span;
                operands.push(operand);
                if self.at(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.end_of_line()?;

        Ok(RawInst {
            name,
            opcode,
            operands,
            span: start.merge(end),
        })
    }

    fn parse_operand(&mut self) -> Result<RawOperand, ParseError> {
        let token = self.advance();
        let kind = match token.kind {
            TokenKind::Local => RawOperandKind::Local(self.sigil_text(&token)),
            TokenKind::Global => RawOperandKind::Global(self.sigil_text(&token)),
            TokenKind::Ident => RawOperandKind::Label(self.text(&token).to_string()),
            TokenKind::Int => {
                let text = self.text(&token);
                let value = text.parse::<i64>().map_err(|_| ParseError::InvalidInteger {
                    text: text.to_string(),
                    span: token.span,
                })?;
                RawOperandKind::Int(value)
            }
            other => return Err(ParseError::unexpected("operand", other, token.span)),
        };
        Ok(RawOperand {
            kind,
            span: token.span,
        })
    }
}
