//! Parser for the manifest dialect
//!
//! A recursive descent recognizer over the pre-tokenized input. It accepts
//! the statement forms that appear in resource manifests (calls, assignments
//! and `local` declarations). Expressions are checked for well-formedness
//! but not kept; only bare-name calls with literal arguments are returned
//! with their contents. Block constructs are rejected: a manifest containing
//! `function`, `if`, `for` and friends is a syntax error.
//!
//! Parsing stops at the first error.

use crate::ast::*;
use crate::error::ManifestError;
use crate::lexer::Lexer;
use crate::token::{Span, Token};

/// Nesting limit for expressions and table constructors.
const MAX_DEPTH: usize = 200;

/// Parse a manifest document into its statements.
pub fn parse(source: &str) -> Result<Chunk, ManifestError> {
    Parser::new(source)?.parse()
}

/// Parser state for one manifest document.
pub struct Parser<'a> {
    source: &'a str,

    /// Pre-tokenized input, always terminated by `Token::Eof`
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Current expression nesting depth
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Tokenize `source` and prepare to parse it.
    pub fn new(source: &'a str) -> Result<Self, ManifestError> {
        let tokens = Lexer::new(source).tokenize().map_err(|errors| {
            match errors.first() {
                Some(first) => ManifestError::from_lex(first, source),
                None => ManifestError::syntax("invalid input", Span::default(), source),
            }
        })?;

        Ok(Self {
            source,
            tokens,
            pos: 0,
            depth: 0,
        })
    }

    /// Parse the whole document.
    pub fn parse(mut self) -> Result<Chunk, ManifestError> {
        let mut statements = Vec::new();

        while !self.at_eof() {
            if self.eat(&Token::Semicolon) {
                continue;
            }
            statements.push(self.parse_statement()?);
        }

        Ok(Chunk { statements })
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    #[inline]
    fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    #[inline]
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(tok, _)| tok)
    }

    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].1
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    #[inline]
    fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ManifestError> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", expected)))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ManifestError> {
        match self.current().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("a name")),
        }
    }

    fn error(&self, message: impl Into<String>, span: Span) -> ManifestError {
        ManifestError::syntax(message, span, self.source)
    }

    fn unexpected(&self, expected: &str) -> ManifestError {
        let found = match self.current() {
            Token::StringLiteral(s) => format!("\"{}\"", s),
            other => other.to_string(),
        };
        self.error(
            format!("expected {}, found `{}`", expected, found),
            self.current_span(),
        )
    }

    fn enter(&mut self) -> Result<(), ManifestError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("expression nesting too deep", self.current_span()));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }


    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement(&mut self) -> Result<Statement, ManifestError> {
        let start = self.current_span();

        let kind = match self.current().clone() {
            Token::Local => self.parse_local()?,
            Token::Reserved(keyword) => {
                return Err(self.error(
                    format!("`{}` is not supported in manifests", keyword),
                    start,
                ))
            }
            _ => self.parse_expression_statement(start)?,
        };

        Ok(Statement {
            kind,
            span: start.merge(&self.previous_span()),
        })
    }

    fn parse_local(&mut self) -> Result<StatementKind, ManifestError> {
        self.advance();

        if let Token::Reserved(keyword) = self.current() {
            return Err(self.error(
                format!("`local {}` is not supported in manifests", keyword),
                self.current_span(),
            ));
        }

        self.expect_identifier()?;
        while self.eat(&Token::Comma) {
            self.expect_identifier()?;
        }
        if self.eat(&Token::Equal) {
            self.skip_expression_list()?;
        }

        Ok(StatementKind::Other)
    }

    fn parse_expression_statement(&mut self, start: Span) -> Result<StatementKind, ManifestError> {
        let first = self.parse_suffixed()?;

        if self.check(&Token::Equal) || self.check(&Token::Comma) {
            let mut assignable = first.is_assignable();
            while self.eat(&Token::Comma) {
                assignable &= self.parse_suffixed()?.is_assignable();
            }
            if !assignable {
                return Err(self.error("cannot assign to this expression", start));
            }
            self.expect(Token::Equal)?;
            self.skip_expression_list()?;
            return Ok(StatementKind::Other);
        }

        match first.last {
            Suffix::Call => Ok(first.into_statement()),
            _ => Err(self.error("expected a call or an assignment", start)),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// A name or parenthesised expression followed by any number of field
    /// accesses, indexes and calls.
    fn parse_suffixed(&mut self) -> Result<Suffixed, ManifestError> {
        let mut suffixed = match self.current().clone() {
            Token::Identifier(name) => {
                self.advance();
                Suffixed {
                    declaration: Some((name, Vec::new())),
                    last: Suffix::Name,
                }
            }
            Token::LeftParen => {
                self.advance();
                self.skip_expression()?;
                self.expect(Token::RightParen)?;
                Suffixed {
                    declaration: None,
                    last: Suffix::Paren,
                }
            }
            _ => return Err(self.unexpected("an expression")),
        };

        loop {
            match self.current() {
                Token::Dot => {
                    self.advance();
                    self.expect_identifier()?;
                    suffixed.declaration = None;
                    suffixed.last = Suffix::Access;
                }
                Token::LeftBracket => {
                    self.advance();
                    self.skip_expression()?;
                    self.expect(Token::RightBracket)?;
                    suffixed.declaration = None;
                    suffixed.last = Suffix::Access;
                }
                Token::Colon => {
                    self.advance();
                    self.expect_identifier()?;
                    self.parse_call_args()?;
                    suffixed.declaration = None;
                    suffixed.last = Suffix::Call;
                }
                Token::StringLiteral(_) | Token::LeftBrace | Token::LeftParen => {
                    let argument = self.parse_call_args()?;
                    suffixed.declaration = match (suffixed.declaration.take(), argument) {
                        (Some((name, mut args)), Some(argument)) => {
                            args.push(argument);
                            Some((name, args))
                        }
                        _ => None,
                    };
                    suffixed.last = Suffix::Call;
                }
                _ => return Ok(suffixed),
            }
        }
    }

    /// Literal arguments are returned; parenthesised argument lists are
    /// only checked.
    fn parse_call_args(&mut self) -> Result<Option<Argument>, ManifestError> {
        match self.current().clone() {
            Token::StringLiteral(s) => {
                self.advance();
                Ok(Some(Argument::String(s)))
            }
            Token::LeftBrace => Ok(Some(Argument::Table(self.parse_table()?))),
            Token::LeftParen => {
                self.advance();
                if !self.eat(&Token::RightParen) {
                    self.skip_expression_list()?;
                    self.expect(Token::RightParen)?;
                }
                Ok(None)
            }
            _ => Err(self.unexpected("call arguments")),
        }
    }

    fn parse_table(&mut self) -> Result<Vec<Value>, ManifestError> {
        self.enter()?;
        self.expect(Token::LeftBrace)?;
        let mut values = Vec::new();

        while !self.check(&Token::RightBrace) {
            match self.current() {
                Token::LeftBracket => {
                    self.advance();
                    self.skip_expression()?;
                    self.expect(Token::RightBracket)?;
                    self.expect(Token::Equal)?;
                }
                Token::Identifier(_) if matches!(self.peek(), Some(Token::Equal)) => {
                    self.advance();
                    self.advance();
                }
                _ => {}
            }
            values.push(self.parse_value()?);

            if !(self.eat(&Token::Comma) || self.eat(&Token::Semicolon)) {
                break;
            }
        }

        self.expect(Token::RightBrace)?;
        self.leave();
        Ok(values)
    }

    fn skip_expression_list(&mut self) -> Result<(), ManifestError> {
        self.parse_value()?;
        while self.eat(&Token::Comma) {
            self.parse_value()?;
        }
        Ok(())
    }

    fn skip_expression(&mut self) -> Result<(), ManifestError> {
        self.parse_value().map(|_| ())
    }

    /// Check one expression: operands joined by binary operators, each
    /// optionally preceded by unary operators. Only a lone string literal
    /// keeps its value.
    fn parse_value(&mut self) -> Result<Value, ManifestError> {
        self.enter()?;
        let mut operands = 0;
        let mut value = Value::Other;

        loop {
            let mut prefixed = false;
            while is_unary_operator(self.current()) {
                self.advance();
                prefixed = true;
            }

            let operand = self.parse_operand()?;
            operands += 1;
            value = if prefixed { Value::Other } else { operand };

            if !is_binary_operator(self.current()) {
                break;
            }
            self.advance();
        }

        self.leave();
        Ok(if operands == 1 { value } else { Value::Other })
    }

    fn parse_operand(&mut self) -> Result<Value, ManifestError> {
        match self.current().clone() {
            Token::StringLiteral(s) => {
                self.advance();
                Ok(Value::String(s))
            }
            Token::Number(_) | Token::Nil | Token::True | Token::False | Token::Ellipsis => {
                self.advance();
                Ok(Value::Other)
            }
            Token::LeftBrace => {
                self.parse_table()?;
                Ok(Value::Other)
            }
            Token::Reserved(keyword) => Err(self.error(
                format!("`{}` is not supported in manifests", keyword),
                self.current_span(),
            )),
            _ => {
                self.parse_suffixed()?;
                Ok(Value::Other)
            }
        }
    }
}

/// What the parser learned about a prefix expression.
struct Suffixed {
    /// Still `Some` while the expression is a bare name followed only by literal arguments
    declaration: Option<(String, Vec<Argument>)>,
    last: Suffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Suffix {
    Name,
    Paren,
    Access,
    Call,
}

impl Suffixed {
    fn is_assignable(&self) -> bool {
        matches!(self.last, Suffix::Name | Suffix::Access)
    }

    fn into_statement(self) -> StatementKind {
        match self.declaration {
            Some((name, args)) => StatementKind::Declaration { name, args },
            None => StatementKind::Other,
        }
    }
}

fn is_unary_operator(token: &Token) -> bool {
    matches!(token, Token::Minus | Token::Not | Token::Hash)
}

fn is_binary_operator(token: &Token) -> bool {
    matches!(
        token,
        Token::Or
            | Token::And
            | Token::EqualEqual
            | Token::TildeEqual
            | Token::Less
            | Token::LessEqual
            | Token::Greater
            | Token::GreaterEqual
            | Token::DotDot
            | Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::SlashSlash
            | Token::Percent
            | Token::Caret
    )
}
