//! Statement shapes recognized in manifest documents.
//!
//! Only the parts the interpreter reads are kept: bare-name calls with
//! literal arguments. Every other well-formed statement is validated by
//! the parser and recorded as [`StatementKind::Other`].

use crate::token::Span;

/// A parsed manifest: the top-level statements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `name arg arg ...` where every argument is a string literal or a table
    Declaration { name: String, args: Vec<Argument> },

    /// Any other call, assignment or `local` declaration
    Other,
}

/// A literal call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// `name "text"`
    String(String),

    /// `name { ... }`: the value of each field, in order
    Table(Vec<Value>),
}

/// A value position: a lone string literal, or any other expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Other,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Other => None,
        }
    }
}
