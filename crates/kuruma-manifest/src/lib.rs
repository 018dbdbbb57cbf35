//! Kuruma manifest dialect
//!
//! Resource manifests are small declarative Lua files made of call
//! statements such as `dependency "base"` or `files { "a", "b" }`. This crate
//! provides:
//! - A logos-based lexer for the dialect
//! - A recursive descent parser producing a statement tree
//! - The [`ManifestInterpreter`] capability and its default implementation,
//!   which reduces a manifest to a [`PropertyMap`]
//! - [`Diagnostic`]s for recoverable findings, shared with the resolver

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod property;
pub mod token;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::ManifestError;
pub use interpreter::{interpret, CallStatementInterpreter, Interpretation, ManifestInterpreter};
pub use lexer::{LexError, Lexer};
pub use parser::{parse, Parser};
pub use property::{PropertyMap, PropertyValue};
pub use token::{Span, Token};
