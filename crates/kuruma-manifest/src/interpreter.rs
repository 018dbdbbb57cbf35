//! Manifest interpretation
//!
//! Turns manifest source into a [`PropertyMap`]. Only two declaration shapes
//! carry meaning:
//!
//! - `key "literal"` → scalar
//! - `key { "a", "b" }` → list of the string-literal field values
//!
//! `key "label" { ... }` is read as the list shape as well. Every other
//! statement is dropped with an [`DiagnosticKind::UnrecognizedStatement`].

use crate::ast::{Argument, Statement, StatementKind, Value};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::ManifestError;
use crate::parser;
use crate::property::{PropertyMap, PropertyValue};

/// Longest statement excerpt kept in a diagnostic.
const EXCERPT_LIMIT: usize = 80;

/// The result of interpreting one manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    pub properties: PropertyMap,
    pub diagnostics: Vec<Diagnostic>,
}

/// Capability interface for reading manifest text.
///
/// The dependency graph only depends on this trait, so the manifest grammar
/// can be replaced without touching resolution.
pub trait ManifestInterpreter: Send + Sync {
    fn interpret(&self, source: &str) -> Result<Interpretation, ManifestError>;
}

/// Default interpreter for call-statement manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallStatementInterpreter;

impl CallStatementInterpreter {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestInterpreter for CallStatementInterpreter {
    fn interpret(&self, source: &str) -> Result<Interpretation, ManifestError> {
        let chunk = parser::parse(source)?;
        let mut interpretation = Interpretation::default();

        for statement in &chunk.statements {
            match declaration(statement) {
                Some((key, value)) => {
                    interpretation.properties.insert(key, value);
                }
                None => interpretation
                    .diagnostics
                    .push(unrecognized(statement, source)),
            }
        }

        tracing::trace!(
            properties = interpretation.properties.len(),
            ignored = interpretation.diagnostics.len(),
            "interpreted manifest"
        );
        Ok(interpretation)
    }
}

/// Interpret `source` with the default interpreter.
pub fn interpret(source: &str) -> Result<Interpretation, ManifestError> {
    CallStatementInterpreter.interpret(source)
}

fn declaration(statement: &Statement) -> Option<(&str, PropertyValue)> {
    let StatementKind::Declaration { name, args } = &statement.kind else {
        return None;
    };

    let value = match args.as_slice() {
        [Argument::String(value)] => PropertyValue::Scalar(value.clone()),
        [Argument::Table(values)] | [Argument::String(_), Argument::Table(values)] => {
            string_values(values)
        }
        _ => return None,
    };
    Some((name.as_str(), value))
}

fn string_values(values: &[Value]) -> PropertyValue {
    PropertyValue::List(
        values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

fn unrecognized(statement: &Statement, source: &str) -> Diagnostic {
    let text = statement.span.slice(source).trim();
    let mut excerpt: String = text.chars().take(EXCERPT_LIMIT).collect();
    if excerpt.len() < text.len() {
        excerpt.push_str("...");
    }

    Diagnostic::new(DiagnosticKind::UnrecognizedStatement {
        line: statement.span.line,
        column: statement.span.column,
        statement: excerpt,
    })
}
