//! Non-fatal diagnostics.
//!
//! Interpretation, extraction and ordering report recoverable findings as
//! values instead of printing them; callers decide how to present them.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The resource the diagnostic concerns, once known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A statement matched neither declaration shape and was dropped
    UnrecognizedStatement {
        line: u32,
        column: u32,
        statement: String,
    },

    /// `provides` differs from the resource identity
    ProvidesOverride { provides: String, property: String },

    /// Requirements not backed by a resolved dependency
    MissingDependencies { names: Vec<String> },
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind) -> Self {
        Self {
            resource: None,
            kind,
        }
    }

    /// Attach the resource this diagnostic belongs to.
    pub fn for_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resource = self.resource.as_deref().unwrap_or("<manifest>");
        match &self.kind {
            DiagnosticKind::UnrecognizedStatement {
                line,
                column,
                statement,
            } => write!(
                f,
                "Resource \"{}\": ignoring statement at {}:{}: {}",
                resource, line, column, statement
            ),
            DiagnosticKind::ProvidesOverride { provides, property } => write!(
                f,
                "Resource \"{}\" overrides its name as \"{}\" using the \"{}\" property in its manifest file",
                resource, provides, property
            ),
            DiagnosticKind::MissingDependencies { names } => write!(
                f,
                "Resource \"{}\" has missing dependencies: {}",
                resource,
                names.join(", ")
            ),
        }
    }
}
