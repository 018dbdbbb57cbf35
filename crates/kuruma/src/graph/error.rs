//! Graph construction errors

use thiserror::Error;

/// Errors that prevent a [`ResourceGraph`](super::ResourceGraph) from being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A required name has no provider in the full set
    #[error("Resource \"{resource}\" depends on \"{requirement}\", but it could not be found")]
    MissingProvider {
        resource: String,
        requirement: String,
    },

    /// A required name has more than one provider
    #[error(
        "Resource \"{resource}\" depends on \"{requirement}\", but multiple resources provide it ({})",
        .providers.join("/")
    )]
    AmbiguousProvider {
        resource: String,
        requirement: String,
        providers: Vec<String>,
    },

    /// The requirements form a cycle; the path starts and ends on the same resource
    #[error("Circular dependency detected: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    /// Two records share a resource identity
    #[error("Resource \"{0}\" is declared more than once")]
    DuplicateResource(String),

    /// A record has an empty identity or provides an empty name
    #[error("Resource #{index} has an empty {field}")]
    EmptyIdentity { index: usize, field: &'static str },
}
