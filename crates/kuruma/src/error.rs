//! Top-level error type

use crate::config::ConfigError;
use crate::graph::GraphError;
use crate::loader::LoadError;
use kuruma_manifest::ManifestError;
use thiserror::Error;

/// Errors returned by the resolution entry points
#[derive(Debug, Error)]
pub enum Error {
    /// A manifest could not be read as the dialect
    #[error("Failed to interpret manifest of resource \"{resource}\": {source}")]
    Manifest {
        resource: String,
        source: ManifestError,
    },

    /// The resource set does not form a valid graph
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

pub type Result<T> = std::result::Result<T, Error>;
