//! Resolution entry point
//!
//! Takes the manifest text of every resource in a set, interprets and
//! extracts each one, builds the graph and computes the load order.

use crate::dependency::{Dependency, DependencyExtractor, Extraction};
use crate::error::Error;
use crate::graph::ResourceGraph;
use kuruma_manifest::{CallStatementInterpreter, Diagnostic, ManifestInterpreter};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// One resource's identity and manifest text, as supplied by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSource {
    pub resource: String,
    pub text: String,
}

impl ManifestSource {
    pub fn new(resource: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            text: text.into(),
        }
    }
}

/// Outcome of a successful resolution pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Resource identities in the order they must load
    pub load_order: Vec<String>,

    /// Extracted records, in input order
    pub dependencies: Vec<Dependency>,

    /// Every non-fatal finding of the pass
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolution driver
pub struct Resolver {
    interpreter: Box<dyn ManifestInterpreter>,
    extractor: DependencyExtractor,
}

impl Resolver {
    /// Create a resolver using the default manifest interpreter
    pub fn new() -> Self {
        Self {
            interpreter: Box::new(CallStatementInterpreter::new()),
            extractor: DependencyExtractor::new(),
        }
    }

    /// Replace the manifest interpreter
    pub fn with_interpreter(mut self, interpreter: impl ManifestInterpreter + 'static) -> Self {
        self.interpreter = Box::new(interpreter);
        self
    }

    /// Enable or disable `@resource/...` script-path inference
    pub fn with_script_inference(mut self, enabled: bool) -> Self {
        self.extractor = self.extractor.with_script_inference(enabled);
        self
    }

    pub fn extractor(&self) -> DependencyExtractor {
        self.extractor
    }

    /// Interpret and extract a single manifest. Interpretation diagnostics
    /// come before extraction diagnostics.
    pub fn extract(&self, source: &ManifestSource) -> Result<Extraction, Error> {
        let interpretation =
            self.interpreter
                .interpret(&source.text)
                .map_err(|source_error| Error::Manifest {
                    resource: source.resource.clone(),
                    source: source_error,
                })?;

        let mut extraction = self
            .extractor
            .extract(&interpretation.properties, &source.resource);

        let mut diagnostics: Vec<Diagnostic> = interpretation
            .diagnostics
            .into_iter()
            .map(|diagnostic| diagnostic.for_resource(source.resource.as_str()))
            .collect();
        diagnostics.append(&mut extraction.diagnostics);
        extraction.diagnostics = diagnostics;

        debug!(
            resource = source.resource.as_str(),
            requires = ?extraction.dependency.requires,
            provides = extraction.dependency.provides.as_str(),
            "extracted dependency"
        );
        Ok(extraction)
    }

    /// Extract every manifest, keeping input order. The first failing
    /// manifest in input order is reported.
    pub fn extract_all(&self, sources: &[ManifestSource]) -> Result<Vec<Extraction>, Error> {
        #[cfg(feature = "parallel")]
        let results: Vec<Result<Extraction, Error>> = {
            use rayon::prelude::*;
            sources.par_iter().map(|source| self.extract(source)).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<Extraction, Error>> =
            sources.iter().map(|source| self.extract(source)).collect();

        results.into_iter().collect()
    }

    /// Extract every manifest and build the validated graph.
    pub fn build_graph(&self, sources: &[ManifestSource]) -> Result<ResourceGraph, Error> {
        let extractions = self.extract_all(sources)?;
        let graph =
            ResourceGraph::build(extractions.into_iter().map(|extraction| extraction.dependency))?;
        Ok(graph)
    }

    /// Run a full resolution pass over one resource set.
    pub fn resolve(&self, sources: &[ManifestSource]) -> Result<Resolution, Error> {
        let extractions = self.extract_all(sources)?;

        let mut diagnostics = Vec::new();
        let mut dependencies = Vec::with_capacity(extractions.len());
        for extraction in extractions {
            diagnostics.extend(extraction.diagnostics);
            dependencies.push(extraction.dependency);
        }

        let resolution = resolve_dependencies(dependencies)?;
        diagnostics.extend(resolution.diagnostics);

        Ok(Resolution {
            load_order: resolution.load_order,
            dependencies: resolution.dependencies,
            diagnostics,
        })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

/// Order already-extracted records. Used when a collaborator supplies
/// [`Dependency`] records directly instead of manifest text.
pub fn resolve_dependencies(dependencies: Vec<Dependency>) -> Result<Resolution, Error> {
    let graph = ResourceGraph::build(dependencies)?;
    let order = graph.load_order();

    debug!(resources = order.len(), "resolved load order");
    Ok(Resolution {
        load_order: order.resources,
        dependencies: graph.dependencies().cloned().collect(),
        diagnostics: order.diagnostics,
    })
}
