//! Kuruma
//!
//! Works out the order in which the resources of a game server must load.
//! Each resource declares what it requires and what it provides in a
//! manifest; kuruma reads those declarations, builds the dependency graph
//! and produces a deterministic load order.
//!
//! This crate provides:
//! - Dependency extraction from interpreted manifests
//! - The validated resource graph and load-order computation
//! - A [`Resolver`] tying interpretation, extraction and ordering together
//! - Resource directory loading and `kuruma.toml` configuration
//! - Dependency tree rendering

pub mod config;
pub mod dependency;
pub mod error;
pub mod graph;
pub mod loader;
pub mod resolver;
pub mod tree;

pub use config::{Config, ConfigError, ResolverConfig, ResourceEntry};
pub use dependency::{Dependency, DependencyExtractor, Extraction};
pub use error::{Error, Result};
pub use graph::{GraphError, LoadOrder, NodeId, ResourceGraph, ResourceNode};
pub use loader::{discover_resources, read_resource, LoadError};
pub use resolver::{resolve_dependencies, ManifestSource, Resolution, Resolver};
pub use tree::render_tree;

pub use kuruma_manifest::{Diagnostic, DiagnosticKind, ManifestError, PropertyMap, PropertyValue};
