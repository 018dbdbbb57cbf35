//! Dependency extraction
//!
//! Derives what a resource requires and what it provides from its manifest
//! properties.

use kuruma_manifest::{Diagnostic, DiagnosticKind, PropertyMap};
use serde::{Deserialize, Serialize};

/// Properties whose `@resource/path` values imply a dependency on `resource`.
pub const SCRIPT_PROPERTIES: [&str; 6] = [
    "client_script",
    "client_scripts",
    "shared_script",
    "shared_scripts",
    "server_script",
    "server_scripts",
];

/// What one resource needs and offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Caller-supplied identity of the resource
    pub resource: String,

    /// Names that must load before this resource
    #[serde(default)]
    pub requires: Vec<String>,

    /// The name other resources can require this one by
    pub provides: String,
}

impl Dependency {
    pub fn new<I, S>(resource: impl Into<String>, requires: I, provides: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource: resource.into(),
            requires: requires.into_iter().map(Into::into).collect(),
            provides: provides.into(),
        }
    }

    /// A resource with no requirements that provides its own name.
    pub fn standalone(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self {
            provides: resource.clone(),
            resource,
            requires: Vec::new(),
        }
    }
}

/// The extracted record plus anything worth reporting about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub dependency: Dependency,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds [`Dependency`] records from property maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyExtractor {
    infer_scripts: bool,
}

impl DependencyExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also infer requirements from `@resource/...` script paths.
    pub fn with_script_inference(mut self, enabled: bool) -> Self {
        self.infer_scripts = enabled;
        self
    }

    pub fn infers_scripts(&self) -> bool {
        self.infer_scripts
    }

    /// Derive the dependency record for `resource`. Never fails: absent
    /// properties fall back to defaults.
    pub fn extract(&self, properties: &PropertyMap, resource: &str) -> Extraction {
        let mut diagnostics = Vec::new();

        let (provides, property) = provided_name(properties, resource);
        if let Some(property) = property {
            if provides != resource {
                diagnostics.push(
                    Diagnostic::new(DiagnosticKind::ProvidesOverride {
                        provides: provides.clone(),
                        property: property.to_string(),
                    })
                    .for_resource(resource),
                );
            }
        }

        let mut requires = explicit_requirements(properties);
        if self.infer_scripts {
            requires.extend(inferred_requirements(properties));
        }
        let requires = dedup_preserving_order(requires);

        Extraction {
            dependency: Dependency {
                resource: resource.to_string(),
                requires,
                provides,
            },
            diagnostics,
        }
    }
}

/// `provide`, then a well-formed `name`, then the identity itself. Returns
/// the property responsible when it was not the identity.
fn provided_name(properties: &PropertyMap, resource: &str) -> (String, Option<&'static str>) {
    if let Some(provide) = properties.scalar("provide").filter(|p| !p.is_empty()) {
        return (provide.to_string(), Some("provide"));
    }

    if let Some(name) = properties.scalar("name").filter(|n| is_valid_resource_name(n)) {
        return (name.to_string(), Some("name"));
    }

    (resource.to_string(), None)
}

/// `dependency` (scalar) takes precedence over `dependencies` (list).
fn explicit_requirements(properties: &PropertyMap) -> Vec<String> {
    if let Some(dependency) = properties.scalar("dependency") {
        return vec![dependency.to_string()];
    }

    properties
        .get("dependencies")
        .map(|value| value.values().map(str::to_string).collect())
        .unwrap_or_default()
}

fn inferred_requirements(properties: &PropertyMap) -> Vec<String> {
    SCRIPT_PROPERTIES
        .iter()
        .filter_map(|key| properties.get(key))
        .flat_map(|value| value.values())
        .filter_map(script_dependency)
        .collect()
}

/// `@resource/path/to/file.lua` → `resource`.
pub fn script_dependency(script: &str) -> Option<String> {
    let path = script.strip_prefix('@')?;
    let name = path.split('/').next().unwrap_or_default();
    (!name.is_empty()).then(|| name.to_string())
}

/// Resource names are ASCII letters, digits, `-` and `_`.
pub fn is_valid_resource_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}
