//! Graph vertices

use crate::dependency::Dependency;
use kuruma_manifest::{Diagnostic, DiagnosticKind};
use std::fmt;

/// Stable handle to a node: its position in the graph's input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One resource in a [`ResourceGraph`](super::ResourceGraph).
///
/// Edges point at the nodes this one depends on and are stored as handles;
/// the graph owns every node. Each edge remembers which requirement it
/// satisfies.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    id: NodeId,
    source: Dependency,
    dependencies: Vec<NodeId>,
    satisfied: Vec<String>,
}

impl ResourceNode {
    pub(crate) fn new(id: NodeId, source: Dependency) -> Self {
        Self {
            id,
            source,
            dependencies: Vec::new(),
            satisfied: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The resource identity.
    pub fn name(&self) -> &str {
        &self.source.resource
    }

    pub fn provides(&self) -> &str {
        &self.source.provides
    }

    pub fn requires(&self) -> &[String] {
        &self.source.requires
    }

    pub fn dependency(&self) -> &Dependency {
        &self.source
    }

    /// Resolved dependency nodes, in the order their requirements were declared.
    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// Requirements not backed by any resolved edge.
    pub fn missing_dependencies(&self) -> Vec<&str> {
        self.requires()
            .iter()
            .filter(|name| !self.satisfied.contains(name))
            .map(String::as_str)
            .collect()
    }

    pub fn depends_on(&self, other: NodeId) -> bool {
        self.dependencies.contains(&other)
    }

    /// Record that `requirement` is satisfied by `other`. Only called while
    /// the graph is being built.
    pub(crate) fn add_dependency(&mut self, other: NodeId, requirement: &str) {
        if !self.depends_on(other) {
            self.dependencies.push(other);
        }
        if !self.satisfied.iter().any(|name| name == requirement) {
            self.satisfied.push(requirement.to_string());
        }
    }

    /// Post-order walk: place every dependency, then this node. Nodes
    /// already placed are not walked again; everything below them is placed.
    pub(crate) fn resolve_dependencies(&self, nodes: &[ResourceNode], walk: &mut Walk) {
        if walk.is_placed(self.id) {
            return;
        }

        let missing = self.missing_dependencies();
        if !missing.is_empty() {
            walk.diagnostics.push(
                Diagnostic::new(DiagnosticKind::MissingDependencies {
                    names: missing.iter().map(|s| s.to_string()).collect(),
                })
                .for_resource(self.name()),
            );
        }

        for dependency in &self.dependencies {
            nodes[dependency.0].resolve_dependencies(nodes, walk);
        }

        walk.place(self.id);
    }
}

/// Accumulated state of a load-order walk.
#[derive(Debug)]
pub(crate) struct Walk {
    placed: Vec<bool>,
    pub(crate) order: Vec<NodeId>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Walk {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            placed: vec![false; len],
            order: Vec::with_capacity(len),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn is_placed(&self, id: NodeId) -> bool {
        self.placed[id.0]
    }

    pub(crate) fn place(&mut self, id: NodeId) {
        if !self.placed[id.0] {
            self.placed[id.0] = true;
            self.order.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: usize, resource: &str, requires: &[&str], provides: &str) -> ResourceNode {
        ResourceNode::new(
            NodeId(id),
            Dependency::new(resource, requires.iter().copied(), provides),
        )
    }

    #[test]
    fn test_post_order_walk() {
        // A requires B and C; D provides B; C requires B
        let mut a = node(0, "A", &["B", "C"], "A");
        let d = node(1, "D", &[], "B");
        let mut c = node(2, "C", &["B"], "C");
        a.add_dependency(NodeId(1), "B");
        a.add_dependency(NodeId(2), "C");
        c.add_dependency(NodeId(1), "B");
        let nodes = vec![a, d, c];

        let mut walk = Walk::new(nodes.len());
        nodes[0].resolve_dependencies(&nodes, &mut walk);
        assert_eq!(walk.order, vec![NodeId(1), NodeId(2), NodeId(0)]);
        assert!(walk.diagnostics.is_empty());
    }

    #[test]
    fn test_add_dependency_records_edge() {
        let mut a = node(0, "A", &["B"], "A");
        a.add_dependency(NodeId(1), "B");
        assert!(a.depends_on(NodeId(1)));
        assert!(!a.depends_on(NodeId(2)));
        assert_eq!(a.dependency_count(), 1);
        assert!(a.has_dependencies());
    }

    #[test]
    fn test_same_target_twice_is_one_edge() {
        let mut a = node(0, "A", &["b", "B"], "A");
        a.add_dependency(NodeId(1), "b");
        a.add_dependency(NodeId(1), "B");
        assert_eq!(a.dependencies(), &[NodeId(1)]);
        assert!(a.missing_dependencies().is_empty());
    }

    #[test]
    fn test_missing_dependencies() {
        let empty = node(0, "A", &[], "A");
        assert!(empty.missing_dependencies().is_empty());

        let mut a = node(0, "A", &["B", "C"], "A");
        a.add_dependency(NodeId(1), "C");
        assert_eq!(a.missing_dependencies(), vec!["B"]);
    }

    #[test]
    fn test_walk_reports_missing_dependencies() {
        let a = node(0, "A", &["ghost"], "A");
        let nodes = vec![a];
        let mut walk = Walk::new(1);
        nodes[0].resolve_dependencies(&nodes, &mut walk);
        assert_eq!(walk.order, vec![NodeId(0)]);
        assert_eq!(
            walk.diagnostics[0].kind,
            DiagnosticKind::MissingDependencies {
                names: vec!["ghost".to_string()]
            }
        );
        assert_eq!(walk.diagnostics[0].resource.as_deref(), Some("A"));
    }
}
