//! Resource dependency graph
//!
//! Builds a validated graph from the complete set of [`Dependency`] records
//! of one resolution pass and derives a deterministic load order from it.
//!
//! A graph only exists if every requirement of every node resolves to
//! exactly one provider and the requirements are acyclic; [`ResourceGraph::build`]
//! rejects anything else.

mod error;
mod node;

pub use error::GraphError;
pub use node::{NodeId, ResourceNode};

use crate::dependency::Dependency;
use kuruma_manifest::Diagnostic;
use node::Walk;
use std::collections::HashSet;
use tracing::{debug, trace};

/// DFS colouring used by cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// The validated dependency graph of one resolution pass.
#[derive(Debug, Clone)]
pub struct ResourceGraph {
    /// Arena of nodes; a node's `NodeId` is its index, which is its input position
    nodes: Vec<ResourceNode>,
}

/// A computed load order.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOrder {
    /// Nodes in load order
    pub nodes: Vec<NodeId>,

    /// Resource identities in load order
    pub resources: Vec<String>,

    /// Findings reported while walking the graph
    pub diagnostics: Vec<Diagnostic>,
}

impl ResourceGraph {
    /// Build and validate the graph. Input order is significant: it is the
    /// node order every tie-break follows.
    pub fn build<I>(dependencies: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Dependency>,
    {
        let nodes: Vec<ResourceNode> = dependencies
            .into_iter()
            .enumerate()
            .map(|(index, dependency)| ResourceNode::new(NodeId(index), dependency))
            .collect();

        check_identities(&nodes)?;

        let mut graph = Self { nodes };
        graph.link()?;
        graph.check_cycles()?;

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.nodes.iter().map(ResourceNode::dependency_count).sum::<usize>(),
            "built resource graph"
        );
        Ok(graph)
    }

    /// All nodes, in node order.
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&ResourceNode> {
        self.nodes.get(id.0)
    }

    /// Look a node up by resource identity.
    pub fn find(&self, resource: &str) -> Option<&ResourceNode> {
        self.nodes.iter().find(|node| node.name() == resource)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The records the graph was built from, in node order.
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.nodes.iter().map(ResourceNode::dependency)
    }

    /// Nodes whose `provides` is `name`; failing that, nodes whose identity is `name`.
    pub fn providers_of(&self, name: &str) -> Vec<NodeId> {
        self.providers_excluding(name, None)
    }

    /// [`providers_of`](Self::providers_of) without `requester` in either stage.
    fn providers_excluding(&self, name: &str, requester: Option<NodeId>) -> Vec<NodeId> {
        let candidates = || {
            self.nodes
                .iter()
                .filter(move |node| Some(node.id()) != requester)
        };

        let by_provides: Vec<NodeId> = candidates()
            .filter(|node| node.provides() == name)
            .map(ResourceNode::id)
            .collect();

        if !by_provides.is_empty() {
            return by_provides;
        }

        candidates()
            .filter(|node| node.name() == name)
            .map(ResourceNode::id)
            .collect()
    }

    /// Nodes with an edge to `id`, in node order.
    pub fn dependents(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.depends_on(id))
            .map(ResourceNode::id)
            .collect()
    }

    /// Nodes without outgoing edges, in node order.
    pub fn dependency_free(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| !node.has_dependencies())
            .map(ResourceNode::id)
            .collect()
    }

    /// Nodes that have dependencies but that nothing depends on, in node order.
    pub fn entrypoints(&self) -> Vec<NodeId> {
        let mut depended_on = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for dependency in node.dependencies() {
                depended_on[dependency.0] = true;
            }
        }

        self.nodes
            .iter()
            .filter(|node| node.has_dependencies() && !depended_on[node.id().0])
            .map(ResourceNode::id)
            .collect()
    }

    /// Compute the load order.
    ///
    /// Dependency-free nodes come first in node order. Each entrypoint is
    /// then walked in node order, depth first, placing dependencies (in
    /// declaration order) before the node that needs them. Every node is
    /// placed exactly once.
    pub fn load_order(&self) -> LoadOrder {
        let mut walk = Walk::new(self.nodes.len());

        for id in self.dependency_free() {
            walk.place(id);
        }

        for id in self.entrypoints() {
            self.nodes[id.0].resolve_dependencies(&self.nodes, &mut walk);
        }

        // Every node of an acyclic graph is dependency-free or reachable from an entrypoint
        debug_assert_eq!(walk.order.len(), self.nodes.len());

        let resources = walk
            .order
            .iter()
            .map(|id| self.nodes[id.0].name().to_string())
            .collect();

        trace!(?resources, "computed load order");
        LoadOrder {
            nodes: walk.order,
            resources,
            diagnostics: walk.diagnostics,
        }
    }

    /// Resolve every requirement to exactly one provider and record the edges.
    fn link(&mut self) -> Result<(), GraphError> {
        let mut edges = Vec::new();

        for node in &self.nodes {
            for requirement in node.requires() {
                let provider = self.provider_for(node, requirement)?;
                edges.push((node.id(), provider, requirement.clone()));
            }
        }

        for (from, to, requirement) in edges {
            trace!(
                from = self.nodes[from.0].name(),
                to = self.nodes[to.0].name(),
                requirement = requirement.as_str(),
                "adding edge"
            );
            self.nodes[from.0].add_dependency(to, &requirement);
        }

        Ok(())
    }

    fn provider_for(&self, node: &ResourceNode, requirement: &str) -> Result<NodeId, GraphError> {
        let providers = self.providers_excluding(requirement, Some(node.id()));

        match providers.as_slice() {
            [] => Err(GraphError::MissingProvider {
                resource: node.name().to_string(),
                requirement: requirement.to_string(),
            }),
            [provider] => Ok(*provider),
            _ => Err(GraphError::AmbiguousProvider {
                resource: node.name().to_string(),
                requirement: requirement.to_string(),
                providers: providers
                    .iter()
                    .map(|id| self.nodes[id.0].name().to_string())
                    .collect(),
            }),
        }
    }

    /// Three-colour depth-first search over the whole graph, in node order.
    fn check_cycles(&self) -> Result<(), GraphError> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        let mut stack = Vec::new();

        for node in &self.nodes {
            if marks[node.id().0] == Mark::Unvisited {
                self.check_cycle(node.id(), &mut marks, &mut stack)?;
            }
        }

        Ok(())
    }

    fn check_cycle(
        &self,
        id: NodeId,
        marks: &mut [Mark],
        stack: &mut Vec<NodeId>,
    ) -> Result<(), GraphError> {
        marks[id.0] = Mark::InProgress;
        stack.push(id);

        for &dependency in self.nodes[id.0].dependencies() {
            match marks[dependency.0] {
                Mark::Unvisited => self.check_cycle(dependency, marks, stack)?,
                Mark::InProgress => {
                    let start = stack
                        .iter()
                        .position(|&on_stack| on_stack == dependency)
                        .unwrap_or(0);
                    let path = stack[start..]
                        .iter()
                        .chain(std::iter::once(&dependency))
                        .map(|id| self.nodes[id.0].name().to_string())
                        .collect();
                    return Err(GraphError::Cycle { path });
                }
                Mark::Done => {}
            }
        }

        stack.pop();
        marks[id.0] = Mark::Done;
        Ok(())
    }
}

impl LoadOrder {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resource identities in load order.
    pub fn names(&self) -> &[String] {
        &self.resources
    }

    /// Position of `resource` in the load order.
    pub fn position(&self, resource: &str) -> Option<usize> {
        self.resources.iter().position(|name| name == resource)
    }
}

fn check_identities(nodes: &[ResourceNode]) -> Result<(), GraphError> {
    let mut seen = HashSet::new();

    for (index, node) in nodes.iter().enumerate() {
        if node.name().is_empty() {
            return Err(GraphError::EmptyIdentity {
                index,
                field: "resource",
            });
        }
        if node.provides().is_empty() {
            return Err(GraphError::EmptyIdentity {
                index,
                field: "provides",
            });
        }
        if !seen.insert(node.name()) {
            return Err(GraphError::DuplicateResource(node.name().to_string()));
        }
    }

    Ok(())
}
