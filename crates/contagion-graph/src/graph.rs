//! The static graph handed to the simulation core.
//!
//! A [`Graph`] is nothing more than a vertex count and an edge list over
//! 0-based node indices. Node attributes are never stored here: the core
//! keeps them in its own snapshots, and the topology is frozen once loaded.

use serde::{Deserialize, Serialize};

use contagion_types::Edge;

use crate::error::GraphError;

/// An immutable graph: `vertex_count` nodes and a list of edges.
///
/// Parallel edges and self-loops are allowed and kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Human-readable graph name (used in reports).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// Number of vertices.
    vertex_count: usize,
    /// Edge list over `0..vertex_count`.
    #[serde(default)]
    edges: Vec<Edge>,
}

impl Graph {
    /// Build a graph, checking every edge endpoint against `vertex_count`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeOutOfRange`] for the first edge that
    /// references a node index `>= vertex_count`.
    pub fn new(vertex_count: usize, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let graph = Self {
            name: None,
            vertex_count,
            edges,
        };
        graph.validate()?;
        Ok(graph)
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check every edge endpoint against the vertex count.
    ///
    /// Deserialized graphs bypass [`Graph::new`], so loaders call this
    /// explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeOutOfRange`] on the first bad edge.
    pub fn validate(&self) -> Result<(), GraphError> {
        match self
            .edges
            .iter()
            .find(|e| e.source() >= self.vertex_count || e.target() >= self.vertex_count)
        {
            Some(edge) => Err(GraphError::EdgeOutOfRange {
                source_node: edge.source(),
                target_node: edge.target(),
                vertex_count: self.vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// The graph name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the name only if none is present. Returns `true` if it was set.
    pub fn name_if_missing(&mut self, name: impl Into<String>) -> bool {
        if self.name.is_some() {
            return false;
        }
        self.name = Some(name.into());
        true
    }

    /// Number of vertices.
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges (parallel edges counted separately).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edge list.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Undirected degree of every node.
    ///
    /// A self-loop adds 2 to its node's degree, and each parallel edge
    /// counts separately.
    pub fn degree_sequence(&self) -> Vec<usize> {
        let mut degrees = vec![0_usize; self.vertex_count];
        for edge in &self.edges {
            for endpoint in [edge.source(), edge.target()] {
                if let Some(d) = degrees.get_mut(endpoint) {
                    *d = d.saturating_add(1);
                }
            }
        }
        degrees
    }

    /// Mean undirected degree, or 0.0 for an empty graph.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_degree(&self) -> f64 {
        if self.vertex_count == 0 {
            return 0.0;
        }
        let total: usize = self.degree_sequence().iter().sum();
        total as f64 / self.vertex_count as f64
    }

    /// One-line summary: name, vertex count, edge count.
    pub fn summary(&self) -> String {
        format!(
            "Graph {} ({} vertices, {} edges)",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.vertex_count,
            self.edges.len()
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn path_graph() -> Graph {
        Graph::new(3, vec![Edge(0, 1), Edge(1, 2)]).unwrap()
    }

    #[test]
    fn rejects_out_of_range_edge() {
        let result = Graph::new(2, vec![Edge(0, 1), Edge(1, 2)]);
        assert!(matches!(
            result,
            Err(GraphError::EdgeOutOfRange {
                source_node: 1,
                target_node: 2,
                vertex_count: 2
            })
        ));
    }

    #[test]
    fn degree_sequence_of_path() {
        let graph = path_graph();
        assert_eq!(graph.degree_sequence(), vec![1, 2, 1]);
        assert!((graph.mean_degree() - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn self_loops_and_parallel_edges_count() {
        let graph = Graph::new(2, vec![Edge(0, 0), Edge(0, 1), Edge(0, 1)]).unwrap();
        assert_eq!(graph.degree_sequence(), vec![4, 2]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn empty_graph_has_zero_mean_degree() {
        let graph = Graph::new(0, Vec::new()).unwrap();
        assert!(graph.mean_degree().abs() < f64::EPSILON);
    }

    #[test]
    fn name_if_missing_keeps_existing_name() {
        let mut graph = path_graph().with_name("path");
        assert!(!graph.name_if_missing("other"));
        assert_eq!(graph.name(), Some("path"));

        let mut unnamed = path_graph();
        assert!(unnamed.name_if_missing("fallback"));
        assert_eq!(unnamed.name(), Some("fallback"));
    }

    #[test]
    fn summary_mentions_counts() {
        let summary = path_graph().with_name("p3").summary();
        assert!(summary.contains("p3"));
        assert!(summary.contains("3 vertices"));
        assert!(summary.contains("2 edges"));
    }
}
