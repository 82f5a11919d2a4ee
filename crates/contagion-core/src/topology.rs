//! The topology cache: a frozen sparse adjacency structure.
//!
//! The edge list is converted once into compressed sparse row form. Row
//! `u` lists every `v` with an entry `(u, v)`, repeated once per
//! occurrence, so multi-edges keep their multiplicity. In symmetric mode
//! each edge contributes both `(u, v)` and `(v, u)`; a self-loop therefore
//! counts twice toward its own node.
//!
//! The only query the engine needs is a neighbor tally: for each node, how
//! many of its row entries fall in a given node set. That is a sparse
//! matrix-vector product against a 0/1 indicator.

use contagion_types::Edge;
use tracing::debug;

use crate::error::ConfigurationError;

/// Immutable V×V binary adjacency in compressed sparse row form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    vertex_count: usize,
    symmetric: bool,
    /// `row_offsets[u]..row_offsets[u + 1]` indexes row `u` in `columns`.
    row_offsets: Vec<usize>,
    columns: Vec<usize>,
}

impl Adjacency {
    /// Build the adjacency structure for `vertex_count` nodes.
    ///
    /// With `symmetric = false` an edge `(u, v)` only adds `v` to row `u`:
    /// node `u` then counts `v` among the neighbors that can trigger it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EdgeOutOfRange`] if any endpoint is
    /// not below `vertex_count`.
    pub fn build(
        vertex_count: usize,
        edges: &[Edge],
        symmetric: bool,
    ) -> Result<Self, ConfigurationError> {
        if let Some(edge) = edges
            .iter()
            .find(|e| e.source() >= vertex_count || e.target() >= vertex_count)
        {
            return Err(ConfigurationError::EdgeOutOfRange {
                source_node: edge.source(),
                target_node: edge.target(),
                vertex_count,
            });
        }

        let mut entries: Vec<(usize, usize)> =
            edges.iter().map(|e| (e.source(), e.target())).collect();
        if symmetric {
            entries.extend(edges.iter().map(|e| (e.target(), e.source())));
        }
        entries.sort_unstable();

        let mut row_offsets = vec![0_usize; vertex_count.saturating_add(1)];
        for &(row, _) in &entries {
            if let Some(slot) = row_offsets.get_mut(row.saturating_add(1)) {
                *slot = slot.saturating_add(1);
            }
        }
        for i in 1..row_offsets.len() {
            let previous = row_offsets.get(i.saturating_sub(1)).copied().unwrap_or(0);
            if let Some(slot) = row_offsets.get_mut(i) {
                *slot = slot.saturating_add(previous);
            }
        }
        let columns: Vec<usize> = entries.into_iter().map(|(_, column)| column).collect();

        debug!(
            vertices = vertex_count,
            edges = edges.len(),
            entries = columns.len(),
            symmetric,
            "Adjacency built"
        );

        Ok(Self {
            vertex_count,
            symmetric,
            row_offsets,
            columns,
        })
    }

    /// Number of vertices (rows and columns).
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Whether every edge was entered in both directions.
    pub const fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Number of stored entries, counting multiplicity.
    pub fn entry_count(&self) -> usize {
        self.columns.len()
    }

    /// Row `node`: its neighbors, with repeats for multi-edges.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        let start = self.row_offsets.get(node).copied().unwrap_or(0);
        let end = self
            .row_offsets
            .get(node.saturating_add(1))
            .copied()
            .unwrap_or(start);
        self.columns.get(start..end).unwrap_or_default()
    }

    /// Row sums: the degree of every node, counting multiplicity.
    pub fn degrees(&self) -> Vec<usize> {
        (0..self.vertex_count)
            .map(|node| self.neighbors(node).len())
            .collect()
    }

    /// For every node, the number of row entries whose column is marked in
    /// `indicator`. Unmarked or missing indicator entries count as 0.
    pub fn neighbor_counts(&self, indicator: &[bool]) -> Vec<u32> {
        (0..self.vertex_count)
            .map(|node| {
                self.neighbors(node)
                    .iter()
                    .filter(|&&column| indicator.get(column).copied().unwrap_or(false))
                    .fold(0_u32, |acc, _| acc.saturating_add(1))
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn path3() -> Vec<Edge> {
        vec![Edge(0, 1), Edge(1, 2)]
    }

    #[test]
    fn symmetric_path_graph() {
        let adjacency = Adjacency::build(3, &path3(), true).unwrap();
        assert!(adjacency.is_symmetric());
        assert_eq!(adjacency.neighbors(0), &[1]);
        assert_eq!(adjacency.neighbors(1), &[0, 2]);
        assert_eq!(adjacency.neighbors(2), &[1]);
        assert_eq!(adjacency.degrees(), vec![1, 2, 1]);
        assert_eq!(adjacency.entry_count(), 4);
    }

    #[test]
    fn directed_keeps_one_direction() {
        let adjacency = Adjacency::build(3, &path3(), false).unwrap();
        assert_eq!(adjacency.neighbors(0), &[1]);
        assert_eq!(adjacency.neighbors(1), &[2]);
        assert!(adjacency.neighbors(2).is_empty());
    }

    #[test]
    fn multi_edges_and_self_loops_accumulate() {
        let edges = vec![Edge(0, 1), Edge(0, 1), Edge(2, 2)];
        let adjacency = Adjacency::build(3, &edges, true).unwrap();
        assert_eq!(adjacency.neighbor_counts(&[false, true, false]), vec![2, 0, 0]);
        assert_eq!(adjacency.neighbor_counts(&[true, false, false]), vec![0, 2, 0]);
        assert_eq!(adjacency.neighbor_counts(&[false, false, true]), vec![0, 0, 2]);
    }

    #[test]
    fn neighbor_counts_is_matrix_vector_product() {
        let adjacency = Adjacency::build(3, &path3(), true).unwrap();
        assert_eq!(adjacency.neighbor_counts(&[false, true, false]), vec![1, 0, 1]);
        assert_eq!(adjacency.neighbor_counts(&[true, false, true]), vec![0, 2, 0]);
        assert_eq!(adjacency.neighbor_counts(&[]), vec![0, 0, 0]);
    }

    #[test]
    fn isolated_and_empty_graphs() {
        let adjacency = Adjacency::build(4, &[], true).unwrap();
        assert_eq!(adjacency.degrees(), vec![0; 4]);
        assert!(adjacency.neighbors(10).is_empty());

        let empty = Adjacency::build(0, &[], true).unwrap();
        assert!(empty.neighbor_counts(&[]).is_empty());
    }

    #[test]
    fn out_of_range_edge_rejected() {
        assert!(matches!(
            Adjacency::build(2, &[Edge(0, 2)], true),
            Err(ConfigurationError::EdgeOutOfRange { target_node: 2, .. })
        ));
    }
}
