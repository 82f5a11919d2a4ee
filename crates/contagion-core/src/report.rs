//! The initial-conditions report written before a run starts.
//!
//! The report records what the run starts from: the graph's size and mean
//! degree, how many nodes hold each value of every attribute, and the
//! ordered rule summary. It is stamped with a run id and a UTC timestamp.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use contagion_types::RunId;
use serde::Serialize;

use crate::compartment::Compartment;
use crate::snapshot::GraphSnapshot;
use crate::topology::Adjacency;

/// Size and degree statistics of the simulated graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    /// Graph name, if the graph carries one.
    pub name: Option<String>,
    /// Number of vertices.
    pub vertex_count: usize,
    /// Number of edges in the input edge list.
    pub edge_count: usize,
    /// Mean total degree. Directed graphs count in- plus out-degree.
    pub mean_degree: f64,
}

impl GraphSummary {
    /// Summarize a graph from its frozen adjacency structure.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_adjacency(name: Option<&str>, edge_count: usize, adjacency: &Adjacency) -> Self {
        let vertex_count = adjacency.vertex_count();
        // A symmetric structure already stores both endpoints of every edge.
        let endpoints = if adjacency.is_symmetric() {
            adjacency.entry_count()
        } else {
            adjacency.entry_count().saturating_mul(2)
        };
        let mean_degree = if vertex_count == 0 {
            0.0
        } else {
            endpoints as f64 / vertex_count as f64
        };
        Self {
            name: name.map(str::to_owned),
            vertex_count,
            edge_count,
            mean_degree,
        }
    }
}

/// Everything written to the report file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialReport {
    /// Identifier of the run.
    pub run_id: RunId,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// The simulated graph.
    pub graph: GraphSummary,
    /// Attribute → `(value, count)` in domain order.
    pub initial_counts: BTreeMap<String, Vec<(String, usize)>>,
    /// The compartment's rule summary.
    pub compartment: String,
}

impl InitialReport {
    /// Build the report for a run about to start from `snapshot`.
    pub fn new(
        run_id: RunId,
        graph: GraphSummary,
        snapshot: &GraphSnapshot,
        compartment: &Compartment,
    ) -> Self {
        let initial_counts = snapshot
            .domain()
            .iter()
            .filter_map(|(attribute, _)| {
                snapshot.counts(attribute).map(|counts| {
                    let owned = counts
                        .into_iter()
                        .map(|(value, count)| (value.to_owned(), count))
                        .collect();
                    (attribute.to_owned(), owned)
                })
            })
            .collect();
        Self {
            run_id,
            generated_at: Utc::now(),
            graph,
            initial_counts,
            compartment: compartment.describe(),
        }
    }
}

impl core::fmt::Display for InitialReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Run: {}", self.run_id)?;
        writeln!(f, "Generated: {}", self.generated_at.to_rfc3339())?;
        writeln!(f)?;

        writeln!(f, "Graph Summary:")?;
        writeln!(f, "Graph name: {}", self.graph.name.as_deref().unwrap_or("-"))?;
        writeln!(
            f,
            "Vertices: {}, Edges: {}",
            self.graph.vertex_count, self.graph.edge_count
        )?;
        writeln!(f, "Mean degree: {:.2}", self.graph.mean_degree)?;
        writeln!(f)?;

        writeln!(f, "Compartment initial conditions:")?;
        for (attribute, counts) in &self.initial_counts {
            let listed: Vec<String> = counts
                .iter()
                .map(|(value, count)| format!("{value}={count}"))
                .collect();
            writeln!(f, "{attribute}: {}", listed.join(", "))?;
        }
        writeln!(f)?;

        writeln!(f, "Compartment Information:")?;
        writeln!(f, "{}", self.compartment)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use contagion_types::Edge;
    use uuid::Uuid;

    use super::*;
    use crate::rule::RuleSpec;

    fn fixture() -> (GraphSnapshot, Compartment, Adjacency) {
        let mut compartment = Compartment::new();
        let values = vec!["S".to_owned(), "I".to_owned(), "R".to_owned()];
        compartment.declare_attribute_domain("compartment", &values).unwrap();
        compartment
            .add_rule(&RuleSpec {
                name: "recovery".to_owned(),
                attribute: "compartment".to_owned(),
                initial_state: "I".to_owned(),
                triggering_state: None,
                final_state: "R".to_owned(),
                prob: 0.1,
                mode: "rate".to_owned(),
            })
            .unwrap();
        let names = BTreeMap::from([(
            "compartment".to_owned(),
            vec!["S".to_owned(), "I".to_owned(), "S".to_owned()],
        )]);
        let snapshot =
            GraphSnapshot::from_names(Arc::new(compartment.domain().clone()), 3, &names).unwrap();
        let adjacency = Adjacency::build(3, &[Edge(0, 1), Edge(1, 2)], true).unwrap();
        (snapshot, compartment, adjacency)
    }

    #[test]
    fn mean_degree_counts_both_directions() {
        let (_, _, adjacency) = fixture();
        let summary = GraphSummary::from_adjacency(Some("path"), 2, &adjacency);
        assert!((summary.mean_degree - 4.0 / 3.0).abs() < 1e-12);
        let empty = Adjacency::build(0, &[], true).unwrap();
        assert!(GraphSummary::from_adjacency(None, 0, &empty).mean_degree.abs() < f64::EPSILON);
    }

    #[test]
    fn directed_mean_degree_counts_in_and_out() {
        let edges = [Edge(0, 1), Edge(1, 2)];
        let directed = Adjacency::build(3, &edges, false).unwrap();
        let symmetric = Adjacency::build(3, &edges, true).unwrap();
        let directed_mean = GraphSummary::from_adjacency(None, 2, &directed).mean_degree;
        let symmetric_mean = GraphSummary::from_adjacency(None, 2, &symmetric).mean_degree;
        assert!((directed_mean - 4.0 / 3.0).abs() < 1e-12);
        assert!((directed_mean - symmetric_mean).abs() < 1e-12);
    }

    #[test]
    fn report_lists_counts_and_rules() {
        let (snapshot, compartment, adjacency) = fixture();
        let graph = GraphSummary::from_adjacency(Some("path"), 2, &adjacency);
        let report = InitialReport::new(RunId::from(Uuid::nil()), graph, &snapshot, &compartment);

        assert_eq!(
            report.initial_counts.get("compartment").unwrap(),
            &vec![("S".to_owned(), 2), ("I".to_owned(), 1), ("R".to_owned(), 0)]
        );

        let text = report.to_string();
        assert!(text.starts_with("Run: 00000000-0000-0000-0000-000000000000\n"));
        assert!(text.contains("Graph name: path\n"));
        assert!(text.contains("Vertices: 3, Edges: 2\n"));
        assert!(text.contains("Mean degree: 1.33\n"));
        assert!(text.contains("compartment: S=2, I=1, R=0\n"));
        assert!(text.ends_with("SUMMARY\n- recovery:\n(I) -> (R) p = 0.1\n"));
    }

    #[test]
    fn report_serializes_to_json() {
        let (snapshot, compartment, adjacency) = fixture();
        let graph = GraphSummary::from_adjacency(None, 2, &adjacency);
        let report = InitialReport::new(RunId::new(), graph, &snapshot, &compartment);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["graph"]["vertex_count"], 3);
        assert!(value["graph"]["name"].is_null());
    }
}
