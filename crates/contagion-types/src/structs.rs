//! Core data structs exchanged between the graph loader, the simulation
//! core, and the persistence layer.
//!
//! Node identity is a plain 0-based `usize` index everywhere: the graph
//! loader hands the core a vertex count and index pairs, and the
//! measurement tables report nodes by the same index.

use serde::{Deserialize, Serialize};

use crate::enums::MeasurementMode;

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// An undirected (or, on request, directed) edge between two node indices.
///
/// Serializes as a two-element array `[source, target]` so graph files
/// stay compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    /// The source endpoint.
    pub const fn source(self) -> usize {
        self.0
    }

    /// The target endpoint.
    pub const fn target(self) -> usize {
        self.1
    }

    /// Whether both endpoints are the same node.
    pub const fn is_self_loop(self) -> bool {
        self.0 == self.1
    }
}

impl From<(usize, usize)> for Edge {
    fn from((source, target): (usize, usize)) -> Self {
        Self(source, target)
    }
}

// ---------------------------------------------------------------------------
// Measurement rows
// ---------------------------------------------------------------------------

/// One aggregate sample: how many nodes held `value` at `time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// The attribute value being counted.
    pub value: String,
    /// Number of nodes holding the value.
    pub count: u64,
    /// Simulation time of the sample.
    pub time: u64,
}

/// One detailed sample: the value held by a single node at `time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedRow {
    /// Index of the node.
    pub node: usize,
    /// The attribute value the node held.
    pub value: String,
    /// Simulation time of the sample.
    pub time: u64,
}

// ---------------------------------------------------------------------------
// Measurement table
// ---------------------------------------------------------------------------

/// The concatenated, time-ordered result of a simulation run.
///
/// Rows appear in recording order: every row for time `t` precedes every
/// row for time `t + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum MeasurementTable {
    /// Per-value counts.
    Aggregate {
        /// Name of the measured attribute.
        attribute: String,
        /// Rows in `(value, count, time)` form.
        rows: Vec<AggregateRow>,
    },
    /// Per-node values.
    Detailed {
        /// Name of the measured attribute.
        attribute: String,
        /// Rows in `(node, value, time)` form.
        rows: Vec<DetailedRow>,
    },
}

impl MeasurementTable {
    /// The mode this table was produced by.
    pub const fn mode(&self) -> MeasurementMode {
        match self {
            Self::Aggregate { .. } => MeasurementMode::Aggregate,
            Self::Detailed { .. } => MeasurementMode::Detailed,
        }
    }

    /// Name of the measured attribute.
    pub fn attribute(&self) -> &str {
        match self {
            Self::Aggregate { attribute, .. } | Self::Detailed { attribute, .. } => attribute,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Aggregate { rows, .. } => rows.len(),
            Self::Detailed { rows, .. } => rows.len(),
        }
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct time tags in recording order.
    pub fn times(&self) -> Vec<u64> {
        let mut times: Vec<u64> = Vec::new();
        let mut push = |time: u64| {
            if times.last() != Some(&time) {
                times.push(time);
            }
        };
        match self {
            Self::Aggregate { rows, .. } => rows.iter().for_each(|row| push(row.time)),
            Self::Detailed { rows, .. } => rows.iter().for_each(|row| push(row.time)),
        }
        times
    }

    /// Number of nodes holding `value` at `time`.
    ///
    /// Works for both modes. Returns 0 when no node held the value.
    pub fn count_at(&self, time: u64, value: &str) -> u64 {
        match self {
            Self::Aggregate { rows, .. } => rows
                .iter()
                .filter(|row| row.time == time && row.value == value)
                .map(|row| row.count)
                .sum(),
            Self::Detailed { rows, .. } => rows
                .iter()
                .filter(|row| row.time == time && row.value == value)
                .fold(0_u64, |acc, _| acc.saturating_add(1)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn aggregate(rows: &[(&str, u64, u64)]) -> MeasurementTable {
        MeasurementTable::Aggregate {
            attribute: "compartment".to_owned(),
            rows: rows
                .iter()
                .map(|&(value, count, time)| AggregateRow {
                    value: value.to_owned(),
                    count,
                    time,
                })
                .collect(),
        }
    }

    #[test]
    fn edge_serializes_as_pair() {
        let json = serde_json::to_string(&Edge(3, 7)).unwrap();
        assert_eq!(json, "[3,7]");
        let back: Edge = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(back, Edge(1, 2));
    }

    #[test]
    fn self_loop_detected() {
        assert!(Edge(4, 4).is_self_loop());
        assert!(!Edge::from((4, 5)).is_self_loop());
    }

    #[test]
    fn aggregate_counts_and_times() {
        let table = aggregate(&[("S", 9, 0), ("I", 1, 0), ("S", 7, 1), ("I", 3, 1)]);
        assert_eq!(table.mode(), MeasurementMode::Aggregate);
        assert_eq!(table.len(), 4);
        assert_eq!(table.times(), vec![0, 1]);
        assert_eq!(table.count_at(1, "I"), 3);
        assert_eq!(table.count_at(1, "R"), 0);
    }

    #[test]
    fn detailed_counts_nodes() {
        let table = MeasurementTable::Detailed {
            attribute: "compartment".to_owned(),
            rows: vec![
                DetailedRow { node: 0, value: "S".to_owned(), time: 0 },
                DetailedRow { node: 1, value: "I".to_owned(), time: 0 },
                DetailedRow { node: 2, value: "S".to_owned(), time: 0 },
            ],
        };
        assert_eq!(table.count_at(0, "S"), 2);
        assert_eq!(table.attribute(), "compartment");
        assert!(!table.is_empty());
    }

    #[test]
    fn table_serializes_with_mode_tag() {
        let table = aggregate(&[("S", 1, 0)]);
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["mode"], "aggregate");
        assert_eq!(value["rows"][0]["count"], 1);
    }
}
