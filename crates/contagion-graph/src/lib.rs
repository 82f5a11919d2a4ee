//! Graphs, graph files, and random-graph generators for the Contagion
//! simulation.
//!
//! This crate sits outside the simulation core: it produces the frozen
//! vertex count and edge list the core consumes, and nothing more. Node
//! attributes live in the core's snapshots, never here.
//!
//! # Modules
//!
//! - [`error`] -- Error types for graph operations.
//! - [`generator`] -- [`GeneratorRegistry`] mapping generator names such as
//!   `ER` to implementations, plus function-string parsing.
//! - [`graph`] -- The immutable [`Graph`] value with degree queries.
//! - [`loader`] -- JSON/YAML graph file reading and writing.

pub mod error;
pub mod generator;
pub mod graph;
pub mod loader;

// Re-export primary types at crate root.
pub use error::GraphError;
pub use generator::{GeneratorCall, GeneratorFn, GeneratorRegistry, parse_function_string};
pub use graph::Graph;
pub use loader::{GraphFormat, load_graph, parse_graph, save_graph};
