//! Shared type definitions for the Contagion simulation.
//!
//! This crate is the single source of truth for the data exchanged between
//! the graph loader, the simulation core, and the persistence layer.
//!
//! # Modules
//!
//! - [`enums`] -- Enumeration types (measurement modes)
//! - [`ids`] -- Run identifier
//! - [`structs`] -- Edges, measurement rows, and the result table

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::MeasurementMode;
pub use ids::RunId;
pub use structs::{AggregateRow, DetailedRow, Edge, MeasurementTable};
