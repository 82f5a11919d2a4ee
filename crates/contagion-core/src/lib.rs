//! Rule model, topology cache, update engine, and measurement for the
//! Contagion simulation.
//!
//! This crate owns the discrete-time step that drives a compartmental
//! simulation over a static graph: every rule reads the current snapshot,
//! firing nodes are written into the next one, and the measurement sink
//! samples the snapshot at every time point.
//!
//! # Modules
//!
//! - [`domain`] -- Attribute domains (legal values per attribute).
//! - [`rule`] -- [`RuleSpec`] and the validated [`TransitionRule`].
//! - [`compartment`] -- Domains plus the ordered rule list.
//! - [`snapshot`] -- Per-node attribute values.
//! - [`topology`] -- Sparse adjacency built once from the edge list.
//! - [`initializer`] -- Categorical sampling of the initial snapshot.
//! - [`clock`] -- Step counter with checked arithmetic.
//! - [`step`] -- The [`UpdateEngine`] and one synchronous step.
//! - [`measure`] -- Aggregate and detailed measurement sinks.
//! - [`runner`] -- The `T`-step loop with per-step callbacks.
//! - [`setup`] -- From configuration and graph to a ready engine.
//! - [`config`] -- Run and epidemic configuration loading from YAML.
//! - [`report`] -- The initial-conditions report.
//! - [`error`] -- Configuration, validation, and engine errors.
//!
//! [`RuleSpec`]: rule::RuleSpec
//! [`TransitionRule`]: rule::TransitionRule
//! [`UpdateEngine`]: step::UpdateEngine

pub mod clock;
pub mod compartment;
pub mod config;
pub mod domain;
pub mod error;
pub mod initializer;
pub mod measure;
pub mod report;
pub mod rule;
pub mod runner;
pub mod setup;
pub mod snapshot;
pub mod step;
pub mod topology;

pub use compartment::Compartment;
pub use error::{ConfigurationError, CoreError, EngineError, ValidationError};
pub use measure::Measurement;
pub use runner::{LoggingCallback, NoOpCallback, SimulationResult, StepCallback, run_simulation};
pub use setup::{SimulationSetup, initialize_simulation};
pub use step::{StepSummary, UpdateEngine};
