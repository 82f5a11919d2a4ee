//! Error types for the engine binary.
//!
//! [`AppError`] is the top-level error type that wraps every failure mode
//! from configuration loading through result persistence.

use std::path::PathBuf;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: contagion_core::config::ConfigError,
    },

    /// Graph loading, saving, or generation failed.
    #[error("graph error: {source}")]
    Graph {
        /// The underlying graph error.
        #[from]
        source: contagion_graph::GraphError,
    },

    /// Simulation setup or execution failed.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying core error.
        #[from]
        source: contagion_core::CoreError,
    },

    /// Writing the report or result file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Serializing the result table as JSON failed.
    #[error("failed to encode results as JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
