//! Error types for the `contagion-graph` crate.
//!
//! All fallible operations in this crate return [`GraphError`] through the
//! standard [`Result`] type alias.

use std::path::PathBuf;

/// Errors that can occur while building, loading, saving, or generating graphs.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// An edge references a node index outside `0..vertex_count`.
    #[error("edge ({source_node}, {target_node}) out of range for {vertex_count} vertices")]
    EdgeOutOfRange {
        /// Source endpoint of the offending edge.
        source_node: usize,
        /// Target endpoint of the offending edge.
        target_node: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },

    /// The graph file does not exist.
    #[error("graph file {} does not exist", .path.display())]
    MissingFile {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The graph file extension is not one of the supported formats.
    #[error("unsupported graph format {extension:?}; expected one of: {}", .supported.join(", "))]
    UnsupportedFormat {
        /// The extension found on the path (empty if none).
        extension: String,
        /// Extensions this crate can read and write.
        supported: Vec<String>,
    },

    /// Failed to read or write the graph file.
    #[error("graph file I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse or serialize JSON graph content.
    #[error("invalid JSON graph: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Failed to parse or serialize YAML graph content.
    #[error("invalid YAML graph: {source}")]
    Yaml {
        /// The underlying YAML error.
        #[from]
        source: serde_yml::Error,
    },

    /// A generator function string could not be parsed.
    #[error("invalid generator string {input:?}: {reason}")]
    InvalidFunctionString {
        /// The string as given by the caller.
        input: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No generator is registered under the requested name.
    #[error("unknown generator {name:?}; available: {}", .available.join(", "))]
    UnknownGenerator {
        /// The requested generator name.
        name: String,
        /// Names of all registered generators.
        available: Vec<String>,
    },

    /// A generator received arguments it cannot use.
    #[error("invalid arguments for generator {name}: {reason}")]
    InvalidArguments {
        /// The generator name.
        name: String,
        /// What is wrong with the arguments.
        reason: String,
    },
}
