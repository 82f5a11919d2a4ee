//! Reading and writing graph files.
//!
//! Two formats are supported, selected by file extension:
//!
//! | Extension        | Format |
//! |------------------|--------|
//! | `.json`          | JSON   |
//! | `.yaml`, `.yml`  | YAML   |
//!
//! Both hold the same document:
//!
//! ```yaml
//! name: karate
//! vertex_count: 3
//! edges:
//!   - [0, 1]
//!   - [1, 2]
//! ```
//!
//! A file without a `name` is named after its base file name.

use std::path::Path;

use tracing::{info, warn};

use crate::error::GraphError;
use crate::graph::Graph;

/// On-disk graph format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl GraphFormat {
    /// Extensions accepted by [`GraphFormat::from_path`].
    pub const EXTENSIONS: [&'static str; 3] = ["json", "yaml", "yml"];

    /// Pick the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(GraphError::UnsupportedFormat {
                extension,
                supported: Self::EXTENSIONS.iter().map(|&e| e.to_owned()).collect(),
            }),
        }
    }
}

/// Load and validate a graph file.
///
/// # Errors
///
/// Returns [`GraphError::MissingFile`] if the path does not exist,
/// [`GraphError::UnsupportedFormat`] for unknown extensions, a parse error
/// for malformed content, or [`GraphError::EdgeOutOfRange`] if an edge
/// references a missing node.
pub fn load_graph(path: &Path) -> Result<Graph, GraphError> {
    if !path.exists() {
        return Err(GraphError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    let format = GraphFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path)?;
    let mut graph = parse_graph(&contents, format)?;

    let fallback = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if graph.name_if_missing(fallback.clone()) {
        warn!(name = fallback, "graph has no name attribute, using file name");
    }

    info!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Graph loaded"
    );
    Ok(graph)
}

/// Parse graph content in the given format and validate it.
///
/// # Errors
///
/// Returns a parse error or [`GraphError::EdgeOutOfRange`].
pub fn parse_graph(contents: &str, format: GraphFormat) -> Result<Graph, GraphError> {
    let graph: Graph = match format {
        GraphFormat::Json => serde_json::from_str(contents)?,
        GraphFormat::Yaml => serde_yml::from_str(contents)?,
    };
    graph.validate()?;
    Ok(graph)
}

/// Write a graph file in the format chosen by the path's extension.
///
/// # Errors
///
/// Returns [`GraphError::UnsupportedFormat`], a serialization error, or an
/// I/O error.
pub fn save_graph(graph: &Graph, path: &Path) -> Result<(), GraphError> {
    let contents = match GraphFormat::from_path(path)? {
        GraphFormat::Json => serde_json::to_string_pretty(graph)?,
        GraphFormat::Yaml => serde_yml::to_string(graph)?,
    };
    std::fs::write(path, contents)?;
    info!(path = %path.display(), "Graph saved");
    Ok(())
}
