//! Configuration loading and typed config structures for a Contagion run.
//!
//! A run is described by two YAML files:
//!
//! - the **run config** ([`RunConfig`]) points at the other inputs and
//!   outputs;
//! - the **epidemic config** ([`EpidemicConfig`]) declares attributes,
//!   rules, initial conditions, and experiment settings.
//!
//! ```yaml
//! # run.yaml
//! epidemics_path: demos/sir.yaml
//! graph_path: demos/ring.yaml
//! report_path: ./report.dat
//! output_path: ./output_experiment.csv
//! ```
//!
//! ```yaml
//! # sir.yaml
//! attributes:
//!   compartment: [S, I, R]
//! dynamics:
//!   - name: infection
//!     attribute: compartment
//!     initial_state: S
//!     triggering_state: I
//!     final_state: I
//!     prob: 0.3
//!     mode: neighbor
//! initial_conditions:
//!   compartment: { S: 0.95, I: 0.05 }
//! experiment:
//!   time_steps: 50
//!   measurement_mode: aggregate
//! ```
//!
//! Relative paths are used as given, i.e. relative to the working
//! directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::initializer::InitialConditions;
use crate::rule::RuleSpec;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A referenced file does not exist.
    #[error("{what} file {} does not exist", .path.display())]
    MissingFile {
        /// What the file is (e.g. `Graph`).
        what: String,
        /// The missing path.
        path: PathBuf,
    },

    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Fail with [`ConfigError::MissingFile`] unless `path` exists.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] naming `what`.
pub fn check_file_exists(path: &Path, what: &str) -> Result<(), ConfigError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConfigError::MissingFile {
            what: what.to_owned(),
            path: path.to_path_buf(),
        })
    }
}

/// Read a YAML file into `T` after checking that it exists.
fn read_yaml<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, ConfigError> {
    check_file_exists(path, what)?;
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yml::from_str(&contents)?)
}

/// Where a run reads its inputs and writes its outputs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Epidemic configuration file.
    pub epidemics_path: PathBuf,

    /// Graph file (`.json`, `.yaml` or `.yml`).
    pub graph_path: PathBuf,

    /// Where the initial-conditions report is written.
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Where the measurement table is written (`.csv` or `.json`).
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

impl RunConfig {
    /// Load a run configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if the file does not exist,
    /// [`ConfigError::Io`] if it cannot be read, or [`ConfigError::Yaml`]
    /// if the content is not a valid run configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        read_yaml(path, "Configuration")
    }

    /// Parse a run configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Check that both input files exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] for the first missing input.
    pub fn check_inputs(&self) -> Result<(), ConfigError> {
        check_file_exists(&self.epidemics_path, "Epidemics configuration")?;
        check_file_exists(&self.graph_path, "Graph")
    }
}

/// Attribute declarations, rules, initial conditions, and experiment
/// settings for one epidemic model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EpidemicConfig {
    /// Attribute name → ordered legal values.
    pub attributes: BTreeMap<String, Vec<String>>,

    /// Transition rules in application order.
    #[serde(default)]
    pub dynamics: Vec<RuleSpec>,

    /// Attribute → value → initial probability.
    pub initial_conditions: InitialConditions,

    /// Step count, measurement, and RNG settings.
    pub experiment: ExperimentConfig,
}

impl EpidemicConfig {
    /// Load an epidemic configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if the file does not exist,
    /// [`ConfigError::Io`] if it cannot be read, or [`ConfigError::Yaml`]
    /// if the content is not a valid epidemic configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        read_yaml(path, "Epidemics configuration")
    }

    /// Parse an epidemic configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Experiment settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExperimentConfig {
    /// Number of steps `T`; the run records `T + 1` samples.
    pub time_steps: u64,

    /// `"aggregate"` or `"detailed"`.
    #[serde(default = "default_measurement_mode")]
    pub measurement_mode: String,

    /// Attribute the measurement sink samples.
    #[serde(default = "default_measured_attribute")]
    pub measured_attribute: String,

    /// Seed for the run's random number generator.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Keep edge direction instead of symmetrizing the adjacency.
    #[serde(default)]
    pub directed: bool,
}

fn default_report_path() -> PathBuf {
    PathBuf::from("./report.dat")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("./output_experiment.csv")
}

fn default_measurement_mode() -> String {
    "aggregate".to_owned()
}

fn default_measured_attribute() -> String {
    "compartment".to_owned()
}

const fn default_seed() -> u64 {
    42
}
