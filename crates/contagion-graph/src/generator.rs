//! Random-graph generators resolved through an explicit registry.
//!
//! Generators are looked up by name in a [`GeneratorRegistry`] built once
//! at startup. A generator call is usually written as a function string,
//! e.g. `ER(20, 0.1)`, which [`parse_function_string`] splits into a name
//! and numeric arguments.
//!
//! # Built-in generators
//!
//! | Name | Arguments | Model                                   |
//! |------|-----------|-----------------------------------------|
//! | `ER` | `n, p`    | Erdős–Rényi G(n, p), no self-loops      |

use std::collections::BTreeMap;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use contagion_types::Edge;

use crate::error::GraphError;
use crate::graph::Graph;

/// Signature every generator implements: numeric arguments plus the run's
/// RNG in, graph out.
pub type GeneratorFn = fn(&[f64], &mut StdRng) -> Result<Graph, GraphError>;

/// A parsed generator invocation such as `ER(20, 0.1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorCall {
    /// Generator name (`ER`).
    pub name: String,
    /// Numeric arguments in call order.
    pub arguments: Vec<f64>,
}

/// Name-to-generator mapping.
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<String, GeneratorFn>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            generators: BTreeMap::new(),
        }
    }

    /// Create a registry holding every built-in generator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("ER", erdos_renyi);
        registry
    }

    /// Register (or replace) a generator under `name`.
    pub fn register(&mut self, name: impl Into<String>, generator: GeneratorFn) {
        self.generators.insert(name.into(), generator);
    }

    /// Registered generator names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.generators.keys().cloned().collect()
    }

    /// Look up a generator by name.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownGenerator`] listing the available names.
    pub fn get(&self, name: &str) -> Result<GeneratorFn, GraphError> {
        self.generators
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownGenerator {
                name: name.to_owned(),
                available: self.names(),
            })
    }

    /// Run a parsed generator call.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownGenerator`] or whatever the generator
    /// reports for bad arguments.
    pub fn generate(&self, call: &GeneratorCall, rng: &mut StdRng) -> Result<Graph, GraphError> {
        let generator = self.get(&call.name)?;
        debug!(name = call.name, arguments = ?call.arguments, "Generating graph");
        generator(&call.arguments, rng)
    }
}

/// Parse a function string like `ER(20, 0.1)` into a [`GeneratorCall`].
///
/// The name must start with a letter or underscore followed by letters,
/// digits or underscores. Arguments are comma-separated numbers; empty
/// arguments are skipped, so `F()` and `F(1,)` are accepted.
///
/// # Errors
///
/// Returns [`GraphError::InvalidFunctionString`] if the shape or any
/// argument is malformed.
pub fn parse_function_string(input: &str) -> Result<GeneratorCall, GraphError> {
    let invalid = |reason: &str| GraphError::InvalidFunctionString {
        input: input.to_owned(),
        reason: reason.to_owned(),
    };

    let trimmed = input.trim();
    let (name, rest) = trimmed
        .split_once('(')
        .ok_or_else(|| invalid("expected NAME(ARGS)"))?;
    let args = rest
        .strip_suffix(')')
        .ok_or_else(|| invalid("missing closing parenthesis"))?;

    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("generator name must be an identifier"));
    }

    let arguments = args
        .split(',')
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(|arg| {
            arg.parse::<f64>()
                .map_err(|_err| invalid(&format!("argument {arg:?} is not a number")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GeneratorCall {
        name: name.to_owned(),
        arguments,
    })
}

/// Erdős–Rényi G(n, p): every unordered pair of distinct nodes is joined
/// independently with probability `p`.
fn erdos_renyi(arguments: &[f64], rng: &mut StdRng) -> Result<Graph, GraphError> {
    let invalid = |reason: String| GraphError::InvalidArguments {
        name: "ER".to_owned(),
        reason,
    };

    let [n, p] = arguments else {
        return Err(invalid(format!(
            "expected 2 arguments (n, p), got {}",
            arguments.len()
        )));
    };
    let n = node_count(*n).ok_or_else(|| invalid(format!("n = {n} is not a node count")))?;
    if !(0.0..=1.0).contains(p) {
        return Err(invalid(format!("p = {p} is outside [0, 1]")));
    }

    let mut edges = Vec::new();
    for source in 0..n {
        for target in source.saturating_add(1)..n {
            if rng.random_bool(*p) {
                edges.push(Edge(source, target));
            }
        }
    }
    Graph::new(n, edges).map(|g| g.with_name(format!("ER({n}, {p})")))
}

/// Convert a numeric argument into a node count, rejecting negative,
/// fractional, and non-finite values.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
fn node_count(value: f64) -> Option<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > 1e9 {
        return None;
    }
    Some(value as usize)
}
