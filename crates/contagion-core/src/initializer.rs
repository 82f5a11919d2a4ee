//! The state initializer: categorical sampling of initial node values.
//!
//! Initial conditions map each attribute to a probability per value.
//! Every node draws its value independently. Inputs are checked against
//! the attribute domain before any draw, and nothing defaults silently:
//! a declared attribute without initial conditions is an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use tracing::debug;

use crate::domain::AttributeDomain;
use crate::error::ConfigurationError;
use crate::snapshot::GraphSnapshot;

/// Attribute → value → probability.
pub type InitialConditions = BTreeMap<String, BTreeMap<String, f64>>;

/// Largest accepted distance between a probability sum and 1.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

/// Check one attribute's value probabilities and return them as weights in
/// domain order (values without a probability get weight 0).
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownAttribute`],
/// [`ConfigurationError::UnknownValue`],
/// [`ConfigurationError::InvalidInitialProbability`] or
/// [`ConfigurationError::ProbabilitySum`].
pub fn value_weights(
    domain: &AttributeDomain,
    attribute: &str,
    probabilities: &BTreeMap<String, f64>,
) -> Result<Vec<f64>, ConfigurationError> {
    let legal = domain.require_attribute(attribute)?;
    for (value, &probability) in probabilities {
        domain.require_value(attribute, value)?;
        if !probability.is_finite() || probability < 0.0 {
            return Err(ConfigurationError::InvalidInitialProbability {
                attribute: attribute.to_owned(),
                value: value.clone(),
                probability,
            });
        }
    }

    let sum: f64 = probabilities.values().sum();
    if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(ConfigurationError::ProbabilitySum {
            attribute: attribute.to_owned(),
            sum,
        });
    }

    Ok(legal
        .iter()
        .map(|value| probabilities.get(value).copied().unwrap_or(0.0))
        .collect())
}

/// Draw a value index for each of `node_count` nodes.
///
/// # Errors
///
/// See [`value_weights`].
pub fn sample_initial_state(
    domain: &AttributeDomain,
    attribute: &str,
    probabilities: &BTreeMap<String, f64>,
    node_count: usize,
    rng: &mut StdRng,
) -> Result<Vec<usize>, ConfigurationError> {
    let weights = value_weights(domain, attribute, probabilities)?;
    let distribution =
        WeightedIndex::new(&weights).map_err(|_err| ConfigurationError::ProbabilitySum {
            attribute: attribute.to_owned(),
            sum: weights.iter().sum(),
        })?;
    Ok((0..node_count).map(|_| distribution.sample(rng)).collect())
}

/// Check every attribute of the initial conditions against the domain
/// without drawing anything.
///
/// # Errors
///
/// Returns [`ConfigurationError::MissingInitialConditions`] for a
/// declared attribute with no entry, plus everything [`value_weights`]
/// reports.
pub fn check_initial_conditions(
    domain: &AttributeDomain,
    conditions: &InitialConditions,
) -> Result<(), ConfigurationError> {
    for (attribute, probabilities) in conditions {
        value_weights(domain, attribute, probabilities)?;
    }
    if let Some(missing) = domain
        .attribute_names()
        .into_iter()
        .find(|attribute| !conditions.contains_key(attribute))
    {
        return Err(ConfigurationError::MissingInitialConditions { attribute: missing });
    }
    Ok(())
}

/// Sample a fully populated initial snapshot.
///
/// Attributes are drawn in name order from the shared RNG, so a fixed seed
/// reproduces the snapshot exactly.
///
/// # Errors
///
/// See [`check_initial_conditions`].
pub fn initial_snapshot(
    domain: Arc<AttributeDomain>,
    conditions: &InitialConditions,
    node_count: usize,
    rng: &mut StdRng,
) -> Result<GraphSnapshot, ConfigurationError> {
    check_initial_conditions(&domain, conditions)?;

    let mut values = BTreeMap::new();
    for (attribute, probabilities) in conditions {
        let indices = sample_initial_state(&domain, attribute, probabilities, node_count, rng)?;
        values.insert(attribute.clone(), indices);
    }
    let snapshot = GraphSnapshot::new(domain, node_count, values)?;

    for (attribute, _) in snapshot.domain().iter() {
        debug!(
            attribute,
            counts = ?snapshot.counts(attribute),
            "Initial state sampled"
        );
    }
    Ok(snapshot)
}
