//! Turning a loaded epidemic configuration and graph into a ready engine.
//!
//! Every configuration problem surfaces here, before the first step:
//! attribute domains, rules, initial conditions, the measurement mode, and
//! edge ranges are all checked up front.

use std::sync::Arc;

use contagion_types::Edge;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::compartment::Compartment;
use crate::config::EpidemicConfig;
use crate::error::CoreError;
use crate::initializer;
use crate::measure::Measurement;
use crate::snapshot::GraphSnapshot;
use crate::step::UpdateEngine;
use crate::topology::Adjacency;

/// Everything a run needs, checked and assembled.
#[derive(Debug, Clone)]
pub struct SimulationSetup {
    /// Attribute domains and rules.
    pub compartment: Compartment,
    /// Frozen topology.
    pub adjacency: Adjacency,
    /// Sampled initial snapshot.
    pub snapshot: GraphSnapshot,
    /// Empty measurement sink in the configured mode.
    pub measurement: Measurement,
    /// The run's RNG, already advanced past initial sampling.
    pub rng: StdRng,
}

impl SimulationSetup {
    /// Hand the compartment, topology, snapshot and RNG to a new engine.
    /// The measurement sink is returned alongside.
    ///
    /// # Errors
    ///
    /// See [`UpdateEngine::new`].
    pub fn into_engine(self) -> Result<(UpdateEngine, Measurement), CoreError> {
        let engine = UpdateEngine::new(self.compartment, self.adjacency, self.snapshot, self.rng)?;
        Ok((engine, self.measurement))
    }
}

/// Declare the configured attribute domains, then add the rules in order.
///
/// # Errors
///
/// Returns the first domain or rule error.
pub fn build_compartment(config: &EpidemicConfig) -> Result<Compartment, CoreError> {
    let mut compartment = Compartment::new();
    for (name, values) in &config.attributes {
        compartment.declare_attribute_domain(name, values)?;
    }
    compartment.add_rules(&config.dynamics)?;
    Ok(compartment)
}

/// Build the compartment, topology, initial snapshot and measurement sink
/// for a graph of `vertex_count` nodes.
///
/// The RNG is seeded from `experiment.seed`; the same configuration and
/// graph always produce the same setup.
///
/// # Errors
///
/// Returns [`CoreError::Configuration`] or [`CoreError::Validation`] for
/// the first inconsistency found.
pub fn initialize_simulation(
    vertex_count: usize,
    edges: &[Edge],
    config: &EpidemicConfig,
) -> Result<SimulationSetup, CoreError> {
    let compartment = build_compartment(config)?;
    initializer::check_initial_conditions(compartment.domain(), &config.initial_conditions)?;
    compartment
        .domain()
        .require_attribute(&config.experiment.measured_attribute)?;
    let measurement = Measurement::new(&config.experiment.measurement_mode)?;

    let adjacency = Adjacency::build(vertex_count, edges, !config.experiment.directed)?;

    let mut rng = StdRng::seed_from_u64(config.experiment.seed);
    let snapshot = initializer::initial_snapshot(
        Arc::new(compartment.domain().clone()),
        &config.initial_conditions,
        vertex_count,
        &mut rng,
    )?;

    info!(
        vertices = vertex_count,
        edges = edges.len(),
        rules = compartment.rules().len(),
        seed = config.experiment.seed,
        directed = config.experiment.directed,
        measurement = %measurement.mode(),
        "Simulation initialized"
    );

    Ok(SimulationSetup {
        compartment,
        adjacency,
        snapshot,
        measurement,
        rng,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ConfigurationError, ValidationError};

    fn config(yaml_tail: &str) -> EpidemicConfig {
        let yaml = format!(
            "attributes:\n  compartment: [S, I, R]\n\
             initial_conditions:\n  compartment: {{S: 0.9, I: 0.1}}\n{yaml_tail}"
        );
        EpidemicConfig::parse(&yaml).unwrap()
    }

    const SIR_DYNAMICS: &str = "dynamics:\n\
        - {name: infection, attribute: compartment, initial_state: S, triggering_state: I, final_state: I, prob: 0.3, mode: neighbor}\n\
        - {name: recovery, attribute: compartment, initial_state: I, final_state: R, prob: 0.1, mode: rate}\n";

    #[test]
    fn builds_a_ready_engine() {
        let cfg = config(&format!("{SIR_DYNAMICS}experiment: {{time_steps: 3}}\n"));
        let setup = initialize_simulation(3, &[Edge(0, 1), Edge(1, 2)], &cfg).unwrap();
        assert_eq!(setup.compartment.rules().len(), 2);
        assert_eq!(setup.snapshot.node_count(), 3);
        assert!(setup.adjacency.is_symmetric());

        let (engine, measurement) = setup.into_engine().unwrap();
        assert_eq!(engine.time(), 0);
        assert_eq!(measurement.sample_count(), 0);
    }

    #[test]
    fn directed_flag_keeps_edge_direction() {
        let cfg = config("experiment: {time_steps: 1, directed: true}\n");
        let setup = initialize_simulation(2, &[Edge(0, 1)], &cfg).unwrap();
        assert!(!setup.adjacency.is_symmetric());
        assert!(setup.adjacency.neighbors(1).is_empty());
    }

    #[test]
    fn bad_rule_is_a_validation_error() {
        let cfg = config(
            "dynamics:\n\
             - {name: bad, attribute: compartment, initial_state: S, final_state: Z, prob: 0.3, mode: rate}\n\
             experiment: {time_steps: 1}\n",
        );
        assert!(matches!(
            initialize_simulation(1, &[], &cfg),
            Err(CoreError::Validation {
                source: ValidationError::UnknownFinalState { .. }
            })
        ));
    }

    #[test]
    fn unknown_measurement_mode_fails_before_running() {
        let cfg = config("experiment: {time_steps: 1, measurement_mode: summary}\n");
        assert!(matches!(
            initialize_simulation(1, &[], &cfg),
            Err(CoreError::Configuration {
                source: ConfigurationError::UnknownMeasurementMode { .. }
            })
        ));
    }

    #[test]
    fn unknown_measured_attribute_fails() {
        let cfg = config("experiment: {time_steps: 1, measured_attribute: age}\n");
        assert!(matches!(
            initialize_simulation(1, &[], &cfg),
            Err(CoreError::Configuration {
                source: ConfigurationError::UnknownAttribute { .. }
            })
        ));
    }

    #[test]
    fn out_of_range_edge_fails() {
        let cfg = config("experiment: {time_steps: 1}\n");
        assert!(matches!(
            initialize_simulation(2, &[Edge(0, 5)], &cfg),
            Err(CoreError::Configuration {
                source: ConfigurationError::EdgeOutOfRange { .. }
            })
        ));
    }

    #[test]
    fn seed_fixes_initial_snapshot() {
        let cfg = config("experiment: {time_steps: 1, seed: 7}\n");
        let a = initialize_simulation(40, &[], &cfg).unwrap();
        let b = initialize_simulation(40, &[], &cfg).unwrap();
        assert_eq!(a.snapshot, b.snapshot);
    }
}
