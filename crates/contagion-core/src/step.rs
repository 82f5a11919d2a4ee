//! The update engine: one synchronous step G_t → G_{t+1}.
//!
//! Each step runs in three phases:
//!
//! 1. **Copy** -- the next snapshot is reset to a copy of the current one.
//!
//! 2. **Select** -- every rule, in declared order, picks the nodes that
//!    fire. All rules read the unmutated current snapshot.
//!
//! 3. **Apply** -- each firing node gets the rule's final state in the
//!    next snapshot. A later rule overwrites an earlier one on the same
//!    node. The snapshots are then swapped.
//!
//! The clock advances before the copy, so a failed step leaves the engine
//! untouched.
//!
//! Measurement is not part of the step; the runner samples the current
//! snapshot before calling [`UpdateEngine::step`].
//!
//! The step is deterministic given the same snapshot, rules, and RNG state.

use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::clock::StepClock;
use crate::compartment::Compartment;
use crate::error::{ConfigurationError, EngineError};
use crate::rule::{TransitionMode, TransitionRule};
use crate::snapshot::GraphSnapshot;
use crate::topology::Adjacency;

/// How many nodes one rule moved during a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFiring {
    /// The rule name.
    pub rule: String,
    /// Number of nodes selected by the rule.
    pub fired: usize,
}

/// Summary of a single step's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSummary {
    /// The time the step started from.
    pub time: u64,
    /// Per-rule firing counts, in rule order.
    pub fired: Vec<RuleFiring>,
}

impl StepSummary {
    /// Total firings across all rules.
    pub fn total_fired(&self) -> usize {
        self.fired
            .iter()
            .fold(0_usize, |acc, f| acc.saturating_add(f.fired))
    }
}

/// Firing probability of a neighbor rule with per-neighbor probability `p`
/// for a node with `k` triggering neighbors: `1 - (1 - p)^k`.
pub fn neighbor_fire_probability(p: f64, k: u32) -> f64 {
    1.0 - (1.0 - p).powf(f64::from(k))
}

/// Nodes that fire under `rule` against `snapshot`, in ascending order.
///
/// Only nodes in the rule's initial state can fire. A uniform draw in
/// [0, 1) is taken for each eligible node with a non-zero probability and
/// the node fires iff the draw is below that probability.
pub fn select_firing_nodes(
    rule: &TransitionRule,
    snapshot: &GraphSnapshot,
    adjacency: &Adjacency,
    rng: &mut StdRng,
) -> Vec<usize> {
    let Some(values) = snapshot.indices(rule.attribute()) else {
        return Vec::new();
    };
    let initial = rule.initial_state().index();
    if !values.contains(&initial) {
        return Vec::new();
    }
    let p = rule.probability().get();

    match rule.mode() {
        TransitionMode::Rate => values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == initial)
            .filter_map(|(node, _)| (rng.random::<f64>() < p).then_some(node))
            .collect(),
        TransitionMode::Neighbor { triggering_state } => {
            let trigger = triggering_state.index();
            if !values.contains(&trigger) {
                return Vec::new();
            }
            let counts =
                adjacency.neighbor_counts(&snapshot.indicator(rule.attribute(), trigger));
            values
                .iter()
                .zip(counts)
                .enumerate()
                .filter(|&(_, (&v, k))| v == initial && k > 0)
                .filter_map(|(node, (_, k))| {
                    (rng.random::<f64>() < neighbor_fire_probability(p, k)).then_some(node)
                })
                .collect()
        }
    }
}

/// Owns the rules, the frozen topology, the current and next snapshots,
/// the clock, and the run's RNG.
#[derive(Debug, Clone)]
pub struct UpdateEngine {
    compartment: Compartment,
    adjacency: Adjacency,
    current: GraphSnapshot,
    next: GraphSnapshot,
    clock: StepClock,
    rng: StdRng,
}

impl UpdateEngine {
    /// Assemble an engine at time 0.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NodeCountMismatch`] if the snapshot
    /// and topology disagree on node count, or
    /// [`ConfigurationError::DomainMismatch`] if the snapshot was built
    /// against another attribute domain.
    pub fn new(
        compartment: Compartment,
        adjacency: Adjacency,
        initial: GraphSnapshot,
        rng: StdRng,
    ) -> Result<Self, ConfigurationError> {
        if initial.node_count() != adjacency.vertex_count() {
            return Err(ConfigurationError::NodeCountMismatch {
                snapshot_nodes: initial.node_count(),
                topology_nodes: adjacency.vertex_count(),
            });
        }
        if initial.domain().as_ref() != compartment.domain() {
            return Err(ConfigurationError::DomainMismatch);
        }
        Ok(Self {
            compartment,
            adjacency,
            next: initial.clone(),
            current: initial,
            clock: StepClock::new(),
            rng,
        })
    }

    /// Run one step and advance the clock.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StepOverflow`] if the clock cannot advance.
    pub fn step(&mut self) -> Result<StepSummary, EngineError> {
        let mut clock = self.clock;
        let time = clock.step();
        clock.advance()?;

        // --- Phase 1: Copy ---
        self.next.clone_from(&self.current);

        // --- Phases 2 and 3: Select and apply, rule by rule ---
        let mut fired = Vec::with_capacity(self.compartment.rules().len());
        for rule in self.compartment.rules() {
            let nodes = select_firing_nodes(rule, &self.current, &self.adjacency, &mut self.rng);
            let final_state = rule.final_state().index();
            for &node in &nodes {
                self.next.set(rule.attribute(), node, final_state);
            }
            fired.push(RuleFiring {
                rule: rule.name().to_owned(),
                fired: nodes.len(),
            });
        }

        core::mem::swap(&mut self.current, &mut self.next);
        self.clock = clock;

        let summary = StepSummary { time, fired };
        debug!(
            time,
            fired = summary.total_fired(),
            per_rule = ?summary.fired,
            "Step complete"
        );
        Ok(summary)
    }

    /// The current snapshot.
    pub const fn snapshot(&self) -> &GraphSnapshot {
        &self.current
    }

    /// Current simulation time.
    pub const fn time(&self) -> u64 {
        self.clock.step()
    }

    /// The compartment driving the engine.
    pub const fn compartment(&self) -> &Compartment {
        &self.compartment
    }

    /// The frozen topology.
    pub const fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }
}
