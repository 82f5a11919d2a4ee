//! Transition rules: declarative statements that nodes in one state move
//! to another.
//!
//! A rule arrives as a raw [`RuleSpec`] (the seven configuration fields)
//! and is turned into a validated [`TransitionRule`] against an
//! [`AttributeDomain`]. Validation resolves every state name to its
//! position in the domain, so the engine never looks names up per step.
//!
//! The mode is a tagged variant: a [`TransitionMode::Rate`] rule has no
//! triggering state at all, and a [`TransitionMode::Neighbor`] rule always
//! has a resolved one.

use serde::{Deserialize, Serialize};

use crate::domain::AttributeDomain;
use crate::error::{ConfigurationError, CoreError, ValidationError};

/// Mode strings accepted in a [`RuleSpec`].
pub const RULE_MODES: [&str; 2] = ["rate", "neighbor"];

/// A rule exactly as configured, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Human-readable rule name.
    pub name: String,
    /// The attribute the rule reads and writes.
    pub attribute: String,
    /// State a node must hold to be eligible.
    pub initial_state: String,
    /// State of the neighbors that drive a `neighbor` rule.
    #[serde(default)]
    pub triggering_state: Option<String>,
    /// State an eligible node moves to when the rule fires.
    pub final_state: String,
    /// Per-step probability (rate) or per-neighbor probability (neighbor).
    #[serde(alias = "probability")]
    pub prob: f64,
    /// `"rate"` or `"neighbor"`.
    pub mode: String,
}

/// A probability strictly between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Probability(f64);

impl Probability {
    /// Wrap `p` if `0 < p < 1`.
    pub fn new(p: f64) -> Option<Self> {
        (p > 0.0 && p < 1.0).then_some(Self(p))
    }

    /// The raw probability.
    pub const fn get(self) -> f64 {
        self.0
    }
}

/// A state name together with its position in the attribute's domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateRef {
    name: String,
    index: usize,
}

impl StateRef {
    /// The state name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the state within its attribute's value list.
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// How a rule computes each eligible node's firing probability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransitionMode {
    /// Constant per-step probability, independent of neighbors.
    Rate,
    /// `1 - (1 - p)^k` where `k` counts neighbors in the triggering state.
    Neighbor {
        /// The state that neighbors must hold to count.
        triggering_state: StateRef,
    },
}

impl TransitionMode {
    /// The configuration string for this mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rate => "rate",
            Self::Neighbor { .. } => "neighbor",
        }
    }
}

/// A validated, immutable transition rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionRule {
    name: String,
    attribute: String,
    initial_state: StateRef,
    final_state: StateRef,
    probability: Probability,
    mode: TransitionMode,
}

impl TransitionRule {
    /// Validate a spec against a domain.
    ///
    /// Checks run in field order (name, attribute, initial state, final
    /// state, probability, mode, triggering state) and the first violation
    /// is reported. A `rate` rule ignores `triggering_state` entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a violated rule invariant, or
    /// [`CoreError::Configuration`] with
    /// [`ConfigurationError::UnknownRuleMode`] for an unrecognized mode.
    pub fn from_spec(spec: &RuleSpec, domain: &AttributeDomain) -> Result<Self, CoreError> {
        let rule = spec.name.clone();
        if rule.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let legal = domain
            .values(&spec.attribute)
            .ok_or_else(|| ValidationError::UnknownAttribute {
                rule: rule.clone(),
                attribute: spec.attribute.clone(),
                available: domain.attribute_names(),
            })?;
        let resolve = |state: &str| {
            legal.iter().position(|v| v == state).map(|index| StateRef {
                name: state.to_owned(),
                index,
            })
        };

        let initial_state =
            resolve(&spec.initial_state).ok_or_else(|| ValidationError::UnknownInitialState {
                rule: rule.clone(),
                state: spec.initial_state.clone(),
                legal: legal.to_vec(),
            })?;
        let final_state =
            resolve(&spec.final_state).ok_or_else(|| ValidationError::UnknownFinalState {
                rule: rule.clone(),
                state: spec.final_state.clone(),
                legal: legal.to_vec(),
            })?;
        let probability =
            Probability::new(spec.prob).ok_or_else(|| ValidationError::ProbabilityOutOfRange {
                rule: rule.clone(),
                probability: spec.prob,
            })?;

        let mode = match spec.mode.as_str() {
            "rate" => TransitionMode::Rate,
            "neighbor" => {
                let trigger = spec
                    .triggering_state
                    .as_deref()
                    .ok_or_else(|| ValidationError::MissingTriggeringState { rule: rule.clone() })?;
                let triggering_state =
                    resolve(trigger).ok_or_else(|| ValidationError::UnknownTriggeringState {
                        rule: rule.clone(),
                        state: trigger.to_owned(),
                        legal: legal.to_vec(),
                    })?;
                TransitionMode::Neighbor { triggering_state }
            }
            other => {
                return Err(ConfigurationError::UnknownRuleMode {
                    rule,
                    mode: other.to_owned(),
                    available: RULE_MODES.iter().map(|&m| m.to_owned()).collect(),
                }
                .into());
            }
        };

        Ok(Self {
            name: rule,
            attribute: spec.attribute.clone(),
            initial_state,
            final_state,
            probability,
            mode,
        })
    }

    /// The rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute the rule reads and writes.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// State a node must hold to be eligible.
    pub const fn initial_state(&self) -> &StateRef {
        &self.initial_state
    }

    /// State written when the rule fires.
    pub const fn final_state(&self) -> &StateRef {
        &self.final_state
    }

    /// The rule's probability parameter.
    pub const fn probability(&self) -> Probability {
        self.probability
    }

    /// The rule's mode.
    pub const fn mode(&self) -> &TransitionMode {
        &self.mode
    }

    /// The triggering state of a neighbor rule.
    pub const fn triggering_state(&self) -> Option<&StateRef> {
        match &self.mode {
            TransitionMode::Rate => None,
            TransitionMode::Neighbor { triggering_state } => Some(triggering_state),
        }
    }

    /// One-line form used in compartment summaries:
    /// `(S) -> (I) caused by (I) p = 0.5`.
    pub fn summary_line(&self) -> String {
        let mut line = format!("({}) -> ({})", self.initial_state.name, self.final_state.name);
        if let Some(trigger) = self.triggering_state() {
            line.push_str(&format!(" caused by ({})", trigger.name));
        }
        line.push_str(&format!(" p = {}", self.probability.get()));
        line
    }
}

impl core::fmt::Display for TransitionRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Attribute: {}", self.attribute)?;
        writeln!(f, "Initial State: {}", self.initial_state.name)?;
        writeln!(
            f,
            "Triggering State: {}",
            self.triggering_state().map_or("-", StateRef::name)
        )?;
        writeln!(f, "Final State: {}", self.final_state.name)?;
        writeln!(f, "Probability: {}", self.probability.get())?;
        write!(f, "Mode: {}", self.mode.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::unreachable)]
mod tests {
    use super::*;

    fn sir_domain() -> AttributeDomain {
        let mut domain = AttributeDomain::new();
        let values = vec!["S".to_owned(), "I".to_owned(), "R".to_owned()];
        domain.declare("compartment", &values).unwrap();
        domain
    }

    fn infection() -> RuleSpec {
        RuleSpec {
            name: "infection".to_owned(),
            attribute: "compartment".to_owned(),
            initial_state: "S".to_owned(),
            triggering_state: Some("I".to_owned()),
            final_state: "I".to_owned(),
            prob: 0.5,
            mode: "neighbor".to_owned(),
        }
    }

    fn recovery() -> RuleSpec {
        RuleSpec {
            name: "recovery".to_owned(),
            attribute: "compartment".to_owned(),
            initial_state: "I".to_owned(),
            triggering_state: None,
            final_state: "R".to_owned(),
            prob: 0.1,
            mode: "rate".to_owned(),
        }
    }

    fn validation_error(spec: &RuleSpec) -> ValidationError {
        match TransitionRule::from_spec(spec, &sir_domain()) {
            Err(CoreError::Validation { source }) => source,
            other => unreachable!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn neighbor_rule_resolves_states() {
        let rule = TransitionRule::from_spec(&infection(), &sir_domain()).unwrap();
        assert_eq!(rule.initial_state().index(), 0);
        assert_eq!(rule.final_state().index(), 1);
        assert_eq!(rule.triggering_state().map(StateRef::index), Some(1));
        assert_eq!(rule.mode().as_str(), "neighbor");
    }

    #[test]
    fn rate_rule_ignores_triggering_state() {
        let mut spec = recovery();
        spec.triggering_state = Some("not-a-state".to_owned());
        let rule = TransitionRule::from_spec(&spec, &sir_domain()).unwrap();
        assert_eq!(rule.mode(), &TransitionMode::Rate);
        assert!(rule.triggering_state().is_none());
    }

    #[test]
    fn probability_bounds_are_open() {
        for p in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let mut spec = recovery();
            spec.prob = p;
            assert!(matches!(
                validation_error(&spec),
                ValidationError::ProbabilityOutOfRange { .. }
            ));
        }
        assert!(Probability::new(0.999_999).is_some());
        assert!(Probability::new(1e-12).is_some());
    }

    #[test]
    fn each_invariant_has_its_own_error() {
        let mut spec = infection();
        spec.attribute = "age".to_owned();
        assert!(matches!(validation_error(&spec), ValidationError::UnknownAttribute { .. }));

        let mut spec = infection();
        spec.initial_state = "E".to_owned();
        assert!(matches!(validation_error(&spec), ValidationError::UnknownInitialState { .. }));

        let mut spec = infection();
        spec.final_state = "D".to_owned();
        assert!(matches!(validation_error(&spec), ValidationError::UnknownFinalState { .. }));

        let mut spec = infection();
        spec.triggering_state = None;
        assert!(matches!(
            validation_error(&spec),
            ValidationError::MissingTriggeringState { .. }
        ));

        let mut spec = infection();
        spec.triggering_state = Some("X".to_owned());
        assert!(matches!(
            validation_error(&spec),
            ValidationError::UnknownTriggeringState { .. }
        ));

        let mut spec = infection();
        spec.name = "  ".to_owned();
        assert_eq!(validation_error(&spec), ValidationError::EmptyName);
    }

    #[test]
    fn unknown_mode_is_a_configuration_error() {
        let mut spec = recovery();
        spec.mode = "contact".to_owned();
        let err = TransitionRule::from_spec(&spec, &sir_domain()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Configuration {
                source: ConfigurationError::UnknownRuleMode { ref mode, .. }
            } if mode == "contact"
        ));
        assert!(err.to_string().contains("rate, neighbor"));
    }

    #[test]
    fn summary_line_and_display() {
        let rule = TransitionRule::from_spec(&infection(), &sir_domain()).unwrap();
        assert_eq!(rule.summary_line(), "(S) -> (I) caused by (I) p = 0.5");

        let rule = TransitionRule::from_spec(&recovery(), &sir_domain()).unwrap();
        assert_eq!(rule.summary_line(), "(I) -> (R) p = 0.1");
        let text = rule.to_string();
        assert!(text.starts_with("Name: recovery\n"));
        assert!(text.contains("Triggering State: -\n"));
        assert!(text.ends_with("Mode: rate"));
    }

    #[test]
    fn spec_deserializes_from_yaml() {
        let yaml = "name: infection\nattribute: compartment\ninitial_state: S\n\
                    triggering_state: I\nfinal_state: I\nprobability: 0.3\nmode: neighbor\n";
        let spec: RuleSpec = serde_yml::from_str(yaml).unwrap();
        assert!((spec.prob - 0.3).abs() < f64::EPSILON);
        assert_eq!(spec.triggering_state.as_deref(), Some("I"));
    }
}
