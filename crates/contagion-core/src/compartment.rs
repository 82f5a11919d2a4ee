//! The compartment: attribute domains plus the ordered rule list.
//!
//! Rule order is significant. Within a step every rule reads the same
//! pre-step snapshot, and when two rules select the same node the later
//! rule's write wins.

use tracing::debug;

use crate::domain::AttributeDomain;
use crate::error::{ConfigurationError, CoreError};
use crate::rule::{RuleSpec, TransitionRule};

/// Attribute domains and the ordered, validated transition rules over them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compartment {
    domain: AttributeDomain,
    rules: Vec<TransitionRule>,
}

impl Compartment {
    /// Create a compartment with no attributes and no rules.
    pub const fn new() -> Self {
        Self {
            domain: AttributeDomain::new(),
            rules: Vec::new(),
        }
    }

    /// Create a compartment over an existing domain.
    pub const fn with_domain(domain: AttributeDomain) -> Self {
        Self {
            domain,
            rules: Vec::new(),
        }
    }

    /// Register the legal values of an attribute.
    ///
    /// # Errors
    ///
    /// See [`AttributeDomain::declare`].
    pub fn declare_attribute_domain(
        &mut self,
        name: &str,
        values: &[String],
    ) -> Result<(), ConfigurationError> {
        self.domain.declare(name, values)
    }

    /// Validate a rule spec and append it to the rule list.
    ///
    /// The rule list is untouched when validation fails.
    ///
    /// # Errors
    ///
    /// See [`TransitionRule::from_spec`].
    pub fn add_rule(&mut self, spec: &RuleSpec) -> Result<(), CoreError> {
        let rule = TransitionRule::from_spec(spec, &self.domain)?;
        debug!(rule = rule.name(), mode = rule.mode().as_str(), "Rule added");
        self.rules.push(rule);
        Ok(())
    }

    /// Append several rules in order, stopping at the first invalid one.
    ///
    /// Rules before the failing one stay added.
    ///
    /// # Errors
    ///
    /// See [`TransitionRule::from_spec`].
    pub fn add_rules<'a>(
        &mut self,
        specs: impl IntoIterator<Item = &'a RuleSpec>,
    ) -> Result<(), CoreError> {
        specs.into_iter().try_for_each(|spec| self.add_rule(spec))
    }

    /// The attribute domain.
    pub const fn domain(&self) -> &AttributeDomain {
        &self.domain
    }

    /// Rules in application order.
    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    /// Human-readable ordered summary of every rule.
    ///
    /// ```text
    /// SUMMARY
    /// - infection:
    /// (S) -> (I) caused by (I) p = 0.3
    /// - recovery:
    /// (I) -> (R) p = 0.1
    /// ```
    pub fn describe(&self) -> String {
        let mut summary = String::from("SUMMARY");
        for rule in &self.rules {
            summary.push_str("\n- ");
            summary.push_str(rule.name());
            summary.push_str(":\n");
            summary.push_str(&rule.summary_line());
        }
        summary
    }
}

impl core::fmt::Display for Compartment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rule(name: &str, from: &str, trigger: Option<&str>, to: &str, p: f64) -> RuleSpec {
        RuleSpec {
            name: name.to_owned(),
            attribute: "compartment".to_owned(),
            initial_state: from.to_owned(),
            triggering_state: trigger.map(str::to_owned),
            final_state: to.to_owned(),
            prob: p,
            mode: if trigger.is_some() { "neighbor" } else { "rate" }.to_owned(),
        }
    }

    fn sir_compartment() -> Compartment {
        let mut c = Compartment::new();
        let values = vec!["S".to_owned(), "I".to_owned(), "R".to_owned()];
        c.declare_attribute_domain("compartment", &values).unwrap();
        c
    }

    #[test]
    fn rules_keep_declared_order() {
        let mut c = sir_compartment();
        c.add_rules(&[
            rule("infection", "S", Some("I"), "I", 0.3),
            rule("recovery", "I", None, "R", 0.1),
            rule("waning", "R", None, "S", 0.01),
        ])
        .unwrap();
        let names: Vec<&str> = c.rules().iter().map(TransitionRule::name).collect();
        assert_eq!(names, vec!["infection", "recovery", "waning"]);
    }

    #[test]
    fn failed_rule_leaves_list_untouched() {
        let mut c = sir_compartment();
        c.add_rule(&rule("infection", "S", Some("I"), "I", 0.3)).unwrap();
        let before = c.clone();

        assert!(c.add_rule(&rule("bad", "S", None, "Q", 0.3)).is_err());
        assert!(c.add_rule(&rule("bad", "S", None, "I", 1.0)).is_err());
        assert_eq!(c, before);
    }

    #[test]
    fn add_rules_stops_at_first_failure() {
        let mut c = sir_compartment();
        let result = c.add_rules(&[
            rule("infection", "S", Some("I"), "I", 0.3),
            rule("broken", "S", Some("Z"), "I", 0.3),
            rule("recovery", "I", None, "R", 0.1),
        ]);
        assert!(result.is_err());
        assert_eq!(c.rules().len(), 1);
    }

    #[test]
    fn describe_matches_summary_format() {
        let mut c = sir_compartment();
        c.add_rules(&[
            rule("infection", "S", Some("I"), "I", 0.3),
            rule("recovery", "I", None, "R", 0.1),
        ])
        .unwrap();
        assert_eq!(
            c.describe(),
            "SUMMARY\n- infection:\n(S) -> (I) caused by (I) p = 0.3\n- recovery:\n(I) -> (R) p = 0.1"
        );
    }

    #[test]
    fn describe_is_idempotent() {
        let mut c = sir_compartment();
        c.add_rule(&rule("recovery", "I", None, "R", 0.1)).unwrap();
        let first = c.describe();
        let second = c.describe();
        assert_eq!(first, second);
        assert_eq!(c.to_string(), first);
    }

    #[test]
    fn empty_compartment_describes_header_only() {
        assert_eq!(Compartment::new().describe(), "SUMMARY");
    }

    #[test]
    fn conflicting_domain_declaration_fails() {
        let mut c = sir_compartment();
        let values = vec!["S".to_owned(), "E".to_owned(), "I".to_owned(), "R".to_owned()];
        assert!(matches!(
            c.declare_attribute_domain("compartment", &values),
            Err(ConfigurationError::ConflictingDomain { .. })
        ));
    }
}
