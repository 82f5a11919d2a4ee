//! Attribute domains: the legal values of every categorical node attribute.
//!
//! A domain maps each attribute name (e.g. `compartment`) to an ordered
//! list of values (e.g. `S`, `I`, `R`). The order is the declaration order
//! and is used wherever values are listed: rule validation messages,
//! aggregate measurement rows, and reports.
//!
//! Snapshots store a value as its position in this list, so a domain is
//! fixed before any snapshot is built and never changes during a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Declared attributes and their ordered legal values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDomain {
    attributes: BTreeMap<String, Vec<String>>,
}

impl AttributeDomain {
    /// Create an empty domain.
    pub const fn new() -> Self {
        Self {
            attributes: BTreeMap::new(),
        }
    }

    /// Register the legal values for an attribute.
    ///
    /// Declaring the same attribute again with identical values (in the
    /// same order) is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyDomain`] for an empty value list,
    /// [`ConfigurationError::DuplicateValue`] if a value repeats, or
    /// [`ConfigurationError::ConflictingDomain`] if the attribute was
    /// already declared with different values.
    pub fn declare(&mut self, name: &str, values: &[String]) -> Result<(), ConfigurationError> {
        if values.is_empty() {
            return Err(ConfigurationError::EmptyDomain {
                attribute: name.to_owned(),
            });
        }
        for (i, value) in values.iter().enumerate() {
            if values.iter().take(i).any(|earlier| earlier == value) {
                return Err(ConfigurationError::DuplicateValue {
                    attribute: name.to_owned(),
                    value: value.clone(),
                });
            }
        }

        match self.attributes.get(name) {
            Some(declared) if declared.as_slice() == values => Ok(()),
            Some(declared) => Err(ConfigurationError::ConflictingDomain {
                attribute: name.to_owned(),
                declared: declared.clone(),
                requested: values.to_vec(),
            }),
            None => {
                self.attributes.insert(name.to_owned(), values.to_vec());
                Ok(())
            }
        }
    }

    /// Whether the attribute has been declared.
    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Declared attribute names in sorted order.
    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    /// Number of declared attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether no attribute has been declared.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate over `(attribute, values)` pairs in attribute-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.attributes
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// The ordered legal values of an attribute.
    pub fn values(&self, attribute: &str) -> Option<&[String]> {
        self.attributes.get(attribute).map(Vec::as_slice)
    }

    /// Position of `value` within the attribute's value list.
    pub fn index_of(&self, attribute: &str, value: &str) -> Option<usize> {
        self.values(attribute)?.iter().position(|v| v == value)
    }

    /// The value at `index` within the attribute's value list.
    pub fn value_at(&self, attribute: &str, index: usize) -> Option<&str> {
        self.values(attribute)?.get(index).map(String::as_str)
    }

    /// Like [`AttributeDomain::values`], but fails with the list of
    /// declared attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownAttribute`].
    pub fn require_attribute(&self, attribute: &str) -> Result<&[String], ConfigurationError> {
        self.values(attribute)
            .ok_or_else(|| ConfigurationError::UnknownAttribute {
                attribute: attribute.to_owned(),
                available: self.attribute_names(),
            })
    }

    /// Like [`AttributeDomain::index_of`], but fails with the list of legal
    /// values (or declared attributes).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownAttribute`] or
    /// [`ConfigurationError::UnknownValue`].
    pub fn require_value(&self, attribute: &str, value: &str) -> Result<usize, ConfigurationError> {
        let legal = self.require_attribute(attribute)?;
        legal
            .iter()
            .position(|v| v == value)
            .ok_or_else(|| ConfigurationError::UnknownValue {
                attribute: attribute.to_owned(),
                value: value.to_owned(),
                legal: legal.to_vec(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sir() -> Vec<String> {
        vec!["S".to_owned(), "I".to_owned(), "R".to_owned()]
    }

    fn sir_domain() -> AttributeDomain {
        let mut domain = AttributeDomain::new();
        domain.declare("compartment", &sir()).unwrap();
        domain
    }

    #[test]
    fn declare_and_query() {
        let domain = sir_domain();
        assert!(domain.contains("compartment"));
        assert_eq!(domain.len(), 1);
        assert_eq!(domain.index_of("compartment", "I"), Some(1));
        assert_eq!(domain.value_at("compartment", 2), Some("R"));
        assert_eq!(domain.value_at("compartment", 3), None);
        assert_eq!(domain.index_of("age", "young"), None);
    }

    #[test]
    fn identical_redeclaration_is_noop() {
        let mut domain = sir_domain();
        assert!(domain.declare("compartment", &sir()).is_ok());
        assert_eq!(domain.values("compartment").unwrap(), sir().as_slice());
    }

    #[test]
    fn conflicting_redeclaration_fails_and_keeps_original() {
        let mut domain = sir_domain();
        let other = vec!["S".to_owned(), "I".to_owned()];
        let err = domain.declare("compartment", &other).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::ConflictingDomain {
                attribute: "compartment".to_owned(),
                declared: sir(),
                requested: other,
            }
        );
        assert_eq!(domain.values("compartment").unwrap().len(), 3);
    }

    #[test]
    fn empty_and_duplicate_values_rejected() {
        let mut domain = AttributeDomain::new();
        assert!(matches!(
            domain.declare("compartment", &[]),
            Err(ConfigurationError::EmptyDomain { .. })
        ));
        let dup = vec!["S".to_owned(), "S".to_owned()];
        assert!(matches!(
            domain.declare("compartment", &dup),
            Err(ConfigurationError::DuplicateValue { ref value, .. }) if value == "S"
        ));
        assert!(domain.is_empty());
    }

    #[test]
    fn require_value_lists_alternatives() {
        let domain = sir_domain();
        assert_eq!(domain.require_value("compartment", "R").unwrap(), 2);

        let err = domain.require_value("compartment", "E").unwrap_err();
        assert_eq!(err.to_string(), "E not available in the compartment list: S, I, R");

        let err = domain.require_attribute("age").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::UnknownAttribute { ref available, .. }
                if available == &vec!["compartment".to_owned()]
        ));
    }
}
