//! Graph snapshots: one categorical value per declared attribute per node.
//!
//! Values are stored as positions into the attribute's domain list, so a
//! snapshot only ever holds legal values. The engine never mutates the
//! snapshot it is reading; it writes into a clone and swaps.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::AttributeDomain;
use crate::error::ConfigurationError;

/// Per-node attribute values over a fixed attribute domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSnapshot {
    domain: Arc<AttributeDomain>,
    node_count: usize,
    values: BTreeMap<String, Vec<usize>>,
}

impl GraphSnapshot {
    /// Build a snapshot from per-attribute value indices.
    ///
    /// Every declared attribute must be present with exactly `node_count`
    /// entries, each a valid position in that attribute's value list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingInitialConditions`] for a
    /// declared attribute without values,
    /// [`ConfigurationError::UnknownAttribute`] for an undeclared one, or
    /// [`ConfigurationError::MalformedSnapshot`] for wrong lengths and
    /// out-of-range indices.
    pub fn new(
        domain: Arc<AttributeDomain>,
        node_count: usize,
        values: BTreeMap<String, Vec<usize>>,
    ) -> Result<Self, ConfigurationError> {
        for attribute in values.keys() {
            domain.require_attribute(attribute)?;
        }
        for (attribute, legal) in domain.iter() {
            let indices =
                values
                    .get(attribute)
                    .ok_or_else(|| ConfigurationError::MissingInitialConditions {
                        attribute: attribute.to_owned(),
                    })?;
            if indices.len() != node_count {
                return Err(ConfigurationError::MalformedSnapshot {
                    attribute: attribute.to_owned(),
                    reason: format!("expected {node_count} values, got {}", indices.len()),
                });
            }
            if let Some(bad) = indices.iter().find(|&&i| i >= legal.len()) {
                return Err(ConfigurationError::MalformedSnapshot {
                    attribute: attribute.to_owned(),
                    reason: format!("value index {bad} outside {} legal values", legal.len()),
                });
            }
        }
        Ok(Self {
            domain,
            node_count,
            values,
        })
    }

    /// Build a snapshot from value names, one list per attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownValue`] for an illegal value,
    /// plus everything [`GraphSnapshot::new`] reports.
    pub fn from_names(
        domain: Arc<AttributeDomain>,
        node_count: usize,
        names: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self, ConfigurationError> {
        let mut values = BTreeMap::new();
        for (attribute, per_node) in names {
            let indices = per_node
                .iter()
                .map(|value| domain.require_value(attribute, value))
                .collect::<Result<Vec<_>, _>>()?;
            values.insert(attribute.clone(), indices);
        }
        Self::new(domain, node_count, values)
    }

    /// The attribute domain this snapshot is expressed in.
    pub fn domain(&self) -> &Arc<AttributeDomain> {
        &self.domain
    }

    /// Number of nodes.
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Value indices for every node, or `None` for an undeclared attribute.
    pub fn indices(&self, attribute: &str) -> Option<&[usize]> {
        self.values.get(attribute).map(Vec::as_slice)
    }

    /// The value a node holds.
    pub fn value(&self, attribute: &str, node: usize) -> Option<&str> {
        let index = *self.indices(attribute)?.get(node)?;
        self.domain.value_at(attribute, index)
    }

    /// Values of every node, by name.
    pub fn value_names(&self, attribute: &str) -> Option<Vec<&str>> {
        let legal = self.domain.values(attribute)?;
        self.indices(attribute)?
            .iter()
            .map(|&i| legal.get(i).map(String::as_str))
            .collect()
    }

    /// 0/1 membership of every node in the set holding `index`.
    pub fn indicator(&self, attribute: &str, index: usize) -> Vec<bool> {
        self.indices(attribute)
            .map(|values| values.iter().map(|&v| v == index).collect())
            .unwrap_or_else(|| vec![false; self.node_count])
    }

    /// Number of nodes holding each value, in domain order.
    ///
    /// Values no node holds are included with a zero count.
    pub fn counts(&self, attribute: &str) -> Option<Vec<(&str, usize)>> {
        let legal = self.domain.values(attribute)?;
        let indices = self.indices(attribute)?;
        let mut tally = vec![0_usize; legal.len()];
        for &i in indices {
            if let Some(slot) = tally.get_mut(i) {
                *slot = slot.saturating_add(1);
            }
        }
        Some(
            legal
                .iter()
                .map(String::as_str)
                .zip(tally)
                .collect(),
        )
    }

    /// Overwrite a node's value index. Out-of-range nodes are ignored.
    pub(crate) fn set(&mut self, attribute: &str, node: usize, index: usize) {
        if let Some(slot) = self
            .values
            .get_mut(attribute)
            .and_then(|values| values.get_mut(node))
        {
            *slot = index;
        }
    }
}
