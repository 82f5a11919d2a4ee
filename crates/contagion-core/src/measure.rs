//! The measurement sink: per-time samples of one attribute, concatenated
//! into a single table at the end of a run.
//!
//! | Mode        | One row per          | Columns                 |
//! |-------------|----------------------|-------------------------|
//! | `aggregate` | value held by ≥1 node | `value, count, time`    |
//! | `detailed`  | node                 | `node, value, time`     |
//!
//! Aggregate rows follow the attribute's domain order; values no node
//! holds are left out. Samples copy what they record, so later snapshot
//! changes never reach a stored sample.

use contagion_types::{AggregateRow, DetailedRow, MeasurementMode, MeasurementTable};
use tracing::debug;

use crate::error::ConfigurationError;
use crate::snapshot::GraphSnapshot;

/// Count nodes per value at `time`.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownAttribute`] if the snapshot has no
/// such attribute.
pub fn measure_aggregate(
    snapshot: &GraphSnapshot,
    attribute: &str,
    time: u64,
) -> Result<Vec<AggregateRow>, ConfigurationError> {
    let counts = snapshot
        .counts(attribute)
        .ok_or_else(|| unknown_attribute(snapshot, attribute))?;
    Ok(counts
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .map(|(value, count)| AggregateRow {
            value: value.to_owned(),
            count: u64::try_from(count).unwrap_or(u64::MAX),
            time,
        })
        .collect())
}

/// Record every node's value at `time`.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownAttribute`] if the snapshot has no
/// such attribute.
pub fn measure_detailed(
    snapshot: &GraphSnapshot,
    attribute: &str,
    time: u64,
) -> Result<Vec<DetailedRow>, ConfigurationError> {
    let values = snapshot
        .value_names(attribute)
        .ok_or_else(|| unknown_attribute(snapshot, attribute))?;
    Ok(values
        .into_iter()
        .enumerate()
        .map(|(node, value)| DetailedRow {
            node,
            value: value.to_owned(),
            time,
        })
        .collect())
}

fn unknown_attribute(snapshot: &GraphSnapshot, attribute: &str) -> ConfigurationError {
    ConfigurationError::UnknownAttribute {
        attribute: attribute.to_owned(),
        available: snapshot.domain().attribute_names(),
    }
}

/// Samples recorded so far, one entry per time point.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Samples {
    Aggregate(Vec<Vec<AggregateRow>>),
    Detailed(Vec<Vec<DetailedRow>>),
}

/// Append-only measurement record for one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    attribute: Option<String>,
    samples: Samples,
}

impl Measurement {
    /// Create a sink from its configuration string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownMeasurementMode`] listing the
    /// available modes.
    pub fn new(mode: &str) -> Result<Self, ConfigurationError> {
        MeasurementMode::from_name(mode)
            .map(Self::with_mode)
            .ok_or_else(|| ConfigurationError::UnknownMeasurementMode {
                mode: mode.to_owned(),
                available: MeasurementMode::ALL
                    .iter()
                    .map(|m| m.as_str().to_owned())
                    .collect(),
            })
    }

    /// Create a sink for an already-parsed mode.
    pub const fn with_mode(mode: MeasurementMode) -> Self {
        let samples = match mode {
            MeasurementMode::Aggregate => Samples::Aggregate(Vec::new()),
            MeasurementMode::Detailed => Samples::Detailed(Vec::new()),
        };
        Self {
            attribute: None,
            samples,
        }
    }

    /// The sampling mode.
    pub const fn mode(&self) -> MeasurementMode {
        match self.samples {
            Samples::Aggregate(_) => MeasurementMode::Aggregate,
            Samples::Detailed(_) => MeasurementMode::Detailed,
        }
    }

    /// Number of time points recorded.
    pub fn sample_count(&self) -> usize {
        match &self.samples {
            Samples::Aggregate(samples) => samples.len(),
            Samples::Detailed(samples) => samples.len(),
        }
    }

    /// Sample `attribute` of `snapshot`, tagged with `time`.
    ///
    /// Every sample in one record must be of the same attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MeasuredAttributeChanged`] if an
    /// earlier sample recorded another attribute, or
    /// [`ConfigurationError::UnknownAttribute`].
    pub fn record(
        &mut self,
        snapshot: &GraphSnapshot,
        attribute: &str,
        time: u64,
    ) -> Result<(), ConfigurationError> {
        if let Some(recorded) = self.attribute.as_deref() {
            if recorded != attribute {
                return Err(ConfigurationError::MeasuredAttributeChanged {
                    recorded: recorded.to_owned(),
                    requested: attribute.to_owned(),
                });
            }
        }

        let rows = match &mut self.samples {
            Samples::Aggregate(samples) => {
                let rows = measure_aggregate(snapshot, attribute, time)?;
                let len = rows.len();
                samples.push(rows);
                len
            }
            Samples::Detailed(samples) => {
                let rows = measure_detailed(snapshot, attribute, time)?;
                let len = rows.len();
                samples.push(rows);
                len
            }
        };
        self.attribute.get_or_insert_with(|| attribute.to_owned());
        debug!(attribute, time, rows, "Sample recorded");
        Ok(())
    }

    /// Concatenate every sample, in recording order, into one table.
    pub fn concatenate(self) -> MeasurementTable {
        let attribute = self.attribute.unwrap_or_default();
        match self.samples {
            Samples::Aggregate(samples) => MeasurementTable::Aggregate {
                attribute,
                rows: samples.into_iter().flatten().collect(),
            },
            Samples::Detailed(samples) => MeasurementTable::Detailed {
                attribute,
                rows: samples.into_iter().flatten().collect(),
            },
        }
    }
}
