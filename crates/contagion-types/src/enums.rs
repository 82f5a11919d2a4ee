//! Enumeration types shared across the Contagion workspace.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Measurement Mode
// ---------------------------------------------------------------------------

/// How the measurement sink samples a snapshot.
///
/// The configuration carries this as a lowercase string (`"aggregate"` or
/// `"detailed"`); the core parses it once when the sink is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementMode {
    /// Count occurrences of each attribute value per time point.
    Aggregate,
    /// Record every node's attribute value per time point.
    Detailed,
}

impl MeasurementMode {
    /// Every recognized mode, in the order they are listed to users.
    pub const ALL: [Self; 2] = [Self::Aggregate, Self::Detailed];

    /// The configuration string for this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aggregate => "aggregate",
            Self::Detailed => "detailed",
        }
    }

    /// Look up a mode by its configuration string.
    ///
    /// Matching is exact; `"Aggregate"` is not accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == name)
    }
}

impl core::fmt::Display for MeasurementMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for mode in MeasurementMode::ALL {
            assert_eq!(MeasurementMode::from_name(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn unknown_and_miscased_names_rejected() {
        assert_eq!(MeasurementMode::from_name("Aggregate"), None);
        assert_eq!(MeasurementMode::from_name("summary"), None);
        assert_eq!(MeasurementMode::from_name(""), None);
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&MeasurementMode::Detailed).ok();
        assert_eq!(json.as_deref(), Some("\"detailed\""));
    }
}
