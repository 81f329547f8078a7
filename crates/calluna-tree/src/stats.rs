use std::collections::BTreeMap;

/// Aggregate outcome statistics for one feature combination.
///
/// Rates are fractions in [0, 1] throughout; percentage thresholds from
/// the configuration surface are divided by 100 before they meet these
/// values.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AggregateStats {
    /// Number of records in the group.
    pub group_size: u64,
    /// Fraction of records flagged as hits.
    pub hit_fraction: f64,
    /// Fraction of records with a refusal outcome.
    pub refusal_fraction: f64,
    /// Per-source hit counts, keyed by indicator name.
    pub hit_counts: BTreeMap<String, u64>,
}

impl AggregateStats {
    /// Zeroed statistics, used as root stats for an empty dataset.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            group_size: 0,
            hit_fraction: 0.0,
            refusal_fraction: 0.0,
            hit_counts: BTreeMap::new(),
        }
    }
}
