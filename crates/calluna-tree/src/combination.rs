use std::fmt;

/// Canonical identity of a tree position: the ordered tuple of feature
/// values for a prefix of the ordered feature list.
///
/// A combination of length `d` identifies exactly one node at depth `d`;
/// the empty combination identifies the root. Equality is exact and
/// structural, so the builder's combination-to-node index can never merge
/// unrelated branches.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureCombination {
    values: Vec<String>,
}

impl FeatureCombination {
    /// The empty combination, identifying the root (whole population).
    #[must_use]
    pub fn root() -> Self {
        Self { values: Vec::new() }
    }

    /// Create a combination from feature values in feature-list order.
    #[must_use]
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Number of feature values, equal to the depth of the node it names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return `true` for the empty (root) combination.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the ordered feature values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Split into the parent combination (last value dropped) and the
    /// value introduced at this depth. `None` for the root.
    #[must_use]
    pub fn split_last(&self) -> Option<(FeatureCombination, &str)> {
        let (last, prefix) = self.values.split_last()?;
        Some((
            FeatureCombination {
                values: prefix.to_vec(),
            },
            last.as_str(),
        ))
    }
}

impl fmt::Display for FeatureCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.values.join(", "))
    }
}
