//! Domain types for calluna-io.

use std::collections::BTreeSet;

use crate::IoError;

/// A validated run name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunName(String);

impl RunName {
    /// Parse and validate a run name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidRunName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidRunName { name });
        }
        Ok(Self(name))
    }

    /// Return the run name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Column layout of a profile dataset.
///
/// Names the ordered categorical feature columns, the two outcome
/// columns, and any per-source hit indicator columns.
#[derive(Debug, Clone)]
pub struct DatasetSchema {
    feature_columns: Vec<String>,
    hit_column: String,
    refusal_column: String,
    hit_flag_columns: Vec<String>,
}

impl DatasetSchema {
    /// Create a schema from column names.
    #[must_use]
    pub fn new(
        feature_columns: Vec<String>,
        hit_column: String,
        refusal_column: String,
        hit_flag_columns: Vec<String>,
    ) -> Self {
        Self {
            feature_columns,
            hit_column,
            refusal_column,
            hit_flag_columns,
        }
    }

    /// Return the ordered feature column names.
    #[must_use]
    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    /// Return the hit outcome column name.
    #[must_use]
    pub fn hit_column(&self) -> &str {
        &self.hit_column
    }

    /// Return the refusal outcome column name.
    #[must_use]
    pub fn refusal_column(&self) -> &str {
        &self.refusal_column
    }

    /// Return the per-source hit indicator column names.
    #[must_use]
    pub fn hit_flag_columns(&self) -> &[String] {
        &self.hit_flag_columns
    }
}

/// One source row: categorical feature values and boolean outcomes.
///
/// Feature values and hit flags are stored in schema order —
/// `features[i]` belongs to `schema.feature_columns()[i]`.
#[derive(Debug, Clone)]
pub struct Record {
    pub(crate) features: Vec<String>,
    pub(crate) hit: bool,
    pub(crate) refused: bool,
    pub(crate) hit_flags: Vec<bool>,
}

impl Record {
    /// Return the value of the feature at schema position `index`.
    #[must_use]
    pub fn feature(&self, index: usize) -> &str {
        &self.features[index]
    }

    /// Return whether this record was a hit.
    #[must_use]
    pub fn hit(&self) -> bool {
        self.hit
    }

    /// Return whether this record had a refusal outcome.
    #[must_use]
    pub fn refused(&self) -> bool {
        self.refused
    }

    /// Return the hit indicator at schema position `index`.
    #[must_use]
    pub fn hit_flag(&self, index: usize) -> bool {
        self.hit_flags[index]
    }
}

/// An in-memory profile dataset: a schema plus its records.
///
/// Produced by [`DatasetReader`](crate::DatasetReader); read-only once
/// loaded.
#[derive(Debug)]
pub struct Dataset {
    schema: DatasetSchema,
    records: Vec<Record>,
}

impl Dataset {
    pub(crate) fn new(schema: DatasetSchema, records: Vec<Record>) -> Self {
        Self { schema, records }
    }

    /// Return the dataset schema.
    #[must_use]
    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Return the records.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Return the number of records.
    #[must_use]
    pub fn n_records(&self) -> usize {
        self.records.len()
    }

    /// Return the schema position of a feature column, if present.
    #[must_use]
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.schema
            .feature_columns
            .iter()
            .position(|column| column == name)
    }

    /// Return the fraction of records flagged as hits.
    #[must_use]
    pub fn hit_fraction(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let hits = self.records.iter().filter(|r| r.hit).count();
        hits as f64 / self.records.len() as f64
    }

    /// Return the fraction of records with a refusal outcome.
    #[must_use]
    pub fn refusal_fraction(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let refusals = self.records.iter().filter(|r| r.refused).count();
        refusals as f64 / self.records.len() as f64
    }

    /// Return each feature column with its number of distinct values.
    #[must_use]
    pub fn feature_cardinalities(&self) -> Vec<(String, usize)> {
        self.schema
            .feature_columns
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let distinct: BTreeSet<&str> = self
                    .records
                    .iter()
                    .map(|r| r.feature(index))
                    .collect();
                (name.clone(), distinct.len())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_run_name() {
        let name = RunName::new("visa_2026-q1".into()).unwrap();
        assert_eq!(name.as_str(), "visa_2026-q1");
    }

    #[test]
    fn empty_run_name_rejected() {
        assert!(matches!(
            RunName::new(String::new()).unwrap_err(),
            IoError::InvalidRunName { .. }
        ));
    }

    #[test]
    fn run_name_with_slash_rejected() {
        assert!(matches!(
            RunName::new("a/b".into()).unwrap_err(),
            IoError::InvalidRunName { .. }
        ));
    }

    fn sample_dataset() -> Dataset {
        let schema = DatasetSchema::new(
            vec!["country".into(), "age_band".into()],
            "hit".into(),
            "refused".into(),
            vec!["watchlist".into()],
        );
        let records = vec![
            Record {
                features: vec!["A".into(), "young".into()],
                hit: true,
                refused: false,
                hit_flags: vec![true],
            },
            Record {
                features: vec!["A".into(), "old".into()],
                hit: false,
                refused: true,
                hit_flags: vec![false],
            },
            Record {
                features: vec!["B".into(), "old".into()],
                hit: false,
                refused: false,
                hit_flags: vec![false],
            },
        ];
        Dataset::new(schema, records)
    }

    #[test]
    fn feature_index_resolves_schema_order() {
        let ds = sample_dataset();
        assert_eq!(ds.feature_index("country"), Some(0));
        assert_eq!(ds.feature_index("age_band"), Some(1));
        assert_eq!(ds.feature_index("purpose"), None);
    }

    #[test]
    fn outcome_fractions() {
        let ds = sample_dataset();
        assert!((ds.hit_fraction() - 1.0 / 3.0).abs() < 1e-12);
        assert!((ds.refusal_fraction() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn cardinalities_count_distinct_values() {
        let ds = sample_dataset();
        assert_eq!(
            ds.feature_cardinalities(),
            vec![("country".into(), 2), ("age_band".into(), 2)]
        );
    }
}
