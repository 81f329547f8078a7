//! In-memory grouped statistics over a loaded dataset.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, instrument};

use calluna_tree::{AggregateStats, FeatureCombination, GroupedStatsProvider};

use crate::domain::{Dataset, Record};
use crate::IoError;

/// [`GroupedStatsProvider`] backed by an in-memory [`Dataset`].
///
/// Each aggregation call makes one pass over the records, grouping them
/// by the value tuple of the requested feature prefix. Stands in for an
/// out-of-process aggregation engine; the tree builder does not care
/// which it talks to.
pub struct DatasetProvider<'a> {
    dataset: &'a Dataset,
}

impl<'a> DatasetProvider<'a> {
    /// Create a provider over the given dataset.
    #[must_use]
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }
}

#[derive(Debug, Default)]
struct GroupAccumulator {
    count: u64,
    hits: u64,
    refusals: u64,
    flag_hits: Vec<u64>,
}

impl GroupAccumulator {
    fn new(n_flags: usize) -> Self {
        Self {
            flag_hits: vec![0; n_flags],
            ..Self::default()
        }
    }

    fn add(&mut self, record: &Record) {
        self.count += 1;
        if record.hit() {
            self.hits += 1;
        }
        if record.refused() {
            self.refusals += 1;
        }
        for (index, sum) in self.flag_hits.iter_mut().enumerate() {
            if record.hit_flag(index) {
                *sum += 1;
            }
        }
    }

    fn into_stats(self, flag_names: &[String]) -> AggregateStats {
        let total = self.count as f64;
        AggregateStats {
            group_size: self.count,
            hit_fraction: self.hits as f64 / total,
            refusal_fraction: self.refusals as f64 / total,
            hit_counts: flag_names
                .iter()
                .cloned()
                .zip(self.flag_hits)
                .collect::<BTreeMap<String, u64>>(),
        }
    }
}

impl GroupedStatsProvider for DatasetProvider<'_> {
    type Error = IoError;

    /// Aggregate one row per distinct combination of the given feature
    /// prefix with support of at least `min_group_size`; an empty prefix
    /// aggregates the whole dataset under the empty combination.
    #[instrument(skip(self), fields(n_records = self.dataset.n_records()))]
    fn aggregate(
        &self,
        features: &[String],
        min_group_size: u64,
    ) -> Result<Vec<(FeatureCombination, AggregateStats)>, IoError> {
        let indices: Vec<usize> = features
            .iter()
            .map(|name| {
                self.dataset
                    .feature_index(name)
                    .ok_or_else(|| IoError::UnknownFeature { name: name.clone() })
            })
            .collect::<Result<_, _>>()?;
        let flag_names = self.dataset.schema().hit_flag_columns();

        let mut groups: HashMap<Vec<String>, GroupAccumulator> = HashMap::new();
        for record in self.dataset.records() {
            let key: Vec<String> = indices
                .iter()
                .map(|&i| record.feature(i).to_string())
                .collect();
            groups
                .entry(key)
                .or_insert_with(|| GroupAccumulator::new(flag_names.len()))
                .add(record);
        }

        let n_observed = groups.len();
        let rows: Vec<(FeatureCombination, AggregateStats)> = groups
            .into_iter()
            .filter(|(_, acc)| acc.count >= min_group_size)
            .map(|(values, acc)| {
                (
                    FeatureCombination::new(values),
                    acc.into_stats(flag_names),
                )
            })
            .collect();

        debug!(
            n_observed,
            n_qualifying = rows.len(),
            min_group_size,
            "combinations aggregated"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DatasetSchema;

    fn record(country: &str, age: &str, hit: bool, refused: bool, watchlist: bool) -> Record {
        Record {
            features: vec![country.to_string(), age.to_string()],
            hit,
            refused,
            hit_flags: vec![watchlist],
        }
    }

    fn dataset() -> Dataset {
        let schema = DatasetSchema::new(
            vec!["country".into(), "age_band".into()],
            "hit".into(),
            "refused".into(),
            vec!["watchlist".into()],
        );
        let mut records = Vec::new();
        // country=A, age_band=young: 4 records, 1 hit, 2 refusals, 1 flag
        records.push(record("A", "young", true, false, true));
        records.push(record("A", "young", false, true, false));
        records.push(record("A", "young", false, true, false));
        records.push(record("A", "young", false, false, false));
        // country=A, age_band=old: 2 records, 2 hits
        records.push(record("A", "old", true, false, true));
        records.push(record("A", "old", true, false, true));
        // country=B, age_band=old: 1 record
        records.push(record("B", "old", false, false, false));
        Dataset::new(schema, records)
    }

    fn combo(values: &[&str]) -> FeatureCombination {
        FeatureCombination::new(values.iter().map(|v| v.to_string()).collect())
    }

    fn sorted(
        mut rows: Vec<(FeatureCombination, AggregateStats)>,
    ) -> Vec<(FeatureCombination, AggregateStats)> {
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }

    #[test]
    fn empty_prefix_aggregates_whole_dataset() {
        let ds = dataset();
        let rows = DatasetProvider::new(&ds).aggregate(&[], 1).unwrap();
        assert_eq!(rows.len(), 1);
        let (combination, stats) = &rows[0];
        assert!(combination.is_empty());
        assert_eq!(stats.group_size, 7);
        assert!((stats.hit_fraction - 3.0 / 7.0).abs() < 1e-12);
        assert!((stats.refusal_fraction - 2.0 / 7.0).abs() < 1e-12);
        assert_eq!(stats.hit_counts.get("watchlist"), Some(&3));
    }

    #[test]
    fn one_row_per_distinct_combination() {
        let ds = dataset();
        let rows = sorted(
            DatasetProvider::new(&ds)
                .aggregate(&["country".into(), "age_band".into()], 1)
                .unwrap(),
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].0, combo(&["A", "old"]));
        assert_eq!(rows[1].0, combo(&["A", "young"]));
        assert_eq!(rows[2].0, combo(&["B", "old"]));

        let (_, young) = &rows[1];
        assert_eq!(young.group_size, 4);
        assert!((young.hit_fraction - 0.25).abs() < 1e-12);
        assert!((young.refusal_fraction - 0.5).abs() < 1e-12);
        assert_eq!(young.hit_counts.get("watchlist"), Some(&1));
    }

    #[test]
    fn prefix_grouping_merges_deeper_values() {
        let ds = dataset();
        let rows = sorted(
            DatasetProvider::new(&ds)
                .aggregate(&["country".into()], 1)
                .unwrap(),
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, combo(&["A"]));
        assert_eq!(rows[0].1.group_size, 6);
        assert_eq!(rows[1].0, combo(&["B"]));
        assert_eq!(rows[1].1.group_size, 1);
    }

    #[test]
    fn undersized_groups_are_omitted() {
        let ds = dataset();
        let rows = sorted(
            DatasetProvider::new(&ds)
                .aggregate(&["country".into(), "age_band".into()], 3)
                .unwrap(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, combo(&["A", "young"]));
    }

    #[test]
    fn unknown_feature_error() {
        let ds = dataset();
        let err = DatasetProvider::new(&ds)
            .aggregate(&["purpose".into()], 1)
            .unwrap_err();
        match err {
            IoError::UnknownFeature { name } => assert_eq!(name, "purpose"),
            other => panic!("expected UnknownFeature, got {other:?}"),
        }
    }
}
