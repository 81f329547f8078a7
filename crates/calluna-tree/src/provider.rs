use crate::combination::FeatureCombination;
use crate::stats::AggregateStats;

/// Source of per-combination aggregate statistics, one tree layer at a time.
///
/// Implementations group the underlying dataset by the given ordered
/// feature prefix and return one row per distinct observed combination
/// with support of at least `min_group_size`; under-threshold
/// combinations are silently omitted. No ordering guarantee is required —
/// the builder imposes its own deterministic ordering before assigning
/// node ids.
///
/// An empty `features` slice aggregates the whole dataset into a single
/// row under the empty combination; the builder uses this for the root.
///
/// Aggregation may be arbitrarily expensive (e.g. out-of-process); each
/// call is synchronous and must complete before the next layer is built.
pub trait GroupedStatsProvider {
    /// Error produced by a failed aggregation; propagated unmodified.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Aggregate statistics for every qualifying combination of the
    /// given feature prefix.
    fn aggregate(
        &self,
        features: &[String],
        min_group_size: u64,
    ) -> Result<Vec<(FeatureCombination, AggregateStats)>, Self::Error>;
}
