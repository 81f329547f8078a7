/// Errors from profile tree construction.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when the ordered feature list is empty.
    #[error("features_ordered must contain at least one feature")]
    EmptyFeatureList,

    /// Returned when a percentage threshold lies outside [0, 100].
    #[error("{name} must be within [0, 100], got {value}")]
    InvalidThreshold {
        /// Name of the offending configuration option.
        name: &'static str,
        /// The invalid value provided.
        value: f64,
    },

    /// Returned when minimal_groupsize is zero.
    #[error("minimal_groupsize must be at least 1, got {minimal_groupsize}")]
    InvalidGroupSize {
        /// The invalid minimal_groupsize value provided.
        minimal_groupsize: u64,
    },

    /// Returned when min_depth_required is zero.
    #[error("min_depth_required must be at least 1, got {min_depth_required}")]
    InvalidMinDepth {
        /// The invalid min_depth_required value provided.
        min_depth_required: usize,
    },

    /// Returned when a combination produced by the statistics provider at
    /// depth `d` has no registered parent at depth `d - 1`.
    ///
    /// The parent prefix was filtered out by the minimum-group-size
    /// threshold one layer earlier, which means the monotonic-support
    /// assumption (a combination's count cannot exceed its prefix's count)
    /// was violated or the thresholds are misconfigured. Never skipped.
    #[error(
        "build failed at depth {depth}: combination ({combination}) has no resolvable parent one layer up; \
         its prefix was filtered by minimal_groupsize, violating monotonic support"
    )]
    MissingParent {
        /// Layer at which the orphaned combination was produced.
        depth: usize,
        /// The orphaned combination's value tuple.
        combination: String,
    },

    /// Returned when the provider yields a combination whose length does
    /// not match the layer being built.
    #[error("build failed at depth {depth}: provider returned a combination of {got} values, expected {depth}")]
    CombinationArity {
        /// Layer at which the malformed combination was produced.
        depth: usize,
        /// Number of values in the malformed combination.
        got: usize,
    },

    /// Returned when the grouped statistics provider fails.
    ///
    /// The provider failure is propagated unmodified as the source; the
    /// build is aborted.
    #[error("statistics aggregation failed at depth {depth}")]
    Aggregation {
        /// Layer whose aggregation call failed.
        depth: usize,
        /// The underlying provider error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
