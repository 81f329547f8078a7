use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::classify::classify;
use crate::combination::FeatureCombination;
use crate::error::TreeError;
use crate::export::export_profiles;
use crate::filter::filter_shallow_leaves;
use crate::node::NodeId;
use crate::provider::GroupedStatsProvider;
use crate::prune::prune_tree;
use crate::result::{ProfileRunResult, RunMetadata};
use crate::stats::AggregateStats;
use crate::tree::ProfileTree;

/// The configuration values a tree was built with.
///
/// Recorded alongside every build so profiles generated with the same
/// parameters can be grouped; opaque to the algorithm itself.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParameterSet {
    /// Ordered feature list defining grouping order and condition order.
    pub features_ordered: Vec<String>,
    /// Maximum hit percentage for the chance rule (0–100).
    pub chance_max_hit_percentage_threshold: f64,
    /// Maximum refusal percentage for the chance rule (0–100).
    pub chance_max_refusal_percentage_threshold: f64,
    /// Minimum hit percentage for the risk rule (0–100).
    pub risk_min_hit_percentage_threshold: f64,
    /// Minimum group support for a combination to become a node.
    pub minimal_groupsize: u64,
    /// Minimum number of conditions a profile must carry.
    pub min_depth_required: usize,
}

/// Configuration for profile tree generation.
///
/// Construct via [`ProfileTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter                                 | Default |
/// |-------------------------------------------|---------|
/// | `chance_max_hit_percentage_threshold`     | 5.0     |
/// | `chance_max_refusal_percentage_threshold` | 10.0    |
/// | `risk_min_hit_percentage_threshold`       | 40.0    |
/// | `minimal_groupsize`                       | 50      |
/// | `min_depth_required`                      | 3       |
#[derive(Debug, Clone)]
pub struct ProfileTreeConfig {
    pub(crate) features_ordered: Vec<String>,
    pub(crate) chance_max_hit_percentage_threshold: f64,
    pub(crate) chance_max_refusal_percentage_threshold: f64,
    pub(crate) risk_min_hit_percentage_threshold: f64,
    pub(crate) minimal_groupsize: u64,
    pub(crate) min_depth_required: usize,
}

impl ProfileTreeConfig {
    /// Create a new config with the given ordered feature list.
    ///
    /// The list defines both the grouping order during build and the
    /// condition order of exported profiles.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyFeatureList`] if `features_ordered` is empty.
    pub fn new(features_ordered: Vec<String>) -> Result<Self, TreeError> {
        if features_ordered.is_empty() {
            return Err(TreeError::EmptyFeatureList);
        }
        Ok(Self {
            features_ordered,
            chance_max_hit_percentage_threshold: 5.0,
            chance_max_refusal_percentage_threshold: 10.0,
            risk_min_hit_percentage_threshold: 40.0,
            minimal_groupsize: 50,
            min_depth_required: 3,
        })
    }

    // --- Setters ---

    /// Set the maximum hit percentage (0–100) for the chance rule.
    #[must_use]
    pub fn with_chance_max_hit_percentage(mut self, threshold: f64) -> Self {
        self.chance_max_hit_percentage_threshold = threshold;
        self
    }

    /// Set the maximum refusal percentage (0–100) for the chance rule.
    #[must_use]
    pub fn with_chance_max_refusal_percentage(mut self, threshold: f64) -> Self {
        self.chance_max_refusal_percentage_threshold = threshold;
        self
    }

    /// Set the minimum hit percentage (0–100) for the risk rule.
    #[must_use]
    pub fn with_risk_min_hit_percentage(mut self, threshold: f64) -> Self {
        self.risk_min_hit_percentage_threshold = threshold;
        self
    }

    /// Set the minimum group support for a combination to become a node.
    #[must_use]
    pub fn with_minimal_groupsize(mut self, minimal_groupsize: u64) -> Self {
        self.minimal_groupsize = minimal_groupsize;
        self
    }

    /// Set the minimum number of conditions a profile must carry.
    #[must_use]
    pub fn with_min_depth_required(mut self, min_depth_required: usize) -> Self {
        self.min_depth_required = min_depth_required;
        self
    }

    // --- Getters ---

    /// Return the ordered feature list.
    #[must_use]
    pub fn features_ordered(&self) -> &[String] {
        &self.features_ordered
    }

    /// Return the maximum hit percentage for the chance rule.
    #[must_use]
    pub fn chance_max_hit_percentage(&self) -> f64 {
        self.chance_max_hit_percentage_threshold
    }

    /// Return the maximum refusal percentage for the chance rule.
    #[must_use]
    pub fn chance_max_refusal_percentage(&self) -> f64 {
        self.chance_max_refusal_percentage_threshold
    }

    /// Return the minimum hit percentage for the risk rule.
    #[must_use]
    pub fn risk_min_hit_percentage(&self) -> f64 {
        self.risk_min_hit_percentage_threshold
    }

    /// Return the minimum group support.
    #[must_use]
    pub fn minimal_groupsize(&self) -> u64 {
        self.minimal_groupsize
    }

    /// Return the minimum number of conditions a profile must carry.
    #[must_use]
    pub fn min_depth_required(&self) -> usize {
        self.min_depth_required
    }

    /// Return the parameter set this configuration describes.
    #[must_use]
    pub fn parameter_set(&self) -> ParameterSet {
        ParameterSet {
            features_ordered: self.features_ordered.clone(),
            chance_max_hit_percentage_threshold: self.chance_max_hit_percentage_threshold,
            chance_max_refusal_percentage_threshold: self.chance_max_refusal_percentage_threshold,
            risk_min_hit_percentage_threshold: self.risk_min_hit_percentage_threshold,
            minimal_groupsize: self.minimal_groupsize,
            min_depth_required: self.min_depth_required,
        }
    }

    fn validate(&self) -> Result<(), TreeError> {
        let thresholds = [
            (
                "chance_max_hit_percentage_threshold",
                self.chance_max_hit_percentage_threshold,
            ),
            (
                "chance_max_refusal_percentage_threshold",
                self.chance_max_refusal_percentage_threshold,
            ),
            (
                "risk_min_hit_percentage_threshold",
                self.risk_min_hit_percentage_threshold,
            ),
        ];
        for (name, value) in thresholds {
            if !(0.0..=100.0).contains(&value) {
                return Err(TreeError::InvalidThreshold { name, value });
            }
        }
        if self.minimal_groupsize == 0 {
            return Err(TreeError::InvalidGroupSize {
                minimal_groupsize: self.minimal_groupsize,
            });
        }
        if self.min_depth_required == 0 {
            return Err(TreeError::InvalidMinDepth {
                min_depth_required: self.min_depth_required,
            });
        }
        Ok(())
    }

    /// Build the profile tree layer by layer.
    ///
    /// Layers are strictly sequential: parent resolution at depth `d`
    /// requires the depth-`d - 1` registry to be fully populated. Within a
    /// layer, combinations are classified and assigned sequential node ids
    /// in ascending lexicographic order of their value tuples, so two
    /// builds from identical inputs produce identical trees.
    ///
    /// # Errors
    ///
    /// | Variant                          | When                                             |
    /// |----------------------------------|--------------------------------------------------|
    /// | [`TreeError::InvalidThreshold`]  | a percentage threshold is outside [0, 100]       |
    /// | [`TreeError::InvalidGroupSize`]  | `minimal_groupsize` is zero                      |
    /// | [`TreeError::InvalidMinDepth`]   | `min_depth_required` is zero                     |
    /// | [`TreeError::Aggregation`]       | the provider fails; its error is the source      |
    /// | [`TreeError::CombinationArity`]  | a combination's length differs from its layer    |
    /// | [`TreeError::MissingParent`]     | a combination's prefix was filtered out earlier  |
    #[instrument(skip(self, provider), fields(n_features = self.features_ordered.len()))]
    pub fn build_tree<P: GroupedStatsProvider>(
        &self,
        provider: &P,
    ) -> Result<(ProfileTree, ParameterSet), TreeError> {
        self.validate()?;

        // Grouping by zero features yields the whole population in one row;
        // an empty dataset yields no row and the root keeps zeroed stats.
        let population = provider
            .aggregate(&[], 1)
            .map_err(|e| TreeError::Aggregation {
                depth: 0,
                source: Box::new(e),
            })?;
        let root_stats = population
            .into_iter()
            .next()
            .map_or_else(AggregateStats::empty, |(_, stats)| stats);

        let mut tree = ProfileTree::with_root(root_stats);
        let mut registry: HashMap<FeatureCombination, NodeId> = HashMap::new();
        registry.insert(FeatureCombination::root(), tree.root());

        for depth in 1..=self.features_ordered.len() {
            let prefix = &self.features_ordered[..depth];
            let mut rows = provider
                .aggregate(prefix, self.minimal_groupsize)
                .map_err(|e| TreeError::Aggregation {
                    depth,
                    source: Box::new(e),
                })?;
            rows.sort_by(|a, b| a.0.cmp(&b.0));
            debug!(
                depth,
                feature = %self.features_ordered[depth - 1],
                combinations = rows.len(),
                "layer aggregated"
            );

            for (combination, stats) in rows {
                if combination.len() != depth {
                    return Err(TreeError::CombinationArity {
                        depth,
                        got: combination.len(),
                    });
                }
                let profile_type = classify(
                    &stats,
                    self.chance_max_hit_percentage_threshold / 100.0,
                    self.chance_max_refusal_percentage_threshold / 100.0,
                    self.risk_min_hit_percentage_threshold / 100.0,
                );

                // The parent's identity is this combination minus the value
                // introduced at the current depth.
                let Some((parent_combination, key)) = combination.split_last() else {
                    return Err(TreeError::CombinationArity { depth, got: 0 });
                };
                let parent_id = registry.get(&parent_combination).copied().ok_or_else(|| {
                    TreeError::MissingParent {
                        depth,
                        combination: combination.to_string(),
                    }
                })?;
                let key = key.to_string();
                let node_id = tree
                    .add_child(parent_id, key, profile_type, stats)
                    .ok_or_else(|| TreeError::MissingParent {
                        depth,
                        combination: combination.to_string(),
                    })?;
                registry.insert(combination, node_id);
            }
        }

        info!(nodes = tree.node_count(), "profile tree built");
        Ok((tree, self.parameter_set()))
    }

    /// Run the full pipeline: build, prune, filter, export.
    ///
    /// # Errors
    ///
    /// Same as [`ProfileTreeConfig::build_tree`]; pruning, filtering, and
    /// export cannot fail. Zero surviving profiles is valid output.
    #[instrument(skip(self, provider))]
    pub fn generate<P: GroupedStatsProvider>(
        &self,
        provider: &P,
    ) -> Result<ProfileRunResult, TreeError> {
        let (mut tree, parameter_set) = self.build_tree(provider)?;
        let nodes_built = tree.node_count();
        let nodes_pruned = prune_tree(&mut tree, self.min_depth_required);
        let nodes_filtered = filter_shallow_leaves(&mut tree, self.min_depth_required);
        let profiles = export_profiles(&tree, &self.features_ordered);
        info!(
            nodes_built,
            nodes_pruned,
            nodes_filtered,
            n_profiles = profiles.len(),
            "profile generation complete"
        );
        let metadata = RunMetadata {
            nodes_built,
            nodes_pruned,
            nodes_filtered,
            n_profiles: profiles.len(),
        };
        Ok(ProfileRunResult::new(profiles, parameter_set, metadata))
    }
}
