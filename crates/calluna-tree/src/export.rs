use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::profile_type::ProfileType;
use crate::tree::ProfileTree;

/// One feature=value condition of a profile.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeatureCondition {
    /// Feature name from the ordered feature list.
    pub feature: String,
    /// The value this profile requires for the feature.
    pub value: String,
}

/// A flat, auditable profile: the conjunction of conditions along one
/// root-to-leaf path, with the leaf's classification and statistics.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    /// Classification of the leaf group.
    #[serde(rename = "type")]
    pub profile_type: ProfileType,
    /// Hit rate of the leaf group, as a fraction in [0, 1].
    pub hit_percentage: f64,
    /// Refusal rate of the leaf group, as a fraction in [0, 1].
    pub refusal_percentage: f64,
    /// Number of records in the leaf group.
    pub size: u64,
    /// Per-source hit counts of the leaf group.
    pub hit_counts: BTreeMap<String, u64>,
    /// Conditions in root-to-leaf order; one per path edge.
    pub features: Vec<FeatureCondition>,
}

/// Flatten every surviving root-to-leaf path into a profile record.
///
/// Each path edge is paired with the feature name at the same position in
/// the ordered feature list, so a leaf at depth `d` yields exactly `d`
/// conditions. Profiles are emitted in ascending leaf id order, which is
/// deterministic because the builder assigns ids deterministically. An
/// empty tree yields an empty vector.
#[instrument(skip(tree, features_ordered), fields(nodes = tree.node_count()))]
#[must_use]
pub fn export_profiles(tree: &ProfileTree, features_ordered: &[String]) -> Vec<Profile> {
    let mut profiles = Vec::new();

    for leaf in tree.leaves() {
        let Some(leaf_node) = tree.node(leaf) else {
            continue;
        };
        let path = tree.path_from_root(leaf);

        let mut features = Vec::with_capacity(path.len().saturating_sub(1));
        for (position, &id) in path.iter().skip(1).enumerate() {
            let Some(node) = tree.node(id) else {
                continue;
            };
            // Only the root lacks a key, and only the root lacks a
            // positional feature; neither appears past path index 0.
            let (Some(key), Some(feature)) = (node.key(), features_ordered.get(position)) else {
                continue;
            };
            features.push(FeatureCondition {
                feature: feature.clone(),
                value: key.to_string(),
            });
        }

        let stats = leaf_node.stats();
        profiles.push(Profile {
            profile_type: leaf_node.profile_type(),
            hit_percentage: stats.hit_fraction,
            refusal_percentage: stats.refusal_fraction,
            size: stats.group_size,
            hit_counts: stats.hit_counts.clone(),
            features,
        });
    }

    debug!(n_profiles = profiles.len(), "profiles exported");
    profiles
}
