//! Profile tree segmentation: build, prune, filter, export.
//!
//! Builds a layered, rule-based classification tree over grouped outcome
//! statistics, collapses uninformative branches to a fixed point, removes
//! profiles with too few conditions, and flattens the surviving
//! root-to-leaf paths into auditable profile records.

mod build;
mod classify;
mod combination;
mod error;
mod export;
mod filter;
mod node;
mod profile_type;
mod provider;
mod prune;
mod result;
mod stats;
mod tree;

pub use build::{ParameterSet, ProfileTreeConfig};
pub use classify::classify;
pub use combination::FeatureCombination;
pub use error::TreeError;
pub use export::{export_profiles, FeatureCondition, Profile};
pub use filter::filter_shallow_leaves;
pub use node::{NodeId, ProfileNode};
pub use profile_type::ProfileType;
pub use provider::GroupedStatsProvider;
pub use prune::prune_tree;
pub use result::{ProfileRunResult, RunMetadata};
pub use stats::AggregateStats;
pub use tree::ProfileTree;
