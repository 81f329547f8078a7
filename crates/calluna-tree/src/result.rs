//! Result types for a full profile generation run.

use crate::build::ParameterSet;
use crate::export::Profile;

/// Per-stage counters for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RunMetadata {
    /// Nodes in the tree when the build finished.
    pub nodes_built: usize,
    /// Nodes removed by pruning.
    pub nodes_pruned: usize,
    /// Nodes removed by the depth filter.
    pub nodes_filtered: usize,
    /// Profiles exported from the surviving tree.
    pub n_profiles: usize,
}

/// Result of a full build → prune → filter → export run.
#[derive(Debug, Clone)]
pub struct ProfileRunResult {
    profiles: Vec<Profile>,
    parameter_set: ParameterSet,
    metadata: RunMetadata,
}

impl ProfileRunResult {
    pub(crate) fn new(
        profiles: Vec<Profile>,
        parameter_set: ParameterSet,
        metadata: RunMetadata,
    ) -> Self {
        Self {
            profiles,
            parameter_set,
            metadata,
        }
    }

    /// Return the exported profiles, indexed in export order.
    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Consume the result and return the exported profiles.
    #[must_use]
    pub fn into_profiles(self) -> Vec<Profile> {
        self.profiles
    }

    /// Return the parameter set the run was configured with.
    #[must_use]
    pub fn parameter_set(&self) -> &ParameterSet {
        &self.parameter_set
    }

    /// Return the per-stage counters.
    #[must_use]
    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }
}
