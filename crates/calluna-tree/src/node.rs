use std::fmt;

use crate::profile_type::ProfileType;
use crate::stats::AggregateStats;

/// Index into the profile tree arena, identifying a specific node.
///
/// Ids are assigned sequentially at creation (root = 0) and never reused,
/// so two builds from identical inputs produce identical ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node's id.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in the profile tree arena.
///
/// Children are referenced by [`NodeId`] rather than pointers; the node
/// at depth `d` corresponds to exactly one feature combination of length
/// `d`, and `key` holds the value introduced at this depth (`None` only
/// for the root).
#[derive(Debug, Clone)]
pub struct ProfileNode {
    pub(crate) depth: usize,
    pub(crate) key: Option<String>,
    pub(crate) profile_type: ProfileType,
    pub(crate) stats: AggregateStats,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl ProfileNode {
    /// Return the number of edges from the root to this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Return the feature value introduced at this depth; `None` for the root.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Return the classification assigned to this node's group.
    #[must_use]
    pub fn profile_type(&self) -> ProfileType {
        self.profile_type
    }

    /// Return the aggregate statistics of this node's group.
    #[must_use]
    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    /// Return the parent id; `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the child ids in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return `true` if this node currently has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
