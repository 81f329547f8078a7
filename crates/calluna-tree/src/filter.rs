use tracing::{debug, instrument};

use crate::tree::ProfileTree;

/// Remove every profile with fewer than `min_depth_required` conditions.
/// Returns the number of nodes removed.
///
/// A leaf at depth `d` describes a profile of `d` conditions (its
/// root-to-leaf path has `d + 1` nodes). For each leaf below the minimum,
/// the path is unwound from the leaf toward the root, removing each node
/// only while it is currently childless: the walk stops at the first
/// ancestor that still carries another branch, so prefixes shared with a
/// surviving deeper profile are never destroyed. The root is never
/// removed.
#[instrument(skip(tree), fields(nodes = tree.node_count()))]
pub fn filter_shallow_leaves(tree: &mut ProfileTree, min_depth_required: usize) -> usize {
    let mut removed = 0;

    for leaf in tree.leaves() {
        let Some(node) = tree.node(leaf) else {
            // Already unwound as part of an earlier shallow path.
            continue;
        };
        if node.depth() >= min_depth_required {
            continue;
        }

        let mut current = Some(leaf);
        while let Some(id) = current {
            if id == tree.root() {
                break;
            }
            let Some(node) = tree.node(id) else {
                break;
            };
            if !node.is_leaf() {
                break;
            }
            let parent = node.parent();
            if tree.remove_leaf(id) {
                removed += 1;
            }
            current = parent;
        }
    }

    debug!(removed, min_depth_required, "shallow profiles filtered");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;
    use crate::profile_type::ProfileType;
    use crate::stats::AggregateStats;

    fn child(tree: &mut ProfileTree, parent: NodeId, key: &str) -> NodeId {
        tree.add_child(
            parent,
            key.to_string(),
            ProfileType::Risk,
            AggregateStats::empty(),
        )
        .unwrap()
    }

    #[test]
    fn deep_enough_profiles_survive() {
        let mut tree = ProfileTree::with_root(AggregateStats::empty());
        let a = child(&mut tree, NodeId::ROOT, "a");
        let b = child(&mut tree, a, "b");
        let c = child(&mut tree, b, "c");

        assert_eq!(filter_shallow_leaves(&mut tree, 3), 0);
        assert_eq!(tree.leaves(), vec![c]);
    }

    #[test]
    fn shallow_profile_is_unwound_to_the_root() {
        // Path of two nodes including the root, minimum depth three: the
        // leaf goes, then its now-childless parent, then the walk stops at
        // the root.
        let mut tree = ProfileTree::with_root(AggregateStats::empty());
        let a = child(&mut tree, NodeId::ROOT, "a");
        child(&mut tree, a, "b");

        assert_eq!(filter_shallow_leaves(&mut tree, 3), 2);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.contains(tree.root()));
    }

    #[test]
    fn shared_prefix_with_deeper_profile_is_preserved() {
        // a has a shallow leaf child and a deep branch: removing the
        // shallow leaf must stop at a.
        let mut tree = ProfileTree::with_root(AggregateStats::empty());
        let a = child(&mut tree, NodeId::ROOT, "a");
        let shallow = child(&mut tree, a, "shallow");
        let b = child(&mut tree, a, "b");
        let deep = child(&mut tree, b, "deep");

        assert_eq!(filter_shallow_leaves(&mut tree, 3), 1);
        assert!(!tree.contains(shallow));
        assert!(tree.contains(a));
        assert!(tree.contains(b));
        assert_eq!(tree.leaves(), vec![deep]);
    }

    #[test]
    fn never_removes_a_node_that_still_has_children() {
        let mut tree = ProfileTree::with_root(AggregateStats::empty());
        let a = child(&mut tree, NodeId::ROOT, "a");
        child(&mut tree, a, "x");
        child(&mut tree, a, "y");
        let b = child(&mut tree, a, "b");
        child(&mut tree, b, "deep");

        // x and y are shallow; a keeps its surviving branch through b.
        assert_eq!(filter_shallow_leaves(&mut tree, 3), 2);
        assert_eq!(tree.node(a).unwrap().children(), &[b]);
    }

    #[test]
    fn sibling_shallow_leaves_cascade_once_the_last_one_goes() {
        // Two shallow leaves under the same parent: the first removal
        // stops at the parent (a sibling remains), the second takes the
        // parent down as well.
        let mut tree = ProfileTree::with_root(AggregateStats::empty());
        let a = child(&mut tree, NodeId::ROOT, "a");
        child(&mut tree, a, "x");
        child(&mut tree, a, "y");

        assert_eq!(filter_shallow_leaves(&mut tree, 3), 3);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn boundary_depth_counts_as_too_shallow() {
        // A leaf at exactly min_depth - 1 is removed; one at min_depth
        // survives.
        let mut tree = ProfileTree::with_root(AggregateStats::empty());
        let a = child(&mut tree, NodeId::ROOT, "a");
        let b = child(&mut tree, a, "b");
        let surviving = child(&mut tree, b, "c");
        let other = child(&mut tree, NodeId::ROOT, "z");
        let shallow = child(&mut tree, other, "y");

        assert_eq!(filter_shallow_leaves(&mut tree, 3), 2);
        assert!(!tree.contains(shallow));
        assert!(!tree.contains(other));
        assert_eq!(tree.leaves(), vec![surviving]);
    }
}
