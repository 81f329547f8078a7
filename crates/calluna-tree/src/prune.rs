use tracing::{debug, instrument};

use crate::node::NodeId;
use crate::profile_type::ProfileType;
use crate::tree::ProfileTree;

/// Collapse branches that add no discriminating information, to a fixed
/// point. Returns the number of nodes removed.
///
/// Each pass removes every leaf classified `inbetween`, then collapses
/// homogeneous sibling leaves into their parent: when a parent of depth at
/// least `min_depth_required` has only leaf children and every child
/// carries the parent's own profile type, the children are removed and the
/// parent becomes the leaf carrying the same information more concisely.
/// Passes repeat until one removes nothing.
///
/// Terminates because the node count strictly decreases on every looping
/// pass and is bounded below by the root. Idempotent: a second call on the
/// result removes nothing.
#[instrument(skip(tree), fields(nodes = tree.node_count()))]
pub fn prune_tree(tree: &mut ProfileTree, min_depth_required: usize) -> usize {
    let mut removed_total = 0;
    let mut last_pass_clear = false;

    while !last_pass_clear {
        last_pass_clear = true;

        // Uninformative leaves never become profiles.
        for leaf in tree.leaves() {
            let uninformative = tree
                .node(leaf)
                .is_some_and(|n| n.profile_type() == ProfileType::Inbetween);
            if uninformative && tree.remove_leaf(leaf) {
                removed_total += 1;
                last_pass_clear = false;
            }
        }

        // Parents of the recomputed leaf set are collapse candidates.
        let mut parents: Vec<NodeId> = tree
            .leaves()
            .iter()
            .filter_map(|&leaf| tree.node(leaf).and_then(|n| n.parent()))
            .collect();
        parents.sort_unstable();
        parents.dedup();

        for parent_id in parents {
            let Some(parent) = tree.node(parent_id) else {
                continue;
            };
            if parent.depth() < min_depth_required {
                continue;
            }
            let parent_type = parent.profile_type();
            let children = parent.children().to_vec();

            // Collapsing is only safe when every child is a leaf, and only
            // useful when they all repeat the parent's own type.
            let homogeneous = !children.is_empty()
                && children.iter().all(|&child| {
                    tree.node(child)
                        .is_some_and(|n| n.is_leaf() && n.profile_type() == parent_type)
                });
            if !homogeneous {
                continue;
            }

            for child in children {
                if tree.remove_leaf(child) {
                    removed_total += 1;
                    last_pass_clear = false;
                }
            }
        }
    }

    debug!(removed = removed_total, "pruning reached a fixed point");
    removed_total
}
