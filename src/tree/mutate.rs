//! Filepath: src/tree/mutate.rs
//!
//! Range overwrite and range update.
//!
//! Both operations share one descent: a node whose range lies inside the
//! request is handled in O(1) (overwritten, or handed the update), a node
//! that only overlaps it is materialized or sifted and both halves are
//! visited. At most two partially overlapped nodes exist per level.

use crate::alloc::NodeAllocator;
use crate::key::{Key, clip};
use crate::node::Node;
use crate::tracing_helpers::{debug_log, trace_log};
use crate::update::UpdatePolicy;

use super::{RangeTree, TreeNode};

impl<K, V, U, R, A> RangeTree<K, V, U, R, A>
where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V>,
    A: NodeAllocator<TreeNode<V, U>>,
{
    /// Overwrite every key in `[begin, end)` with `value`.
    ///
    /// The range is clipped to the tree's bounds; an empty or disjoint
    /// range is a no-op. Subtrees lying entirely inside the range collapse
    /// into a single leaf.
    pub fn set(&mut self, begin: K, end: K, value: V) {
        let Some(target) = clip(begin, end, self.begin, self.end) else {
            debug_log!(?begin, ?end, "set outside tree bounds ignored");
            return;
        };

        trace_log!(begin = ?target.0, end = ?target.1, "set");
        set_range(
            &mut self.root,
            (self.begin, self.end),
            target,
            &value,
            &self.update,
            &mut self.allocator,
        );
    }

    /// Overwrite the whole interval with `value`, freeing every pair.
    pub fn fill(&mut self, value: V) {
        self.root.set_value(value, &mut self.allocator);
    }

    /// Apply one range update carrying `arg` to every key in `[begin, end)`.
    ///
    /// The range is clipped to the tree's bounds. Nodes lying entirely
    /// inside the range defer the update until a later operation visits
    /// their children.
    pub fn update_with(&mut self, begin: K, end: K, arg: U::Arg) {
        let Some(target) = clip(begin, end, self.begin, self.end) else {
            debug_log!(?begin, ?end, "update outside tree bounds ignored");
            return;
        };

        trace_log!(begin = ?target.0, end = ?target.1, "update");
        update_range(
            &mut self.root,
            (self.begin, self.end),
            target,
            &arg,
            &self.update,
            &mut self.allocator,
        );
    }
}

impl<K, V, U, R, A> RangeTree<K, V, U, R, A>
where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V, Arg = ()>,
    A: NodeAllocator<TreeNode<V, U>>,
{
    /// Apply the one-argument update operator to every key in
    /// `[begin, end)`.
    pub fn update(&mut self, begin: K, end: K) {
        self.update_with(begin, end, ());
    }
}

/// Prepare an overlapped node for descent and return its split point.
///
/// A leaf is materialized; an internal node pushes its pending update down.
#[inline]
fn open<K, V, U, A>(
    node: &mut Node<V, U::Pending>,
    (node_begin, node_end): (K, K),
    policy: &U,
    alloc: &mut A,
) -> K
where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V>,
    A: NodeAllocator<Node<V, U::Pending>>,
{
    if node.is_leaf() {
        node.init_children(alloc);
    } else {
        node.sift(policy);
    }

    K::split_point(node_begin, node_end)
}

/// Overwrite `[begin, end)` below `node`, which covers `[node_begin, node_end)`.
///
/// `[begin, end)` must overlap the node's range.
fn set_range<K, V, U, A>(
    node: &mut Node<V, U::Pending>,
    (node_begin, node_end): (K, K),
    (begin, end): (K, K),
    value: &V,
    policy: &U,
    alloc: &mut A,
) where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V>,
    A: NodeAllocator<Node<V, U::Pending>>,
{
    if begin <= node_begin && node_end <= end {
        node.set_value(value.clone(), alloc);
        return;
    }

    let mid = open(node, (node_begin, node_end), policy, alloc);
    let [left, right] = node.children_mut();

    if begin < mid {
        set_range(left, (node_begin, mid), (begin, end), value, policy, alloc);
    }
    if mid < end {
        set_range(right, (mid, node_end), (begin, end), value, policy, alloc);
    }
}

/// Apply `arg` to `[begin, end)` below `node`, which covers
/// `[node_begin, node_end)`.
///
/// `[begin, end)` must overlap the node's range.
fn update_range<K, V, U, A>(
    node: &mut Node<V, U::Pending>,
    (node_begin, node_end): (K, K),
    (begin, end): (K, K),
    arg: &U::Arg,
    policy: &U,
    alloc: &mut A,
) where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V>,
    A: NodeAllocator<Node<V, U::Pending>>,
{
    if begin <= node_begin && node_end <= end {
        node.update(policy, arg.clone());
        return;
    }

    let mid = open(node, (node_begin, node_end), policy, alloc);
    let [left, right] = node.children_mut();

    if begin < mid {
        update_range(left, (node_begin, mid), (begin, end), arg, policy, alloc);
    }
    if mid < end {
        update_range(right, (mid, node_end), (begin, end), arg, policy, alloc);
    }
}
