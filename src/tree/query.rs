//! Filepath: src/tree/query.rs
//!
//! Point lookup, range aggregation and run enumeration.
//!
//! [`RangeTree::get`] and [`RangeTree::runs`] never restructure the tree:
//! they carry the pending updates met on the way down and apply them to
//! the leaf value, innermost first. [`RangeTree::range_get`] sifts pending
//! updates along the nodes it splits, like a mutation does.

use std::cmp::{max, min};

use crate::aggregate::RangeAggregate;
use crate::alloc::NodeAllocator;
use crate::key::{Key, clip};
use crate::node::Node;
use crate::tracing_helpers::trace_log;
use crate::update::{Pending, UpdatePolicy};

use super::{RangeTree, TreeNode};

/// The piece of the tree stored in one leaf.
///
/// Every key in `[begin, end)` maps to `value`. Neighbouring runs may hold
/// equal values; they are not merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<K, V> {
    /// First key of the run.
    pub begin: K,
    /// One past the last key of the run.
    pub end: K,
    /// Value of every key in the run.
    pub value: V,
}

impl<K, V, U, R, A> RangeTree<K, V, U, R, A>
where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V>,
    A: NodeAllocator<TreeNode<V, U>>,
{
    /// Value stored at `key`.
    ///
    /// Keys outside `[begin, end)` yield a clone of the
    /// [`outside`](Self::outside) value.
    #[must_use]
    pub fn get(&self, key: K) -> V {
        if !self.contains(key) {
            trace_log!(?key, "get outside tree bounds");
            return self.outside.clone();
        }

        get_at(&self.root, (self.begin, self.end), key, &self.update)
    }

    /// The tree's content as leaf runs in ascending key order.
    ///
    /// The runs partition `[begin, end)` exactly.
    #[must_use]
    pub fn runs(&self) -> Vec<Run<K, V>> {
        let mut out = Vec::with_capacity(self.root.leaf_count());
        let mut chain = Vec::new();
        collect_runs(
            &self.root,
            (self.begin, self.end),
            &mut chain,
            &self.update,
            &mut out,
        );
        out
    }
}

impl<K, V, U, R, A> RangeTree<K, V, U, R, A>
where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V>,
    R: RangeAggregate<K, V>,
    A: NodeAllocator<TreeNode<V, U>>,
{
    /// Aggregate of every value in `[begin, end)`.
    ///
    /// The range is clipped to the tree's bounds. Returns `None` when the
    /// clipped range is empty, since there is nothing to initialize an
    /// aggregate from.
    ///
    /// Takes `&mut self` because pending updates on the visited path are
    /// pushed down; the stored content does not change.
    pub fn range_get(&mut self, begin: K, end: K) -> Option<R::Output> {
        let target = clip(begin, end, self.begin, self.end)?;

        trace_log!(begin = ?target.0, end = ?target.1, "range_get");
        Some(range_get_at(
            &mut self.root,
            (self.begin, self.end),
            target,
            &self.update,
            &self.aggregate,
        ))
    }
}

// ============================================================================
//  Descent
// ============================================================================

fn get_at<K, V, U>(
    node: &Node<V, U::Pending>,
    (node_begin, node_end): (K, K),
    key: K,
    policy: &U,
) -> V
where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V>,
{
    let Some([left, right]) = node.children() else {
        return node.value().clone();
    };

    let mid = K::split_point(node_begin, node_end);
    let value = if key < mid {
        get_at(left, (node_begin, mid), key, policy)
    } else {
        get_at(right, (mid, node_end), key, policy)
    };

    match node.pending().peek() {
        Some(arg) => policy.apply(&value, arg),
        None => value,
    }
}

/// Append the runs below `node` to `out`.
///
/// `chain` holds the pending arguments of the ancestors, outermost first.
fn collect_runs<'a, K, V, U>(
    node: &'a Node<V, U::Pending>,
    (node_begin, node_end): (K, K),
    chain: &mut Vec<&'a U::Arg>,
    policy: &U,
    out: &mut Vec<Run<K, V>>,
) where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V>,
{
    let Some([left, right]) = node.children() else {
        let value = chain
            .iter()
            .rev()
            .fold(node.value().clone(), |value, arg| policy.apply(&value, arg));
        out.push(Run {
            begin: node_begin,
            end: node_end,
            value,
        });
        return;
    };

    let pushed = match node.pending().peek() {
        Some(arg) => {
            chain.push(arg);
            true
        }
        None => false,
    };

    let mid = K::split_point(node_begin, node_end);
    collect_runs(left, (node_begin, mid), chain, policy, out);
    collect_runs(right, (mid, node_end), chain, policy, out);

    if pushed {
        chain.pop();
    }
}

/// Aggregate `[begin, end)` below `node`, which covers
/// `[node_begin, node_end)`. The two ranges must overlap.
fn range_get_at<K, V, U, R>(
    node: &mut Node<V, U::Pending>,
    (node_begin, node_end): (K, K),
    (begin, end): (K, K),
    policy: &U,
    aggregate: &R,
) -> R::Output
where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V>,
    R: RangeAggregate<K, V>,
{
    let lo = max(begin, node_begin);
    let hi = min(end, node_end);

    if node.is_leaf() {
        return aggregate.init(node.value(), lo, hi);
    }

    node.sift(policy);
    let mid = K::split_point(node_begin, node_end);
    let [left, right] = node.children_mut();

    if end <= mid {
        return range_get_at(left, (node_begin, mid), (begin, end), policy, aggregate);
    }
    if mid <= begin {
        return range_get_at(right, (mid, node_end), (begin, end), policy, aggregate);
    }

    let left_agg = range_get_at(left, (node_begin, mid), (begin, end), policy, aggregate);
    let right_agg = range_get_at(right, (mid, node_end), (begin, end), policy, aggregate);
    aggregate.combine(left_agg, right_agg, lo, mid, hi)
}
