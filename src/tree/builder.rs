//! Filepath: src/tree/builder.rs
//!
//! Configuration of a [`RangeTree`] before construction.

use crate::aggregate::NoAggregate;
use crate::alloc::{HeapAllocator, NodeAllocator};
use crate::key::Key;
use crate::node::Node;
use crate::tracing_helpers::debug_log;
use crate::update::{NoUpdate, UpdatePolicy};

use super::{BuildError, RangeTree, TreeNode};

/// Builder for [`RangeTree`].
///
/// Each policy setter changes the corresponding type parameter, so the
/// resulting tree's capabilities are fixed at compile time:
/// `update`/`update_with` exist only with an update policy, `range_get`
/// only with an aggregate policy.
///
/// # Example
///
/// ```rust
/// use lazy_range_tree::{Aggregate, FromRange, Merge, PoolAllocator, RangeTree};
///
/// let sum: Aggregate<_, _, i64> = Aggregate::new(
///     Merge(|a: i64, b: i64| a + b),
///     FromRange(|v: &i64, begin: u32, end: u32| v * i64::from(end - begin)),
/// );
///
/// let mut tree = RangeTree::builder(0u32, 1_000, 1i64)
///     .aggregate(sum)
///     .allocator(PoolAllocator::new())
///     .build()
///     .unwrap();
///
/// tree.set(100, 200, 3);
/// assert_eq!(tree.range_get(0, 1_000), Some(900 + 300));
/// ```
#[derive(Debug, Clone)]
#[must_use = "a builder does nothing until `build` is called"]
pub struct RangeTreeBuilder<K, V, U = NoUpdate, R = NoAggregate, A = HeapAllocator> {
    begin: K,
    end: K,
    fill: V,
    outside: Option<V>,
    update: U,
    aggregate: R,
    allocator: A,
}

impl<K, V> RangeTreeBuilder<K, V> {
    /// Start configuring a tree over `[begin, end)` filled with `fill`.
    pub const fn new(begin: K, end: K, fill: V) -> Self {
        Self {
            begin,
            end,
            fill,
            outside: None,
            update: NoUpdate,
            aggregate: NoAggregate,
            allocator: HeapAllocator::new(),
        }
    }
}

impl<K, V, U, R, A> RangeTreeBuilder<K, V, U, R, A> {
    /// Value returned by `get` for keys outside `[begin, end)`.
    ///
    /// Defaults to the fill value.
    pub fn outside(mut self, value: V) -> Self {
        self.outside = Some(value);
        self
    }

    /// Set the range-update policy.
    pub fn update<U2>(self, update: U2) -> RangeTreeBuilder<K, V, U2, R, A> {
        RangeTreeBuilder {
            begin: self.begin,
            end: self.end,
            fill: self.fill,
            outside: self.outside,
            update,
            aggregate: self.aggregate,
            allocator: self.allocator,
        }
    }

    /// Set the range-aggregate policy.
    pub fn aggregate<R2>(self, aggregate: R2) -> RangeTreeBuilder<K, V, U, R2, A> {
        RangeTreeBuilder {
            begin: self.begin,
            end: self.end,
            fill: self.fill,
            outside: self.outside,
            update: self.update,
            aggregate,
            allocator: self.allocator,
        }
    }

    /// Set the node-pair allocator.
    pub fn allocator<A2>(self, allocator: A2) -> RangeTreeBuilder<K, V, U, R, A2> {
        RangeTreeBuilder {
            begin: self.begin,
            end: self.end,
            fill: self.fill,
            outside: self.outside,
            update: self.update,
            aggregate: self.aggregate,
            allocator,
        }
    }
}

impl<K, V, U, R, A> RangeTreeBuilder<K, V, U, R, A>
where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V>,
    A: NodeAllocator<TreeNode<V, U>>,
{
    /// Build the tree.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyInterval`] if `begin >= end`.
    pub fn build(self) -> Result<RangeTree<K, V, U, R, A>, BuildError<K>> {
        if self.begin >= self.end {
            return Err(BuildError::EmptyInterval {
                begin: self.begin,
                end: self.end,
            });
        }

        Ok(self.assemble())
    }

    /// Build without validating the interval.
    pub(super) fn assemble(self) -> RangeTree<K, V, U, R, A> {
        debug_log!(begin = ?self.begin, end = ?self.end, "building range tree");

        let outside = match self.outside {
            Some(outside) => outside,
            None => self.fill.clone(),
        };

        RangeTree {
            begin: self.begin,
            end: self.end,
            outside,
            root: Node::leaf(self.fill),
            update: self.update,
            aggregate: self.aggregate,
            allocator: self.allocator,
        }
    }
}
