//! Filepath: src/tree.rs
//! `RangeTree` - a dynamically materialized range tree.
//!
//! This module provides the main [`RangeTree`] type, its builder and its
//! error type. Operations live in submodules:
//!
//! - `mutate`: `set`, `fill`, `update`, `update_with`
//! - `query`: `get`, `range_get`, `runs`

use std::error::Error as StdError;
use std::fmt as StdFmt;
use std::ops::Range;

use crate::aggregate::NoAggregate;
use crate::alloc::{AllocStats, HeapAllocator, NodeAllocator};
use crate::key::Key;
use crate::node::Node;
use crate::tracing_helpers::debug_log;
use crate::update::{NoUpdate, UpdatePolicy};

mod builder;
mod mutate;
mod query;

pub use builder::RangeTreeBuilder;
pub use query::Run;

/// Node type of a tree storing `V` under update policy `U`.
pub type TreeNode<V, U> = Node<V, <U as UpdatePolicy<V>>::Pending>;

// ============================================================================
//  BuildError
// ============================================================================

/// Errors that can occur while constructing a [`RangeTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError<K> {
    /// The key interval `[begin, end)` is empty (`begin >= end`).
    EmptyInterval {
        /// Requested first key.
        begin: K,
        /// Requested end key (exclusive).
        end: K,
    },
}

impl<K: StdFmt::Debug> StdFmt::Display for BuildError<K> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::EmptyInterval { begin, end } => {
                write!(f, "empty key interval [{begin:?}, {end:?})")
            }
        }
    }
}

impl<K: StdFmt::Debug> StdError for BuildError<K> {}

// ============================================================================
//  RangeTree
// ============================================================================

/// A range tree over the integer interval `[begin, end)`.
///
/// The tree starts as a single leaf and subdivides only where an operation
/// needs finer resolution, so memory grows with the number of distinct
/// boundaries written, not with the interval width.
///
/// # Type Parameters
///
/// - `K` - Key type (any primitive integer, see [`Key`])
/// - `V` - Value type
/// - `U` - Update policy ([`NoUpdate`], [`UnaryUpdate`](crate::UnaryUpdate)
///   or [`BinaryUpdate`](crate::BinaryUpdate))
/// - `R` - Range-aggregate policy ([`NoAggregate`] or an implementation of
///   [`RangeAggregate`](crate::RangeAggregate))
/// - `A` - Node-pair allocator
///
/// # Out-of-range keys
///
/// [`get`](Self::get) returns the tree's *outside* value for keys outside
/// `[begin, end)`. It defaults to the fill value and can be configured with
/// [`RangeTreeBuilder::outside`]. Mutations and range queries clip their
/// range to the tree's bounds.
///
/// # Example
///
/// ```rust
/// use lazy_range_tree::{BinaryUpdate, RangeTree};
///
/// let mut tree = RangeTree::builder(0u32, 42, 54i64)
///     .outside(-1)
///     .update(BinaryUpdate::new(|v: &i64, a: &i64| v + a))
///     .build()
///     .unwrap();
///
/// tree.update_with(15, 37, 18);
/// assert_eq!(tree.get(14), 54);
/// assert_eq!(tree.get(15), 72);
/// assert_eq!(tree.get(37), 54);
/// assert_eq!(tree.get(42), -1);
/// ```
pub struct RangeTree<K, V, U = NoUpdate, R = NoAggregate, A = HeapAllocator>
where
    U: UpdatePolicy<V>,
    A: NodeAllocator<TreeNode<V, U>>,
{
    /// First key covered by the tree.
    begin: K,

    /// One past the last key covered by the tree.
    end: K,

    /// Value reported for keys outside `[begin, end)`.
    outside: V,

    /// Root node, covering `[begin, end)`.
    root: TreeNode<V, U>,

    /// Range-update operator.
    update: U,

    /// Range-query initializer and combiner.
    aggregate: R,

    /// Allocator for every node pair below the root.
    allocator: A,
}

impl<K: Key, V: Clone> RangeTree<K, V> {
    /// Create a tree over `[begin, end)` with every key holding `fill`.
    ///
    /// The tree has no update or aggregate policy; use
    /// [`builder`](Self::builder) to configure them.
    ///
    /// # Panics
    ///
    /// Panics if `begin >= end`. Use [`try_new`](Self::try_new) to get an
    /// error instead.
    #[must_use]
    #[track_caller]
    pub fn new(begin: K, end: K, fill: V) -> Self {
        assert!(
            begin < end,
            "RangeTree::new: empty key interval [{begin:?}, {end:?})"
        );
        Self::builder(begin, end, fill).assemble()
    }

    /// Create a tree over `[begin, end)` with every key holding `fill`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyInterval`] if `begin >= end`.
    pub fn try_new(begin: K, end: K, fill: V) -> Result<Self, BuildError<K>> {
        Self::builder(begin, end, fill).build()
    }

    /// Start configuring a tree over `[begin, end)` filled with `fill`.
    #[must_use]
    pub const fn builder(begin: K, end: K, fill: V) -> RangeTreeBuilder<K, V> {
        RangeTreeBuilder::new(begin, end, fill)
    }
}

impl<K, V, U, R, A> RangeTree<K, V, U, R, A>
where
    K: Key,
    U: UpdatePolicy<V>,
    A: NodeAllocator<TreeNode<V, U>>,
{
    // ========================================================================
    //  Accessors
    // ========================================================================

    /// First key covered by the tree.
    #[inline]
    #[must_use]
    pub const fn begin(&self) -> K {
        self.begin
    }

    /// One past the last key covered by the tree.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> K {
        self.end
    }

    /// The covered interval as a `Range`.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Range<K> {
        self.begin..self.end
    }

    /// Check whether `key` lies inside `[begin, end)`.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.begin <= key && key < self.end
    }

    /// Value reported by [`get`](Self::get) for keys outside the tree.
    #[inline]
    #[must_use]
    pub const fn outside(&self) -> &V {
        &self.outside
    }

    /// The root node, for structural inspection.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> &TreeNode<V, U> {
        &self.root
    }

    /// The update policy.
    #[inline]
    #[must_use]
    pub const fn update_policy(&self) -> &U {
        &self.update
    }

    /// The range-aggregate policy.
    #[inline]
    #[must_use]
    pub const fn aggregate_policy(&self) -> &R {
        &self.aggregate
    }

    /// The node-pair allocator.
    #[inline]
    #[must_use]
    pub const fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Pair allocation counters of this tree's allocator.
    #[inline]
    #[must_use]
    pub fn alloc_stats(&self) -> AllocStats {
        self.allocator.stats()
    }

    // ========================================================================
    //  Shape Statistics
    // ========================================================================

    /// Number of materialized nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Number of leaves, i.e. uniformly valued pieces of the interval.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

// ============================================================================
//  Drop / Clone / Debug
// ============================================================================

impl<K, V, U, R, A> Drop for RangeTree<K, V, U, R, A>
where
    U: UpdatePolicy<V>,
    A: NodeAllocator<TreeNode<V, U>>,
{
    fn drop(&mut self) {
        // Hand every pair back to the allocator instead of letting the
        // boxes drop on their own.
        self.root.release(&mut self.allocator);
    }
}

impl<K, V, U, R, A> Clone for RangeTree<K, V, U, R, A>
where
    K: Key,
    V: Clone,
    U: UpdatePolicy<V> + Clone,
    R: Clone,
    A: NodeAllocator<TreeNode<V, U>> + Default,
{
    /// Deep-copy the tree into a fresh allocator configured like this one.
    fn clone(&self) -> Self {
        let mut allocator = self.allocator.empty_like();
        let root = self.root.duplicate(&mut allocator);

        debug_log!(nodes = root.node_count(), "cloned range tree");

        Self {
            begin: self.begin,
            end: self.end,
            outside: self.outside.clone(),
            root,
            update: self.update.clone(),
            aggregate: self.aggregate.clone(),
            allocator,
        }
    }

    /// Copy `source` into `self`, reusing `self`'s node pairs wherever the
    /// two trees have the same shape.
    fn clone_from(&mut self, source: &Self) {
        self.begin = source.begin;
        self.end = source.end;
        self.outside.clone_from(&source.outside);
        self.update.clone_from(&source.update);
        self.aggregate.clone_from(&source.aggregate);
        Node::copy_subtree(&source.root, &mut self.root, &mut self.allocator);

        debug_log!(
            nodes = self.root.node_count(),
            stats = ?self.allocator.stats(),
            "copied range tree in place"
        );
    }
}

impl<K, V, U, R, A> StdFmt::Debug for RangeTree<K, V, U, R, A>
where
    K: Key,
    V: StdFmt::Debug,
    U: UpdatePolicy<V>,
    A: NodeAllocator<TreeNode<V, U>>,
{
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("RangeTree")
            .field("begin", &self.begin)
            .field("end", &self.end)
            .field("outside", &self.outside)
            .field("nodes", &self.node_count())
            .field("leaves", &self.leaf_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
//  Tests
// ============================================================================
