//! Filepath: src/node.rs
//!
//! Tree node for [`RangeTree`](crate::RangeTree).
//!
//! A node covers an implicit key range that its parent recomputes on every
//! descent. It is in exactly one of two states:
//!
//! - **Leaf**: holds one value, uniform over the whole covered range.
//! - **Internal**: holds a sibling pair of children (left half, right half)
//!   and possibly one pending update that the children have not seen yet.
//!
//! `is_leaf() <=> has value` at every point observable outside this module.

use crate::alloc::NodeAllocator;
use crate::tracing_helpers::trace_log;
use crate::update::{Pending, UpdatePolicy};

/// A node of a [`RangeTree`](crate::RangeTree).
///
/// # Type Parameters
///
/// * `V` - The value type stored in leaves
/// * `P` - Pending-update slot of the tree's update policy
///   ([`UpdatePolicy::Pending`])
#[derive(Debug)]
pub struct Node<V, P> {
    /// Leaf value; `None` exactly when the node is internal.
    value: Option<V>,

    /// Sibling pair; `None` exactly when the node is a leaf.
    children: Option<Box<[Self; 2]>>,

    /// Deferred update for the children. Always empty on a leaf.
    pending: P,
}

impl<V, P: Default> Node<V, P> {
    /// Create a leaf holding `value`.
    #[inline]
    #[must_use]
    pub fn leaf(value: V) -> Self {
        Self {
            value: Some(value),
            children: None,
            pending: P::default(),
        }
    }
}

impl<V, P> Node<V, P> {
    // ========================================================================
    //  Accessors
    // ========================================================================

    /// Check if this node is a leaf.
    #[inline(always)]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Try to get the leaf value, returning None for internal nodes.
    #[inline(always)]
    #[must_use]
    pub const fn try_value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Get the leaf value.
    ///
    /// # Panics
    /// Panics if this is an internal node.
    #[inline(always)]
    #[must_use]
    #[track_caller]
    #[expect(clippy::expect_used, reason = "Invariant ensured by caller")]
    pub const fn value(&self) -> &V {
        self.try_value()
            .expect("Node::value called on an internal node")
    }

    /// Try to get the children, returning None for leaves.
    #[inline(always)]
    #[must_use]
    pub fn children(&self) -> Option<&[Self; 2]> {
        self.children.as_deref()
    }

    /// The pending-update slot.
    #[inline(always)]
    #[must_use]
    pub const fn pending(&self) -> &P {
        &self.pending
    }

    /// Get both children mutably.
    ///
    /// # Panics
    /// Panics if this is a leaf.
    #[inline(always)]
    #[track_caller]
    #[expect(clippy::expect_used, reason = "Invariant ensured by caller")]
    pub(crate) fn children_mut(&mut self) -> &mut [Self; 2] {
        self.children
            .as_deref_mut()
            .expect("Node::children_mut called on a leaf")
    }

    // ========================================================================
    //  Shape Statistics
    // ========================================================================

    /// Number of nodes in this subtree, this node included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.children().map_or(1, |[left, right]| {
            1 + left.node_count() + right.node_count()
        })
    }

    /// Number of leaves in this subtree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.children()
            .map_or(1, |[left, right]| left.leaf_count() + right.leaf_count())
    }

    /// Length of the longest root-to-leaf path, counted in edges.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children()
            .map_or(0, |[left, right]| 1 + left.depth().max(right.depth()))
    }

    // ========================================================================
    //  Lifecycle
    // ========================================================================

    /// Free every pair below this node through `alloc`.
    ///
    /// Leaves the node without children and without a value; the caller
    /// restores a value (or drops the node) immediately after.
    pub(crate) fn release<A: NodeAllocator<Self>>(&mut self, alloc: &mut A) {
        if let Some(mut pair) = self.children.take() {
            let [left, right] = &mut *pair;
            left.release(alloc);
            right.release(alloc);
            alloc.dealloc_pair(pair);
        }
    }
}

impl<V, P: Default> Node<V, P> {
    /// Make this node a leaf holding `value`.
    ///
    /// An internal node frees its whole subtree and discards its pending
    /// update first.
    pub(crate) fn set_value<A: NodeAllocator<Self>>(&mut self, value: V, alloc: &mut A) {
        if !self.is_leaf() {
            trace_log!("collapsing internal node into leaf");
            self.release(alloc);
            self.pending = P::default();
        }
        self.value = Some(value);
    }
}

impl<V: Clone, P: Default> Node<V, P> {
    /// Turn this leaf into an internal node whose two children hold its
    /// value.
    ///
    /// The value is cloned once and moved once. The clone happens before
    /// anything is detached, so a panicking `Clone` leaves the leaf intact.
    ///
    /// # Panics
    /// Panics if this is an internal node.
    #[track_caller]
    pub(crate) fn init_children<A: NodeAllocator<Self>>(&mut self, alloc: &mut A) {
        assert!(self.is_leaf(), "Node::init_children called on an internal node");

        let copy = self.value().clone();
        let Some(value) = self.value.take() else {
            unreachable!("leaf without value");
        };

        trace_log!("materializing leaf into sibling pair");
        self.children = Some(alloc.alloc_pair(Self::leaf(copy), Self::leaf(value)));
    }
}

impl<V, P> Node<V, P> {
    /// Apply one range update to the whole subtree.
    ///
    /// A leaf transforms its value immediately. An internal node pushes any
    /// older pending update down to its children and then stores this one.
    pub(crate) fn update<U>(&mut self, policy: &U, arg: U::Arg)
    where
        U: UpdatePolicy<V, Pending = P>,
        P: Pending<U::Arg>,
    {
        if let Some(value) = self.value.as_mut() {
            *value = policy.apply(value, &arg);
            return;
        }

        self.sift(policy);
        self.pending.stash(arg);
    }

    /// Push the pending update, if any, down to both children.
    ///
    /// Must run before any operation reads or splits the children.
    pub(crate) fn sift<U>(&mut self, policy: &U)
    where
        U: UpdatePolicy<V, Pending = P>,
        P: Pending<U::Arg>,
    {
        let Some(arg) = self.pending.take() else {
            return;
        };

        let [left, right] = self.children_mut();
        left.update(policy, arg.clone());
        right.update(policy, arg);
    }
}

/// Returns a half-built copy to its allocator if a sibling copy unwinds.
struct ReleaseOnUnwind<'a, V, P, A: NodeAllocator<Node<V, P>>> {
    alloc: &'a mut A,
    built: Option<Node<V, P>>,
}

impl<V, P, A: NodeAllocator<Node<V, P>>> ReleaseOnUnwind<'_, V, P, A> {
    fn disarm(mut self) -> Node<V, P> {
        match self.built.take() {
            Some(node) => node,
            None => unreachable!("guard disarmed twice"),
        }
    }
}

impl<V, P, A: NodeAllocator<Node<V, P>>> Drop for ReleaseOnUnwind<'_, V, P, A> {
    fn drop(&mut self) {
        if let Some(node) = self.built.as_mut() {
            node.release(&mut *self.alloc);
        }
    }
}

impl<V: Clone, P: Clone + Default> Node<V, P> {
    /// Deep-copy this subtree, allocating every pair through `alloc`.
    ///
    /// Children are built before their parent pair is allocated, so a
    /// panicking `Clone` never leaves a partially initialized pair behind.
    /// Pairs already built for the copy are handed back to `alloc` while
    /// unwinding.
    pub(crate) fn duplicate<A: NodeAllocator<Self>>(&self, alloc: &mut A) -> Self {
        match self.children() {
            None => Self::leaf(self.value().clone()),

            Some([left, right]) => {
                let pending = self.pending.clone();
                let left = left.duplicate(alloc);

                let mut guard = ReleaseOnUnwind {
                    alloc: &mut *alloc,
                    built: Some(left),
                };
                let right = right.duplicate(&mut *guard.alloc);
                let left = guard.disarm();

                Self {
                    value: None,
                    children: Some(alloc.alloc_pair(left, right)),
                    pending,
                }
            }
        }
    }

    /// Copy `src` into `dest`, which must be a leaf that owns no pairs.
    ///
    /// # Panics
    /// Panics if `dest` is an internal node.
    #[track_caller]
    pub(crate) fn copy_to_newly_created<A: NodeAllocator<Self>>(
        src: &Self,
        dest: &mut Self,
        alloc: &mut A,
    ) {
        assert!(dest.is_leaf(), "copy destination must be a leaf");
        *dest = src.duplicate(alloc);
    }

    /// Copy `src` into `dest`, reusing `dest`'s pairs wherever both sides
    /// are internal.
    ///
    /// Where `src` is a leaf, `dest` collapses (freeing its pairs). Where
    /// `src` is internal and `dest` is a leaf, a fresh subtree is built.
    pub(crate) fn copy_subtree<A: NodeAllocator<Self>>(src: &Self, dest: &mut Self, alloc: &mut A) {
        match (src.children(), dest.is_leaf()) {
            (None, _) => dest.set_value(src.value().clone(), alloc),

            (Some(_), true) => Self::copy_to_newly_created(src, dest, alloc),

            (Some([src_left, src_right]), false) => {
                trace_log!("reusing destination pair during copy");
                let pending = src.pending.clone();
                let [dest_left, dest_right] = dest.children_mut();
                Self::copy_subtree(src_left, dest_left, alloc);
                Self::copy_subtree(src_right, dest_right, alloc);
                dest.pending = pending;
            }
        }
    }
}

// ============================================================================
//  Tests
// ============================================================================
