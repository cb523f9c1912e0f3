//! Node-pair allocation for [`RangeTree`](crate::RangeTree).
//!
//! Children of an internal node are always born and freed together, so the
//! allocator works on sibling pairs. The tree routes every pair through its
//! [`NodeAllocator`]: materialization allocates, collapse and teardown free.
//!
//! Two allocators are provided:
//!
//! - [`HeapAllocator`]: one heap allocation per pair, with counters.
//! - [`PoolAllocator`]: recycles freed pairs instead of returning them to
//!   the global allocator.

use std::fmt as StdFmt;
use std::mem::MaybeUninit;
use std::ptr;

use crate::tracing_helpers::debug_log;

// ============================================================================
//  AllocStats
// ============================================================================

/// Pair allocation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Total calls to [`NodeAllocator::alloc_pair`].
    pub allocated: usize,

    /// Total calls to [`NodeAllocator::dealloc_pair`].
    pub freed: usize,

    /// Allocations served from recycled storage (subset of `allocated`).
    pub recycled: usize,
}

impl AllocStats {
    /// Pairs currently handed out.
    #[inline]
    #[must_use]
    pub const fn live(&self) -> usize {
        self.allocated - self.freed
    }
}

// ============================================================================
//  NodeAllocator
// ============================================================================

/// Trait for allocating and deallocating sibling node pairs.
///
/// # Type Parameters
///
/// * `T` - The node type; a tree instantiates it with its own
///   [`Node`](crate::node::Node) type.
///
/// # Contract
///
/// - Every pair returned by `alloc_pair` is eventually passed back to
///   `dealloc_pair` of the same allocator, or dropped with the tree during
///   unwinding.
/// - Pairs are never split: both nodes are returned together.
/// - The nodes inside a pair passed to `dealloc_pair` have already released
///   their own children.
pub trait NodeAllocator<T> {
    /// Allocate storage for a sibling pair and move `left` and `right` in.
    fn alloc_pair(&mut self, left: T, right: T) -> Box<[T; 2]>;

    /// Return a pair's storage.
    fn dealloc_pair(&mut self, pair: Box<[T; 2]>);

    /// Allocation counters.
    fn stats(&self) -> AllocStats;

    /// A new allocator with the same configuration and zeroed counters.
    ///
    /// Used when a tree is cloned; the copy gets its own allocator.
    #[must_use]
    fn empty_like(&self) -> Self
    where
        Self: Sized + Default,
    {
        Self::default()
    }
}

// ============================================================================
//  HeapAllocator
// ============================================================================

/// Allocator that boxes every pair on the global heap.
///
/// This is the default allocator of [`RangeTree`](crate::RangeTree).
#[derive(Clone, Copy, Debug, Default)]
pub struct HeapAllocator {
    stats: AllocStats,
}

impl HeapAllocator {
    /// Create an allocator with zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stats: AllocStats {
                allocated: 0,
                freed: 0,
                recycled: 0,
            },
        }
    }
}

impl<T> NodeAllocator<T> for HeapAllocator {
    #[inline]
    fn alloc_pair(&mut self, left: T, right: T) -> Box<[T; 2]> {
        self.stats.allocated += 1;
        Box::new([left, right])
    }

    #[inline]
    fn dealloc_pair(&mut self, pair: Box<[T; 2]>) {
        self.stats.freed += 1;
        drop(pair);
    }

    #[inline]
    fn stats(&self) -> AllocStats {
        self.stats
    }
}

// ============================================================================
//  PoolAllocator
// ============================================================================

/// Allocator that keeps freed pairs for reuse.
///
/// The contents of a freed pair are dropped immediately; only the storage
/// is pooled. The pool holds at most `max_pooled` pairs, surplus pairs go
/// back to the heap.
pub struct PoolAllocator<T> {
    /// Freed storage. Never holds initialized nodes.
    pool: Vec<Box<MaybeUninit<[T; 2]>>>,
    max_pooled: usize,
    stats: AllocStats,
}

impl<T> PoolAllocator<T> {
    /// Default upper bound on pooled pairs.
    pub const DEFAULT_MAX_POOLED: usize = 1 << 16;

    /// Create an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_max_pooled(Self::DEFAULT_MAX_POOLED)
    }

    /// Create an empty pool retaining at most `max_pooled` freed pairs.
    #[must_use]
    pub const fn with_max_pooled(max_pooled: usize) -> Self {
        Self {
            pool: Vec::new(),
            max_pooled,
            stats: AllocStats {
                allocated: 0,
                freed: 0,
                recycled: 0,
            },
        }
    }

    /// Number of freed pairs waiting for reuse.
    #[inline]
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    /// Release every pooled pair to the global heap.
    pub fn trim(&mut self) {
        debug_log!(pairs = self.pool.len(), "trimming pair pool");
        self.pool.clear();
        self.pool.shrink_to_fit();
    }
}

impl<T> Default for PoolAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StdFmt::Debug for PoolAllocator<T> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("PoolAllocator")
            .field("pooled", &self.pool.len())
            .field("max_pooled", &self.max_pooled)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<T> NodeAllocator<T> for PoolAllocator<T> {
    fn alloc_pair(&mut self, left: T, right: T) -> Box<[T; 2]> {
        self.stats.allocated += 1;

        match self.pool.pop() {
            Some(slot) => {
                self.stats.recycled += 1;
                Box::write(slot, [left, right])
            }

            None => Box::new([left, right]),
        }
    }

    fn dealloc_pair(&mut self, pair: Box<[T; 2]>) {
        self.stats.freed += 1;

        if self.pool.len() >= self.max_pooled {
            drop(pair);
            return;
        }

        let raw = Box::into_raw(pair);
        // SAFETY: `raw` comes from `Box::into_raw`, so it is valid, aligned
        // and initialized. The nodes are dropped exactly once here and the
        // allocation is then owned again as uninitialized storage, whose
        // layout `MaybeUninit` guarantees to match.
        let slot = unsafe {
            ptr::drop_in_place(raw);
            Box::from_raw(raw.cast::<MaybeUninit<[T; 2]>>())
        };
        self.pool.push(slot);
    }

    fn empty_like(&self) -> Self {
        Self::with_max_pooled(self.max_pooled)
    }

    #[inline]
    fn stats(&self) -> AllocStats {
        self.stats
    }
}

// ============================================================================
//  Tests
// ============================================================================
