//! # `lazy-range-tree`
//!
//! A range tree over an integer key interval that materializes nodes only
//! where a write needs finer resolution.
//!
//! A fresh tree over `[begin, end)` is a single leaf holding one value for
//! every key. Writes split leaves along the binary subdivision of the
//! interval and collapse subtrees that a write covers completely, so the
//! node count tracks the number of distinct boundaries written rather than
//! the width of the interval. A 64-bit interval is as cheap to create as a
//! 42-key one.
//!
//! | Operation | Cost | Notes |
//! |-----------|------|-------|
//! | `get` | O(depth) | read-only |
//! | `set` | O(depth) | collapses covered subtrees |
//! | `update` / `update_with` | O(depth) | deferred on covered subtrees |
//! | `range_get` | O(depth) | needs an aggregate policy |
//!
//! `depth` is at most `ceil(log2(end - begin))`.
//!
//! ## Policies
//!
//! Two optional policies fix what a tree can do, at the type level:
//!
//! - An update policy ([`UnaryUpdate`] or [`BinaryUpdate`]) enables range
//!   updates. Updates on a fully covered internal node are stored there and
//!   pushed down later.
//! - An aggregate policy ([`Aggregate`]) enables `range_get`, combining
//!   per-run aggregates with an optionally range-aware combiner.
//!
//! ```rust
//! use lazy_range_tree::{Aggregate, BinaryUpdate, FromRange, Merge, RangeTree};
//!
//! let sum: Aggregate<_, _, i64> = Aggregate::new(
//!     Merge(|a: i64, b: i64| a + b),
//!     FromRange(|v: &i64, begin: u64, end: u64| v * (end - begin) as i64),
//! );
//!
//! let mut tree = RangeTree::builder(0u64, 1 << 40, 0i64)
//!     .update(BinaryUpdate::new(|v: &i64, delta: &i64| v + delta))
//!     .aggregate(sum)
//!     .build()
//!     .unwrap();
//!
//! tree.set(10, 20, 5);
//! tree.update_with(15, 30, 1);
//!
//! assert_eq!(tree.get(14), 5);
//! assert_eq!(tree.get(15), 6);
//! assert_eq!(tree.get(25), 1);
//! assert_eq!(tree.range_get(0, 100), Some(5 * 5 + 6 * 5 + 10));
//! ```
//!
//! ## Out-of-range keys
//!
//! `get` returns a configurable *outside* value for keys outside the
//! interval. Every range operation clips its range to the interval.
//!
//! ## Thread Safety
//!
//! A tree is a plain owned value: `Send`/`Sync` follow from its type
//! parameters, and every mutation takes `&mut self`.

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Accessors are tiny and sit on the descent path.
#![allow(clippy::inline_always)]

pub mod aggregate;
pub mod alloc;
pub mod key;
pub mod node;
pub mod tree;
pub mod update;

mod tracing_helpers;

// Re-export main types for convenience
pub use aggregate::{
    Aggregate, BorderMerge, Combiner, FromRange, FromValue, Initializer, Merge, NoAggregate,
    RangeAggregate,
};
pub use alloc::{AllocStats, HeapAllocator, NodeAllocator, PoolAllocator};
pub use key::Key;
pub use node::Node;
pub use tree::{BuildError, RangeTree, RangeTreeBuilder, Run, TreeNode};
pub use update::{BinaryUpdate, NoUpdate, Pending, UnaryUpdate, UpdatePolicy};
