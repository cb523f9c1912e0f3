//! Filepath: src/aggregate.rs
//!
//! Range-aggregate policies.
//!
//! A range query decomposes `[begin, end)` into uniformly valued pieces.
//! Each piece is turned into an aggregate by an [`Initializer`], and
//! adjacent aggregates are merged by a [`Combiner`]. Both come in a plain
//! form and a range-aware form:
//!
//! - [`Merge`]: `combine(left, right)`
//! - [`BorderMerge`]: `combine(left, right, left_begin, separation, right_end)`
//! - [`FromValue`]: `init(value)`
//! - [`FromRange`]: `init(value, begin, end)`
//!
//! [`Aggregate`] pairs a combiner with an initializer and is what a
//! [`RangeTree`](crate::RangeTree) stores. A tree built with
//! [`NoAggregate`] has no `range_get`.

use std::fmt as StdFmt;
use std::marker::PhantomData;

// ============================================================================
//  Traits
// ============================================================================

/// Merges the aggregates of two adjacent sub-ranges.
///
/// The left operand covers `[left_begin, separation)` and the right operand
/// covers `[separation, right_end)`.
pub trait Combiner<K, G> {
    /// Merge `left` and `right`.
    fn combine(&self, left: G, right: G, left_begin: K, separation: K, right_end: K) -> G;
}

/// Turns a value that is uniform over `[begin, end)` into an aggregate.
pub trait Initializer<K, V, G> {
    /// Aggregate of `value` repeated over `[begin, end)`.
    fn init(&self, value: &V, begin: K, end: K) -> G;
}

/// A complete range-aggregate policy: initializer plus combiner.
///
/// Implemented by [`Aggregate`]; implement it directly when one type
/// provides both halves.
pub trait RangeAggregate<K, V> {
    /// Aggregate result type.
    type Output;

    /// See [`Initializer::init`].
    fn init(&self, value: &V, begin: K, end: K) -> Self::Output;

    /// See [`Combiner::combine`].
    fn combine(
        &self,
        left: Self::Output,
        right: Self::Output,
        left_begin: K,
        separation: K,
        right_end: K,
    ) -> Self::Output;
}

// ============================================================================
//  Combiner Forms
// ============================================================================

/// Two-argument combiner `(G, G) -> G`; sub-range borders are ignored.
#[derive(Clone, Copy)]
pub struct Merge<F>(pub F);

impl<K, G, F> Combiner<K, G> for Merge<F>
where
    F: Fn(G, G) -> G,
{
    #[inline(always)]
    fn combine(&self, left: G, right: G, _left_begin: K, _separation: K, _right_end: K) -> G {
        (self.0)(left, right)
    }
}

/// Border-aware combiner `(G, G, K, K, K) -> G`.
///
/// Needed when the merge weighs operands by sub-range length, as an
/// average does.
#[derive(Clone, Copy)]
pub struct BorderMerge<F>(pub F);

impl<K, G, F> Combiner<K, G> for BorderMerge<F>
where
    F: Fn(G, G, K, K, K) -> G,
{
    #[inline(always)]
    fn combine(&self, left: G, right: G, left_begin: K, separation: K, right_end: K) -> G {
        (self.0)(left, right, left_begin, separation, right_end)
    }
}

// ============================================================================
//  Initializer Forms
// ============================================================================

/// One-argument initializer `&V -> G`; the range length is ignored.
#[derive(Clone, Copy)]
pub struct FromValue<F>(pub F);

impl<K, V, G, F> Initializer<K, V, G> for FromValue<F>
where
    F: Fn(&V) -> G,
{
    #[inline(always)]
    fn init(&self, value: &V, _begin: K, _end: K) -> G {
        (self.0)(value)
    }
}

/// Range-aware initializer `(&V, K, K) -> G`, e.g. `value * (end - begin)`
/// for a sum.
#[derive(Clone, Copy)]
pub struct FromRange<F>(pub F);

impl<K, V, G, F> Initializer<K, V, G> for FromRange<F>
where
    F: Fn(&V, K, K) -> G,
{
    #[inline(always)]
    fn init(&self, value: &V, begin: K, end: K) -> G {
        (self.0)(value, begin, end)
    }
}

// ============================================================================
//  Aggregate
// ============================================================================

/// A combiner and an initializer producing aggregates of type `G`.
///
/// # Example
///
/// ```rust
/// use lazy_range_tree::aggregate::{Aggregate, FromValue, Merge};
/// use lazy_range_tree::RangeTree;
///
/// let max: Aggregate<_, _, i32> =
///     Aggregate::new(Merge(|a: i32, b: i32| a.max(b)), FromValue(|v: &i32| *v));
///
/// let mut tree = RangeTree::builder(0u32, 42, 0i32).aggregate(max).build().unwrap();
/// tree.set(10, 20, 7);
/// assert_eq!(tree.range_get(0, 42), Some(7));
/// assert_eq!(tree.range_get(20, 42), Some(0));
/// ```
pub struct Aggregate<C, I, G> {
    combiner: C,
    initializer: I,
    _output: PhantomData<fn() -> G>,
}

impl<C, I, G> Aggregate<C, I, G> {
    /// Pair a combiner with an initializer.
    #[must_use]
    pub const fn new(combiner: C, initializer: I) -> Self {
        Self {
            combiner,
            initializer,
            _output: PhantomData,
        }
    }

    /// The combiner half.
    #[must_use]
    pub const fn combiner(&self) -> &C {
        &self.combiner
    }

    /// The initializer half.
    #[must_use]
    pub const fn initializer(&self) -> &I {
        &self.initializer
    }
}

impl<C: Clone, I: Clone, G> Clone for Aggregate<C, I, G> {
    fn clone(&self) -> Self {
        Self::new(self.combiner.clone(), self.initializer.clone())
    }
}

impl<C, I, G> StdFmt::Debug for Aggregate<C, I, G> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("Aggregate")
            .field("output", &std::any::type_name::<G>())
            .finish_non_exhaustive()
    }
}

impl<K, V, G, C, I> RangeAggregate<K, V> for Aggregate<C, I, G>
where
    C: Combiner<K, G>,
    I: Initializer<K, V, G>,
{
    type Output = G;

    #[inline(always)]
    fn init(&self, value: &V, begin: K, end: K) -> G {
        self.initializer.init(value, begin, end)
    }

    #[inline(always)]
    fn combine(&self, left: G, right: G, left_begin: K, separation: K, right_end: K) -> G {
        self.combiner
            .combine(left, right, left_begin, separation, right_end)
    }
}

/// Marker for trees without range queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoAggregate;
