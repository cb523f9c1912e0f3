//! Filepath: src/update.rs
//!
//! Range-update policies.
//!
//! An update policy decides what a range update does to a leaf value and
//! how an internal node remembers an update it has not yet pushed down to
//! its children. Three policies exist:
//!
//! | Policy | Argument | Pending slot |
//! |--------|----------|--------------|
//! | [`NoUpdate`] | [`Infallible`] | `()` |
//! | [`UnaryUpdate`] | `()` | `bool` |
//! | [`BinaryUpdate`] | `A` | `Option<A>` |
//!
//! A pending slot holds at most one deferred update. Pending arguments are
//! never merged: recording a second update first pushes the older one down.

use std::convert::Infallible;
use std::fmt as StdFmt;
use std::marker::PhantomData;

// ============================================================================
//  Pending
// ============================================================================

/// Storage for a deferred update on an internal node.
pub trait Pending<A>: Default + Clone {
    /// Record `arg` as the deferred update.
    ///
    /// The slot must be empty; callers push an older update down first.
    fn stash(&mut self, arg: A);

    /// Remove and return the deferred update, leaving the slot empty.
    fn take(&mut self) -> Option<A>;

    /// Borrow the deferred update without clearing it.
    fn peek(&self) -> Option<&A>;

    /// Check whether an update is deferred.
    #[inline(always)]
    fn is_pending(&self) -> bool {
        self.peek().is_some()
    }
}

impl Pending<Infallible> for () {
    #[inline(always)]
    fn stash(&mut self, arg: Infallible) {
        match arg {}
    }

    #[inline(always)]
    fn take(&mut self) -> Option<Infallible> {
        None
    }

    #[inline(always)]
    fn peek(&self) -> Option<&Infallible> {
        None
    }
}

impl Pending<()> for bool {
    #[inline(always)]
    fn stash(&mut self, (): ()) {
        debug_assert!(!*self, "pending flag set twice without sift");
        *self = true;
    }

    #[inline(always)]
    fn take(&mut self) -> Option<()> {
        std::mem::take(self).then_some(())
    }

    #[inline(always)]
    fn peek(&self) -> Option<&()> {
        self.then_some(&())
    }
}

impl<A: Clone> Pending<A> for Option<A> {
    #[inline(always)]
    fn stash(&mut self, arg: A) {
        debug_assert!(self.is_none(), "pending argument set twice without sift");
        *self = Some(arg);
    }

    #[inline(always)]
    fn take(&mut self) -> Option<A> {
        Option::take(self)
    }

    #[inline(always)]
    fn peek(&self) -> Option<&A> {
        self.as_ref()
    }
}

// ============================================================================
//  UpdatePolicy
// ============================================================================

/// How a range update transforms values, and how it is deferred.
///
/// # Type Parameters
///
/// * `V` - The value type stored in the tree's leaves
pub trait UpdatePolicy<V> {
    /// Argument carried by one range update.
    type Arg: Clone;

    /// Per-node storage for a deferred update.
    type Pending: Pending<Self::Arg>;

    /// Compute the new leaf value from the old one.
    fn apply(&self, value: &V, arg: &Self::Arg) -> V;
}

/// Update policy for trees that only support `set`.
///
/// Its argument type is uninhabited, so range updates cannot be expressed
/// on a tree using it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoUpdate;

impl<V> UpdatePolicy<V> for NoUpdate {
    type Arg = Infallible;
    type Pending = ();

    #[inline(always)]
    fn apply(&self, _value: &V, arg: &Infallible) -> V {
        match *arg {}
    }
}

/// Update policy for a one-argument operator `V -> V` (e.g. negation).
///
/// Internal nodes keep a single pending flag.
#[derive(Clone, Copy)]
pub struct UnaryUpdate<F> {
    op: F,
}

impl<F> UnaryUpdate<F> {
    /// Wrap an operator.
    #[must_use]
    pub const fn new(op: F) -> Self {
        Self { op }
    }
}

impl<F> StdFmt::Debug for UnaryUpdate<F> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("UnaryUpdate").finish_non_exhaustive()
    }
}

impl<V, F> UpdatePolicy<V> for UnaryUpdate<F>
where
    F: Fn(&V) -> V,
{
    type Arg = ();
    type Pending = bool;

    #[inline(always)]
    fn apply(&self, value: &V, (): &()) -> V {
        (self.op)(value)
    }
}

/// Update policy for a two-argument operator `(V, A) -> V` (e.g. addition).
///
/// Internal nodes keep at most one pending argument.
pub struct BinaryUpdate<F, A> {
    op: F,
    _arg: PhantomData<fn(&A)>,
}

impl<F, A> BinaryUpdate<F, A> {
    /// Wrap an operator.
    #[must_use]
    pub const fn new(op: F) -> Self {
        Self {
            op,
            _arg: PhantomData,
        }
    }
}

impl<F: Clone, A> Clone for BinaryUpdate<F, A> {
    fn clone(&self) -> Self {
        Self::new(self.op.clone())
    }
}

impl<F, A> StdFmt::Debug for BinaryUpdate<F, A> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("BinaryUpdate")
            .field("arg", &std::any::type_name::<A>())
            .finish_non_exhaustive()
    }
}

impl<V, A, F> UpdatePolicy<V> for BinaryUpdate<F, A>
where
    A: Clone,
    F: Fn(&V, &A) -> V,
{
    type Arg = A;
    type Pending = Option<A>;

    #[inline(always)]
    fn apply(&self, value: &V, arg: &A) -> V {
        (self.op)(value, arg)
    }
}
