//! Filepath: src/key.rs
//!
//! Key types for [`RangeTree`](crate::RangeTree).
//!
//! A tree covers a half-open interval `[begin, end)` of integer keys. The
//! range covered by a node is never stored: every descent recomputes it by
//! halving the parent's range at [`Key::split_point`].

use std::fmt::Debug;

/// An integer key usable as a [`RangeTree`](crate::RangeTree) coordinate.
///
/// Implemented for every primitive integer type. The split point is computed
/// in the unsigned companion type, so intervals spanning the entire domain
/// (for example `i64::MIN..i64::MAX`) never overflow.
pub trait Key: Copy + Ord + Debug {
    /// Split point of the non-empty half-open range `[begin, end)`.
    ///
    /// Returns `begin + (end - begin) / 2`, rounded towards `begin`. For any
    /// range of width two or more the result lies strictly inside, so both
    /// `[begin, mid)` and `[mid, end)` are non-empty.
    #[must_use]
    fn split_point(begin: Self, end: Self) -> Self;
}

macro_rules! impl_key {
    ($($t:ty => $u:ty),* $(,)?) => {
        $(
            impl Key for $t {
                #[inline(always)]
                #[allow(
                    clippy::cast_possible_wrap,
                    clippy::cast_sign_loss,
                    clippy::unnecessary_cast,
                    reason = "two's complement arithmetic in the unsigned companion type"
                )]
                fn split_point(begin: Self, end: Self) -> Self {
                    let width: $u = (end as $u).wrapping_sub(begin as $u);
                    begin.wrapping_add((width / 2) as $t)
                }
            }
        )*
    };
}

impl_key! {
    u8 => u8,
    u16 => u16,
    u32 => u32,
    u64 => u64,
    u128 => u128,
    usize => usize,
    i8 => u8,
    i16 => u16,
    i32 => u32,
    i64 => u64,
    i128 => u128,
    isize => usize,
}

/// Clip `[begin, end)` to `[lo, hi)`.
///
/// Returns `None` when the intersection is empty.
#[inline]
pub(crate) fn clip<K: Key>(begin: K, end: K, lo: K, hi: K) -> Option<(K, K)> {
    let begin = begin.max(lo);
    let end = end.min(hi);

    (begin < end).then_some((begin, end))
}
