//! End-to-end scenarios for `RangeTree`.
//!
//! Small, fixed workloads with hand-computed answers, one per policy
//! combination.

#![expect(clippy::unwrap_used, reason = "fail fast in tests")]

mod common;

use lazy_range_tree::{
    Aggregate, BinaryUpdate, BorderMerge, BuildError, FromRange, FromValue, Merge, PoolAllocator,
    RangeTree, Run, UnaryUpdate,
};

// ============================================================================
//  Plain Trees
// ============================================================================

#[test]
fn scenario_fresh_tree() {
    common::init_tracing();

    let tree = RangeTree::new(0u32, 42, 54i32);

    assert_eq!(tree.get(0), 54);
    assert_eq!(tree.get(41), 54);
    assert_eq!(tree.get(42), 54);
    assert_eq!(tree.node_count(), 1);
}

#[test]
fn scenario_outside_value() {
    let tree = RangeTree::builder(0u32, 42, 54i32)
        .outside(i32::MIN)
        .build()
        .unwrap();

    assert_eq!(tree.get(42), i32::MIN);
    assert_eq!(tree.get(u32::MAX), i32::MIN);
    assert_eq!(tree.get(0), 54);
}

#[test]
fn scenario_empty_interval() {
    let err = RangeTree::try_new(5i8, 5, ()).unwrap_err();

    assert_eq!(err, BuildError::EmptyInterval { begin: 5, end: 5 });
    assert_eq!(err.to_string(), "empty key interval [5, 5)");
}

#[test]
fn scenario_string_values() {
    let mut tree = RangeTree::new(0u16, 10, String::from("-"));
    tree.set(2, 5, "a".into());
    tree.set(4, 8, "b".into());

    let runs = tree.runs();
    let text: String = (0..10).map(|k| tree.get(k)).collect();
    assert_eq!(text, "--aabbbb--");
    assert_eq!(
        runs.iter().map(|r| r.end - r.begin).sum::<u16>(),
        10,
        "{runs:?}"
    );
}

// ============================================================================
//  Updates
// ============================================================================

#[test]
fn scenario_binary_update() {
    common::init_tracing();

    let mut tree = RangeTree::builder(0u32, 42, 54i64)
        .update(BinaryUpdate::new(|v: &i64, a: &i64| v + a))
        .build()
        .unwrap();

    tree.update_with(15, 37, 18);

    assert_eq!(tree.get(5), 54);
    assert_eq!(tree.get(15), 72);
    assert_eq!(tree.get(36), 72);
    assert_eq!(tree.get(37), 54);
}

#[test]
fn scenario_unary_toggle() {
    let mut tree = RangeTree::builder(0u8, 200, false)
        .update(UnaryUpdate::new(|v: &bool| !v))
        .build()
        .unwrap();

    tree.update(0, 100);
    tree.update(50, 150);
    tree.update(0, 200);
    tree.update(0, 200);

    assert!(tree.get(0));
    assert!(!tree.get(50));
    assert!(!tree.get(99));
    assert!(tree.get(100));
    assert!(tree.get(149));
    assert!(!tree.get(150));
}

#[test]
fn scenario_affine_updates() {
    // (scale, offset) applied as v * scale + offset; order matters.
    let mut tree = RangeTree::builder(0i32, 16, 1i64)
        .update(BinaryUpdate::new(|v: &i64, (mul, add): &(i64, i64)| v * mul + add))
        .build()
        .unwrap();

    tree.set(0, 1, 0);
    tree.update_with(0, 8, (2, 0));
    tree.update_with(0, 16, (1, 3));
    tree.update_with(4, 12, (10, 0));

    assert_eq!(tree.get(0), 3);
    assert_eq!(tree.get(1), 5);
    assert_eq!(tree.get(4), 50);
    assert_eq!(tree.get(8), 40);
    assert_eq!(tree.get(12), 4);
}

// ============================================================================
//  Aggregates
// ============================================================================

#[test]
fn scenario_average() {
    let avg: Aggregate<_, _, f64> = Aggregate::new(
        BorderMerge(|l: f64, r: f64, lb: u32, sep: u32, re: u32| {
            let (lw, rw) = (f64::from(sep - lb), f64::from(re - sep));
            (l * lw + r * rw) / (lw + rw)
        }),
        FromValue(|v: &f64| *v),
    );
    let mut tree = RangeTree::builder(0u32, 6, 42.0)
        .aggregate(avg)
        .build()
        .unwrap();

    tree.set(4, 6, 37.0);

    let got = tree.range_get(0, 6).unwrap();
    let want = (37.0 + 42.0 * 2.0) / 3.0;
    assert!((got - want).abs() < 1e-12, "got {got}, want {want}");
}

#[test]
fn scenario_sum_overwrite() {
    let sum: Aggregate<_, _, i64> = Aggregate::new(
        Merge(|a: i64, b: i64| a + b),
        FromRange(|v: &i64, b: u32, e: u32| v * i64::from(e - b)),
    );
    let mut tree = RangeTree::builder(0u32, 42, 21i64)
        .aggregate(sum)
        .build()
        .unwrap();

    tree.set(0, 37, 73);
    tree.set(0, 37, 37);

    assert_eq!(tree.get(0), 37);
    assert_eq!(tree.get(40), 21);
    assert_eq!(tree.range_get(0, 42), Some(37 * 37 + 21 * 5));
}

#[test]
fn scenario_max_ladder() {
    common::init_tracing();

    let highest: Aggregate<_, _, u32> =
        Aggregate::new(Merge(u32::max), FromValue(|v: &u32| *v));
    let mut tree = RangeTree::builder(0u32, 42, 0u32)
        .aggregate(highest)
        .allocator(PoolAllocator::new())
        .build()
        .unwrap();

    // Steps [34, 42), [35, 42), ..., [41, 42) holding 1, 2, ..., 8.
    for step in 0..8 {
        tree.set(34 + step, 42, step + 1);
    }

    assert_eq!(tree.range_get(0, 42), Some(8));
    assert_eq!(tree.range_get(0, 34), Some(0));
    assert_eq!(tree.range_get(0, 38), Some(4));
    assert_eq!(tree.range_get(36, 40), Some(6));
    assert_eq!(tree.range_get(41, 42), Some(8));
    assert_eq!(tree.range_get(42, 50), None);

    let steps: Vec<_> = tree.runs().into_iter().filter(|r| r.begin >= 34).collect();
    assert_eq!(steps.len(), 8);
    assert_eq!(
        steps.last(),
        Some(&Run {
            begin: 41,
            end: 42,
            value: 8
        })
    );
}

#[test]
fn scenario_update_and_aggregate() {
    let sum: Aggregate<_, _, i64> = Aggregate::new(
        Merge(|a: i64, b: i64| a + b),
        FromRange(|v: &i64, b: i64, e: i64| v * (e - b)),
    );
    let mut tree = RangeTree::builder(i64::MIN, i64::MAX, 0i64)
        .update(BinaryUpdate::new(|v: &i64, a: &i64| v + a))
        .aggregate(sum)
        .build()
        .unwrap();

    tree.update_with(-1_000, 1_000, 1);
    tree.set(-10, 10, 5);
    tree.update_with(0, 2_000, 2);

    let want = 990 + 10 * 5 + 10 * 7 + 990 * 3 + 1_000 * 2;
    assert_eq!(tree.range_get(-1_000, 2_000), Some(want));
    assert_eq!(tree.get(-11), 1);
    assert_eq!(tree.get(9), 7);
    assert_eq!(tree.get(1_000), 2);
    assert_eq!(tree.get(i64::MIN), 0);
    assert!(tree.depth() <= 64);
}

// ============================================================================
//  Copies
// ============================================================================

#[test]
fn scenario_clone_and_clone_from() {
    let mut a = RangeTree::builder(0u64, 1 << 20, 0i32)
        .update(BinaryUpdate::new(|v: &i32, d: &i32| v + d))
        .allocator(PoolAllocator::new())
        .build()
        .unwrap();
    a.set(100, 200, 1);
    a.update_with(150, 1_000, 10);

    let b = a.clone();
    a.fill(-1);

    assert_eq!(b.get(120), 1);
    assert_eq!(b.get(170), 11);
    assert_eq!(b.get(500), 10);
    assert_eq!(a.get(170), -1);

    a.clone_from(&b);
    assert_eq!(a.runs(), b.runs());
    assert!(a.alloc_stats().recycled > 0);
}
