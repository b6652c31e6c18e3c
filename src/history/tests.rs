use {super::*, proptest::prelude::*};

#[test]
fn empty() {
    let history = RingHistory::<f64>::with_capacity(4);
    assert_eq!(history.latest(), 0.0);
    assert_eq!(history.last_n(4).count(), 0);
    assert!(history.is_empty());
}

#[test]
fn latest() {
    let mut history = RingHistory::with_capacity(4);
    history.push(1.5);
    history.push(2.5);
    assert_eq!(history.latest(), 2.5);
    assert_eq!(history.len(), 2);
}

#[test]
fn last_n_is_chronological() {
    let mut history = RingHistory::with_capacity(8);
    for v in [1.0, 2.0, 3.0] {
        history.push(v);
    }
    assert_eq!(history.last_n(2).collect::<Vec<_>>(), [2.0, 3.0]);
    assert_eq!(history.last_n(10).collect::<Vec<_>>(), [1.0, 2.0, 3.0]);
    assert_eq!(history.last_n(0).count(), 0);
}

#[test]
fn evicts_oldest() {
    let mut history = RingHistory::with_capacity(4);
    for v in 1..=5 {
        history.push(v as f64);
    }
    assert_eq!(history.len(), 4);
    assert_eq!(history.capacity(), 4);
    assert_eq!(history.last_n(4).collect::<Vec<_>>(), [2.0, 3.0, 4.0, 5.0]);
    assert_eq!(history.latest(), 5.0);
}

#[test]
fn zero_capacity_holds_one() {
    let mut history = RingHistory::with_capacity(0);
    history.push(7u64);
    history.push(8u64);
    assert_eq!(history.capacity(), 1);
    assert_eq!(history.last_n(3).collect::<Vec<_>>(), [8]);
}

proptest! {
    #[test]
    fn keeps_the_most_recent_window(
        capacity in 1usize..64,
        values in prop::collection::vec(0u32..1_000, 0..200),
        count in 0usize..100,
    ) {
        let mut history = RingHistory::with_capacity(capacity);
        for v in &values {
            history.push(*v);
        }

        let expected_len = count.min(values.len()).min(capacity);
        let expected = &values[values.len() - expected_len..];
        let actual = history.last_n(count).collect::<Vec<_>>();

        prop_assert_eq!(actual.as_slice(), expected);
        prop_assert_eq!(history.len(), values.len().min(capacity));
        prop_assert_eq!(history.latest(), values.last().copied().unwrap_or_default());
    }
}
