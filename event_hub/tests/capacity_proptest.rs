/// Property-based tests for the capacity indicator
///
/// These tests check the snapshot arithmetic over arbitrary capacities and
/// registration counts, including overbooked events.
use event_hub::capacity::{CapacitySnapshot, FillLevel};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_slots_remaining_is_difference(capacity in 1u32..=100_000, count in 0u32..=200_000) {
        let snapshot = CapacitySnapshot::new(capacity, count);
        prop_assert_eq!(
            snapshot.slots_remaining(),
            i64::from(capacity) - i64::from(count)
        );
    }

    #[test]
    fn test_percentage_is_clamped(capacity in 1u32..=100_000, count in 0u32..=200_000) {
        let snapshot = CapacitySnapshot::new(capacity, count);
        let expected = (f64::from(count) / f64::from(capacity) * 100.0).min(100.0);

        prop_assert!((snapshot.percentage() - expected).abs() < 1e-9);
        prop_assert!(snapshot.percentage() >= 0.0);
        prop_assert!(snapshot.percentage() <= 100.0);
    }

    #[test]
    fn test_full_iff_count_reaches_capacity(capacity in 1u32..=10_000, count in 0u32..=20_000) {
        let snapshot = CapacitySnapshot::new(capacity, count);
        prop_assert_eq!(snapshot.is_full(), count >= capacity);
    }

    #[test]
    fn test_fill_level_is_monotonic(capacity in 1u32..=10_000, a in 0u32..=20_000, b in 0u32..=20_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let lower = CapacitySnapshot::new(capacity, low).fill_level();
        let higher = CapacitySnapshot::new(capacity, high).fill_level();
        prop_assert!(lower <= higher);
    }

    #[test]
    fn test_slots_label_never_negative(capacity in 0u32..=10_000, count in 0u32..=20_000) {
        let label = CapacitySnapshot::new(capacity, count).slots_label();
        prop_assert!(!label.starts_with('-'), "label was {}", label);
    }
}

#[test]
fn test_zero_capacity_always_full() {
    for count in [0, 1, 50] {
        let snapshot = CapacitySnapshot::new(0, count);
        assert_eq!(snapshot.fill_level(), FillLevel::Full);
    }
}
