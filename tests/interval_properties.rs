//! Algebraic laws of the canonical interval set, checked over arbitrary
//! insertion sequences.

use proptest::prelude::*;

use tabalign::IntervalSet;

const DOMAIN: u32 = 120;

fn arb_ranges() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((0..DOMAIN, 0u32..16), 0..12)
}

fn build(ranges: &[(u32, u32)]) -> IntervalSet<u32> {
    let mut set = IntervalSet::new();
    for &(start, len) in ranges {
        set.add(start..start + len);
    }
    set
}

proptest! {
    #[test]
    fn insertion_order_does_not_matter(ranges in arb_ranges()) {
        let forward = build(&ranges);
        let mut reversed = ranges.clone();
        reversed.reverse();
        prop_assert_eq!(forward, build(&reversed));
    }

    #[test]
    fn add_is_idempotent(ranges in arb_ranges(), start in 0..DOMAIN, len in 1u32..16) {
        let mut once = build(&ranges);
        once.add(start..start + len);
        let mut twice = once.clone();
        twice.add(start..start + len);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn added_values_are_members(ranges in arb_ranges(), start in 0..DOMAIN, len in 1u32..16) {
        let mut set = build(&ranges);
        set.add(start..start + len);
        for value in start..start + len {
            prop_assert!(set.contains(value));
        }
    }

    #[test]
    fn canonical_form_holds_after_arbitrary_adds(ranges in arb_ranges()) {
        let set = build(&ranges);
        let intervals: Vec<_> = set.iter().collect();
        for interval in &intervals {
            prop_assert!(interval.start < interval.end);
        }
        for pair in intervals.windows(2) {
            // Strictly ordered with a gap: non-overlapping and non-abutting.
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn sum_of_sizes_counts_members(ranges in arb_ranges()) {
        let set = build(&ranges);
        let members = (0..DOMAIN + 16).filter(|&v| set.contains(v)).count() as u32;
        prop_assert_eq!(set.sum_of_sizes(), members);
    }

    #[test]
    fn complement_is_involution_within_bound(ranges in arb_ranges()) {
        let bound = 0..DOMAIN + 16;
        let original = build(&ranges);
        let mut set = original.clone();
        set.complement(bound.clone());
        set.complement(bound.clone());
        prop_assert_eq!(set, original);
    }

    #[test]
    fn complement_flips_membership_within_bound(ranges in arb_ranges()) {
        let bound = 0..DOMAIN + 16;
        let original = build(&ranges);
        let mut complemented = original.clone();
        complemented.complement(bound.clone());
        for value in bound {
            prop_assert_ne!(original.contains(value), complemented.contains(value));
        }
    }
}
