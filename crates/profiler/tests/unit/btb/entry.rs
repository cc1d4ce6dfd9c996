//! Tagged BTB Entry Tests.
//!
//! Verifies retirement counting, the occupancy histogram, derived fractions
//! and entry merging.

use divprof_core::btb::{BranchKey, BranchTag, BtbEntry};
use divprof_core::common::{CodeAddr, ProfileError};
use rstest::rstest;

fn entry(width: usize) -> BtbEntry {
    BtbEntry::new(BranchTag::Extrinsic, BranchKey::new(0x100u64, 0x200u64), width)
}

// ══════════════════════════════════════════════════════════
// 1. Fresh entries
// ══════════════════════════════════════════════════════════

#[test]
fn new_entry_is_zeroed() {
    let e = entry(32);
    assert_eq!(e.tag(), BranchTag::Extrinsic);
    assert_eq!(e.source(), CodeAddr(0x100));
    assert_eq!(e.target(), CodeAddr(0x200));
    assert_eq!(e.instances(), 0);
    assert_eq!(e.taken_count(), 0);
    assert_eq!(e.occupancy(), &[0u64; 33][..]);
    assert_eq!(e.dynamic_instruction_count(), 0);
}

#[test]
fn fractions_undefined_without_instances() {
    let e = entry(32);
    assert!(e.taken_fraction().is_nan());
    assert!(e.occupancy_fraction().is_nan());
}

// ══════════════════════════════════════════════════════════
// 2. Updates
// ══════════════════════════════════════════════════════════

#[test]
fn taken_then_not_taken_full_warp() {
    let mut e = entry(32);
    e.update_branch(true);
    e.update_branch(false);
    e.update_occupancy(32).unwrap();
    e.update_occupancy(32).unwrap();

    assert_eq!(e.instances(), 2);
    assert_eq!(e.taken_count(), 1);
    assert_eq!(e.taken_fraction(), 0.5);
    assert_eq!(e.occupancy()[32], 2);
    assert_eq!(e.dynamic_instruction_count(), 2);
    assert_eq!(e.occupancy_fraction(), 1.0);
}

#[rstest]
#[case(3, 1, 0.75)]
#[case(0, 4, 0.0)]
#[case(5, 0, 1.0)]
#[case(1, 3, 0.25)]
fn taken_fraction_ratio(#[case] taken: usize, #[case] not_taken: usize, #[case] expected: f64) {
    let mut e = entry(32);
    for _ in 0..taken {
        e.update_branch(true);
    }
    for _ in 0..not_taken {
        e.update_branch(false);
    }
    assert_eq!(e.taken_fraction(), expected);
}

#[test]
fn occupancy_zero_and_full_are_valid() {
    let mut e = entry(8);
    e.update_occupancy(0).unwrap();
    e.update_occupancy(8).unwrap();
    assert_eq!(e.occupancy()[0], 1);
    assert_eq!(e.occupancy()[8], 1);
}

#[test]
fn occupancy_above_width_is_rejected() {
    let mut e = entry(8);
    assert_eq!(
        e.update_occupancy(9),
        Err(ProfileError::OccupancyOutOfRange { count: 9, width: 8 })
    );
    assert_eq!(e.dynamic_instruction_count(), 0);
}

#[test]
fn occupancy_fraction_is_weighted_mean() {
    // 16/32 once and 8/32 once: (16 + 8) / (2 * 32) = 0.375
    let mut e = entry(32);
    e.record(true, 16).unwrap();
    e.record(false, 8).unwrap();
    assert_eq!(e.occupancy_fraction(), 0.375);
}

#[test]
fn idle_warp_has_zero_occupancy() {
    let mut e = entry(4);
    e.record(false, 0).unwrap();
    assert_eq!(e.occupancy_fraction(), 0.0);
}

#[test]
fn record_is_atomic_on_bad_occupancy() {
    let mut e = entry(4);
    assert!(e.record(true, 5).is_err());
    assert_eq!(e.instances(), 0);
    assert_eq!(e.taken_count(), 0);
}

#[test]
fn dynamic_count_matches_instances() {
    let mut e = entry(16);
    for lanes in 0..=16 {
        e.record(lanes % 3 == 0, lanes).unwrap();
    }
    assert_eq!(e.instances(), 17);
    assert_eq!(e.dynamic_instruction_count(), e.instances());
    assert_eq!(e.occupancy().iter().sum::<u64>(), e.instances());
}

// ══════════════════════════════════════════════════════════
// 3. Merging
// ══════════════════════════════════════════════════════════

#[test]
fn merge_sums_counters() {
    let mut a = entry(32);
    a.record(true, 16).unwrap();
    let mut b = entry(32);
    b.record(true, 16).unwrap();
    b.record(false, 4).unwrap();

    a.merge(&b).unwrap();
    assert_eq!(a.instances(), 3);
    assert_eq!(a.taken_count(), 2);
    assert_eq!(a.occupancy()[16], 2);
    assert_eq!(a.occupancy()[4], 1);
}

#[test]
fn merge_keeps_own_tag() {
    let key = BranchKey::new(0x10u64, 0x20u64);
    let mut a = BtbEntry::new(BranchTag::Intrinsic, key, 4);
    let mut b = BtbEntry::new(BranchTag::Extrinsic, key, 4);
    b.record(true, 4).unwrap();
    a.merge(&b).unwrap();
    assert_eq!(a.tag(), BranchTag::Intrinsic);
    assert_eq!(a.instances(), 1);
}

#[test]
fn merge_rejects_other_branch() {
    let mut a = entry(4);
    let b = BtbEntry::new(BranchTag::Extrinsic, BranchKey::new(0x100u64, 0x204u64), 4);
    assert_eq!(
        a.merge(&b),
        Err(ProfileError::KeyMismatch {
            expected_pc: CodeAddr(0x100),
            expected_target: CodeAddr(0x200),
            found_pc: CodeAddr(0x100),
            found_target: CodeAddr(0x204),
        })
    );
}

#[test]
fn merge_rejects_other_width() {
    let mut a = entry(32);
    let b = entry(16);
    assert_eq!(
        a.merge(&b),
        Err(ProfileError::WidthMismatch {
            expected: 32,
            found: 16
        })
    );
}

// ══════════════════════════════════════════════════════════
// 4. Identity
// ══════════════════════════════════════════════════════════

#[test]
fn entries_equal_by_key_only() {
    let key = BranchKey::new(0x40u64, 0x80u64);
    let mut a = BtbEntry::new(BranchTag::Intrinsic, key, 4);
    a.record(true, 2).unwrap();
    let b = BtbEntry::new(BranchTag::Extrinsic, key, 4);
    let c = BtbEntry::new(BranchTag::Intrinsic, BranchKey::new(0x40u64, 0x84u64), 4);
    assert_eq!(a, b);
    assert_ne!(a, c);
}
