#![allow(dead_code)]

use crate::catalog::DoneIndex;
use crate::projector::{LifecycleState, Projection, MAX_SLOT_DISTANCE};
use crate::scroller::Phase;

/// INV-1: Never more than four slots, never more than three at rest.
pub fn assert_slot_count(projection: &Projection) {
    let limit = if projection.phase.is_static() { 3 } else { 4 };
    assert!(
        projection.slots.len() <= limit,
        "INV-1 violated: {} slots for {:?}",
        projection.slots.len(),
        projection.phase
    );
}

/// INV-2: Every slot sits within two goals of the phase's done index.
pub fn assert_slots_near_done_index(projection: &Projection) {
    let base = projection.done_index.unwrap_or(0) as isize;
    for slot in &projection.slots {
        assert!(
            (slot.goal_index as isize - base).abs() <= MAX_SLOT_DISTANCE,
            "INV-2 violated: goal {} is too far from done index {:?}",
            slot.goal_index,
            projection.done_index
        );
    }
}

/// INV-3: Slots are contiguous, ordered, and their display positions count
/// up from zero.
pub fn assert_positions_contiguous(projection: &Projection) {
    for (row, slot) in projection.slots.iter().enumerate() {
        assert_eq!(
            slot.display_position, row,
            "INV-3 violated: goal {} at position {} (expected {})",
            slot.goal_index, slot.display_position, row
        );
        if row > 0 {
            assert_eq!(
                slot.goal_index,
                projection.slots[row - 1].goal_index + 1,
                "INV-3 violated: gap before goal {}",
                slot.goal_index
            );
        }
    }
}

/// INV-4: At most one active slot, except the literal `DownwardEnd(None)` frame.
pub fn assert_single_active(projection: &Projection) {
    if projection.phase == Phase::DownwardEnd(None) {
        return;
    }
    let active = projection
        .slots
        .iter()
        .filter(|s| s.state == LifecycleState::Active)
        .count();
    assert!(
        active <= 1,
        "INV-4 violated: {active} active slots for {:?}",
        projection.phase
    );
}

/// INV-5: The shown done index moves by at most one goal per phase change.
pub fn assert_single_step(before: DoneIndex, after: DoneIndex) {
    let as_signed = |d: DoneIndex| d.map_or(-1, |d| d as i64);
    assert!(
        (as_signed(before) - as_signed(after)).abs() <= 1,
        "INV-5 violated: done index jumped from {before:?} to {after:?}"
    );
}

/// Run all stateless projection invariants.
pub fn assert_all_projection_invariants(projection: &Projection) {
    assert_slot_count(projection);
    assert_slots_near_done_index(projection);
    assert_positions_contiguous(projection);
    assert_single_active(projection);
}
