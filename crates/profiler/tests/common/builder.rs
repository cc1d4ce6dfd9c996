use divprof_core::status::{ActivityVector, LaneState};

/// A warp with every lane active.
pub fn all_active(width: usize) -> ActivityVector {
    ActivityVector::new(width, LaneState::Active)
}

/// A partially filled warp: the first `threads` lanes active, the rest
/// masked off extrinsically.
pub fn partial_warp(width: usize, threads: usize) -> ActivityVector {
    let states = (0..width)
        .map(|lane| {
            if lane < threads {
                LaneState::Active
            } else {
                LaneState::InactiveExtrinsic
            }
        })
        .collect();
    ActivityVector::from_states(states)
}

/// A diverged warp: even lanes active, odd lanes masked off intrinsically.
pub fn diverged(width: usize) -> ActivityVector {
    let states = (0..width)
        .map(|lane| {
            if lane % 2 == 0 {
                LaneState::Active
            } else {
                LaneState::InactiveIntrinsic
            }
        })
        .collect();
    ActivityVector::from_states(states)
}
