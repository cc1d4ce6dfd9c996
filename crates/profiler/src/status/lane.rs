//! Lane activity states.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::ProfileError;
use crate::common::constants::{LANE_ACTIVE, LANE_INACTIVE_EXTRINSIC, LANE_INACTIVE_INTRINSIC};

/// Activity state of a single SIMD lane during one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LaneState {
    /// Lane is executing.
    Active = LANE_ACTIVE,
    /// Lane is masked off for a reason outside the program, such as a warp
    /// holding fewer threads than lanes.
    InactiveExtrinsic = LANE_INACTIVE_EXTRINSIC,
    /// Lane is masked off by the program's own divergent control flow.
    InactiveIntrinsic = LANE_INACTIVE_INTRINSIC,
}

impl LaneState {
    /// Returns the raw encoding the pipeline uses for this state.
    #[inline(always)]
    pub const fn encoding(self) -> u8 {
        self as u8
    }

    /// Returns `true` for [`LaneState::Active`].
    #[inline(always)]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl TryFrom<u8> for LaneState {
    type Error = ProfileError;

    /// Decodes a raw lane state.
    ///
    /// Any value other than the three known encodings means the caller
    /// handed over corrupted state and is rejected.
    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            LANE_ACTIVE => Ok(Self::Active),
            LANE_INACTIVE_EXTRINSIC => Ok(Self::InactiveExtrinsic),
            LANE_INACTIVE_INTRINSIC => Ok(Self::InactiveIntrinsic),
            other => Err(ProfileError::InvalidLaneState(other)),
        }
    }
}

impl fmt::Display for LaneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encoding())
    }
}
