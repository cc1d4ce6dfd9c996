//! Thread status table.
//!
//! The table counts, for every lane of one warp, how many cycles the lane
//! spent active, masked off extrinsically and masked off intrinsically. Each
//! call to [`ThreadStatusTable::clock`] reads the bound activity vector and
//! bumps exactly one of the three counters per lane, so a lane's counters
//! always sum to the number of cycles clocked since the last clear.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::activity::{ActivityHandle, ActivityVector};
use super::lane::LaneState;
use crate::common::{ProfileError, Result};
use crate::config::ProfilerConfig;
use crate::stats::StatusReport;

/// Per-lane cycle counters, one sequence per lane state.
///
/// This is plain data: it can be snapshotted out of a table, sent to another
/// context and merged there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneCounters {
    /// Cycles each lane spent [`LaneState::Active`].
    pub active: Vec<u64>,
    /// Cycles each lane spent [`LaneState::InactiveExtrinsic`].
    pub extrinsic: Vec<u64>,
    /// Cycles each lane spent [`LaneState::InactiveIntrinsic`].
    pub intrinsic: Vec<u64>,
}

impl LaneCounters {
    /// Creates zeroed counters for `width` lanes.
    pub fn new(width: usize) -> Self {
        Self {
            active: vec![0; width],
            extrinsic: vec![0; width],
            intrinsic: vec![0; width],
        }
    }

    /// Number of lanes covered.
    pub fn width(&self) -> usize {
        self.active.len()
    }

    /// Counter sequence for one lane state.
    pub fn for_state(&self, state: LaneState) -> &[u64] {
        match state {
            LaneState::Active => &self.active,
            LaneState::InactiveExtrinsic => &self.extrinsic,
            LaneState::InactiveIntrinsic => &self.intrinsic,
        }
    }

    /// Sum over all lanes of the counter for `state`.
    pub fn total(&self, state: LaneState) -> u64 {
        self.for_state(state).iter().sum()
    }

    /// Cycles counted for `lane` across all three states.
    pub fn lane_total(&self, lane: usize) -> Option<u64> {
        Some(self.active.get(lane)? + self.extrinsic.get(lane)? + self.intrinsic.get(lane)?)
    }

    /// Adds `other` into `self`, lane by lane.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::WidthMismatch`] if any of the three sequences of
    /// `other` is not `self.width()` long; `self` is left untouched in that case.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        let expected = self.width();
        if let Some(found) = [&other.active, &other.extrinsic, &other.intrinsic]
            .iter()
            .map(|lanes| lanes.len())
            .find(|&len| len != expected)
        {
            return Err(ProfileError::WidthMismatch { expected, found });
        }
        add_lanes(&mut self.active, &other.active);
        add_lanes(&mut self.extrinsic, &other.extrinsic);
        add_lanes(&mut self.intrinsic, &other.intrinsic);
        Ok(())
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        self.active.fill(0);
        self.extrinsic.fill(0);
        self.intrinsic.fill(0);
    }

    #[inline(always)]
    fn bump(&mut self, lane: usize, state: LaneState) {
        let counters = match state {
            LaneState::Active => &mut self.active,
            LaneState::InactiveExtrinsic => &mut self.extrinsic,
            LaneState::InactiveIntrinsic => &mut self.intrinsic,
        };
        counters[lane] += 1;
    }
}

fn add_lanes(into: &mut [u64], from: &[u64]) {
    for (dst, src) in into.iter_mut().zip(from) {
        *dst += src;
    }
}

/// Cycle-granularity activity accounting for one warp.
///
/// Created empty and unbound. The owner binds it to the warp's
/// [`ActivityVector`] at the start of an epoch and calls
/// [`clock`](Self::clock) once per simulated cycle.
#[derive(Clone, Debug)]
pub struct ThreadStatusTable {
    width: usize,
    activity: Option<ActivityHandle>,
    counters: LaneCounters,
}

impl ThreadStatusTable {
    /// Creates an unbound table for a warp of `width` lanes.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            activity: None,
            counters: LaneCounters::new(width),
        }
    }

    /// Creates an unbound table sized by the configured warp width.
    pub fn from_config(config: &ProfilerConfig) -> Self {
        Self::new(config.warp.warp_size)
    }

    /// Warp width of this table.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns `true` if an activity vector has been bound and not cleared.
    ///
    /// The vector itself may since have been dropped.
    pub const fn is_bound(&self) -> bool {
        self.activity.is_some()
    }

    /// Binds the table to the pipeline's activity vector for this warp.
    ///
    /// Replaces any earlier binding. Counters are kept.
    ///
    /// # Arguments
    ///
    /// * `activity` - The pipeline's vector for this warp. The table keeps a
    ///   weak handle and never extends its lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::WidthMismatch`] if the vector does not have
    /// exactly `width` lanes.
    pub fn bind(&mut self, activity: &ActivityVector) -> Result<()> {
        if activity.len() != self.width {
            return Err(ProfileError::WidthMismatch {
                expected: self.width,
                found: activity.len(),
            });
        }
        debug!(width = self.width, "binding thread status table");
        self.activity = Some(activity.handle());
        Ok(())
    }

    /// Writes one lane's state through the bound vector.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Unbound`] or [`ProfileError::DanglingActivity`]
    /// if there is no live vector, and [`ProfileError::LaneOutOfRange`] if
    /// `lane >= width`.
    pub fn set_lane_state(&self, lane: usize, state: LaneState) -> Result<()> {
        if lane >= self.width {
            return Err(ProfileError::LaneOutOfRange {
                lane,
                width: self.width,
            });
        }
        self.live_activity()?.set(lane, state)
    }

    /// Advances one simulated cycle.
    ///
    /// Reads every lane's current state and increments exactly one of its
    /// three counters.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Unbound`] or [`ProfileError::DanglingActivity`]
    /// if there is no live vector to read; no counter changes.
    pub fn clock(&mut self) -> Result<()> {
        let activity = self.live_activity()?;
        let counters = &mut self.counters;
        activity.with_states(|states| {
            for (lane, &state) in states.iter().enumerate() {
                counters.bump(lane, state);
            }
        });
        Ok(())
    }

    /// Folds another table's counters into this one.
    ///
    /// Only counters are touched; neither table's binding changes.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::WidthMismatch`] if the widths differ.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        self.merge_counters(&other.counters)
    }

    /// Folds a counter snapshot into this table.
    ///
    /// # Arguments
    ///
    /// * `counters` - Snapshot taken with [`counters`](Self::counters), possibly
    ///   from another context or deserialized.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::WidthMismatch`] unless all three sequences of the
    /// snapshot have exactly `width` lanes. Nothing is merged in that case.
    pub fn merge_counters(&mut self, counters: &LaneCounters) -> Result<()> {
        self.counters.merge(counters)?;
        debug!(width = self.width, "merged thread status counters");
        Ok(())
    }

    /// Zeroes the counters and drops the binding, ready for a new epoch.
    pub fn clear(&mut self) {
        self.counters.reset();
        self.activity = None;
        debug!(width = self.width, "cleared thread status table");
    }

    /// The per-lane counters.
    pub const fn counters(&self) -> &LaneCounters {
        &self.counters
    }

    /// Total active cycles across all lanes.
    pub fn active_count(&self) -> u64 {
        self.counters.total(LaneState::Active)
    }

    /// Total extrinsically inactive cycles across all lanes.
    pub fn extrinsic_count(&self) -> u64 {
        self.counters.total(LaneState::InactiveExtrinsic)
    }

    /// Total intrinsically inactive cycles across all lanes.
    pub fn intrinsic_count(&self) -> u64 {
        self.counters.total(LaneState::InactiveIntrinsic)
    }

    /// Number of lanes currently active in the bound vector.
    ///
    /// This is the occupancy a retiring branch is recorded with.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Unbound`] or [`ProfileError::DanglingActivity`]
    /// if there is no live vector.
    pub fn active_lane_count(&self) -> Result<usize> {
        Ok(self.live_activity()?.active_lanes())
    }

    /// Current lane states of the bound vector, if it is still alive.
    pub fn lane_states(&self) -> Option<Vec<LaneState>> {
        self.activity
            .as_ref()
            .and_then(ActivityHandle::upgrade)
            .map(|activity| activity.snapshot())
    }

    /// Summarizes the table: the three totals, whether it is bound and, when
    /// the bound vector is still alive, the current lane states.
    pub fn report(&self) -> StatusReport {
        StatusReport {
            width: self.width,
            active_cycles: self.active_count(),
            extrinsic_cycles: self.extrinsic_count(),
            intrinsic_cycles: self.intrinsic_count(),
            bound: self.is_bound(),
            lanes: self.lane_states(),
        }
    }

    fn live_activity(&self) -> Result<ActivityVector> {
        self.activity
            .as_ref()
            .ok_or(ProfileError::Unbound)?
            .upgrade()
            .ok_or(ProfileError::DanglingActivity)
    }
}
