//! Live lane activity owned by the pipeline.
//!
//! The pipeline keeps one [`ActivityVector`] per warp and rewrites it as lanes
//! diverge and reconverge. Status tables never own it: they keep an
//! [`ActivityHandle`], a weak reference that must be upgraded on every access.
//! A table that outlives its vector therefore sees
//! [`ProfileError::DanglingActivity`] instead of stale lane states.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::lane::LaneState;
use crate::common::{ProfileError, Result};

/// Per-lane activity states of one warp, shared by the pipeline.
///
/// Cloning yields another owner of the same vector. The length is fixed at
/// construction.
#[derive(Clone, Debug)]
pub struct ActivityVector {
    states: Rc<RefCell<Vec<LaneState>>>,
}

impl ActivityVector {
    /// Creates a vector of `width` lanes, all in `state`.
    pub fn new(width: usize, state: LaneState) -> Self {
        Self::from_states(vec![state; width])
    }

    /// Wraps an existing sequence of lane states.
    pub fn from_states(states: Vec<LaneState>) -> Self {
        Self {
            states: Rc::new(RefCell::new(states)),
        }
    }

    /// Decodes raw pipeline encodings into a new vector.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidLaneState`] for the first encoding that
    /// is not a known lane state.
    pub fn from_encodings(raw: &[u8]) -> Result<Self> {
        let states = raw
            .iter()
            .map(|&r| LaneState::try_from(r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_states(states))
    }

    /// Number of lanes.
    pub fn len(&self) -> usize {
        self.states.borrow().len()
    }

    /// Returns `true` if the vector holds no lanes.
    pub fn is_empty(&self) -> bool {
        self.states.borrow().is_empty()
    }

    /// Returns the state of `lane`, or `None` if it is out of range.
    pub fn get(&self, lane: usize) -> Option<LaneState> {
        self.states.borrow().get(lane).copied()
    }

    /// Sets the state of one lane.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::LaneOutOfRange`] if `lane` is not a lane of this vector.
    pub fn set(&self, lane: usize, state: LaneState) -> Result<()> {
        let mut states = self.states.borrow_mut();
        let width = states.len();
        let slot = states
            .get_mut(lane)
            .ok_or(ProfileError::LaneOutOfRange { lane, width })?;
        *slot = state;
        Ok(())
    }

    /// Sets one lane from its raw pipeline encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidLaneState`] for an unknown encoding and
    /// [`ProfileError::LaneOutOfRange`] for a bad lane index.
    pub fn set_encoded(&self, lane: usize, raw: u8) -> Result<()> {
        self.set(lane, LaneState::try_from(raw)?)
    }

    /// Sets every lane to `state`.
    pub fn fill(&self, state: LaneState) {
        self.states.borrow_mut().fill(state);
    }

    /// Number of lanes currently [`LaneState::Active`].
    pub fn active_lanes(&self) -> usize {
        self.states.borrow().iter().filter(|s| s.is_active()).count()
    }

    /// Copies the current lane states out.
    pub fn snapshot(&self) -> Vec<LaneState> {
        self.states.borrow().clone()
    }

    /// Returns a weak handle to this vector.
    pub fn handle(&self) -> ActivityHandle {
        ActivityHandle {
            states: Rc::downgrade(&self.states),
        }
    }

    /// Runs `f` over the current lane states.
    pub(crate) fn with_states<R>(&self, f: impl FnOnce(&[LaneState]) -> R) -> R {
        f(&self.states.borrow())
    }
}

/// Non-owning reference to an [`ActivityVector`].
#[derive(Clone, Debug)]
pub struct ActivityHandle {
    states: Weak<RefCell<Vec<LaneState>>>,
}

impl ActivityHandle {
    /// Recovers the vector, or `None` once every owner has dropped it.
    pub fn upgrade(&self) -> Option<ActivityVector> {
        self.states
            .upgrade()
            .map(|states| ActivityVector { states })
    }

    /// Returns `true` while the referenced vector is still alive.
    pub fn is_live(&self) -> bool {
        self.states.strong_count() > 0
    }

    /// Returns `true` if both handles refer to the same vector.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.states.ptr_eq(&other.states)
    }
}
