//! Per-lane activity accounting.
//!
//! A warp's lanes are each, on every simulated cycle, in exactly one of three
//! states. The pipeline owns the live state vector ([`ActivityVector`]); a
//! [`ThreadStatusTable`] holds a weak handle to it and, once per cycle, counts
//! how many cycles each lane spent in each state.

/// Lane activity states and their raw encodings.
pub mod lane;

/// Pipeline-owned activity vector and the weak handle tables bind to.
pub mod activity;

/// Per-lane cycle counters clocked once per simulated cycle.
pub mod table;

pub use activity::{ActivityHandle, ActivityVector};
pub use lane::LaneState;
pub use table::{LaneCounters, ThreadStatusTable};
