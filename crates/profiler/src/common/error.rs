//! Contract-violation errors.
//!
//! The profiler assumes a correctly driving simulator. Every misuse it can
//! detect (a bad lane encoding, an index outside the warp, merging tables of
//! different widths, touching an unbound table) is reported as a
//! [`ProfileError`] from the operation that noticed it. Callers treat these as
//! fatal and propagate them; nothing here is retried or recovered.
//!
//! Taken and occupancy fractions of a branch with zero retirements are NaN
//! rather than an error. Report rendering filters such rows.

use thiserror::Error;

use super::addr::CodeAddr;

/// Errors raised when the profiler is driven outside its contract.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// A raw lane activity encoding that is none of the three known states.
    #[error("invalid lane activity encoding {0}")]
    InvalidLaneState(u8),

    /// A lane index at or beyond the warp width.
    #[error("lane {lane} out of range for a warp of {width} lanes")]
    LaneOutOfRange {
        /// Offending lane index.
        lane: usize,
        /// Warp width of the structure that rejected it.
        width: usize,
    },

    /// An active-lane count larger than the warp width.
    #[error("active lane count {count} exceeds warp width {width}")]
    OccupancyOutOfRange {
        /// Offending active-lane count.
        count: usize,
        /// Warp width of the entry that rejected it.
        width: usize,
    },

    /// Two structures (or a structure and an activity vector) disagree on warp width.
    #[error("warp width mismatch: expected {expected} lanes, got {found}")]
    WidthMismatch {
        /// Width of the receiving structure.
        expected: usize,
        /// Width of the other side.
        found: usize,
    },

    /// Merging branch entries that track different (source, target) pairs.
    #[error("cannot merge branch {found_pc}->{found_target} into {expected_pc}->{expected_target}")]
    KeyMismatch {
        /// Source address of the receiving entry.
        expected_pc: CodeAddr,
        /// Target address of the receiving entry.
        expected_target: CodeAddr,
        /// Source address of the entry being merged.
        found_pc: CodeAddr,
        /// Target address of the entry being merged.
        found_target: CodeAddr,
    },

    /// The status table has no activity vector bound.
    #[error("thread status table is not bound to an activity vector")]
    Unbound,

    /// The activity vector the status table was bound to has been dropped.
    #[error("activity vector bound to the thread status table no longer exists")]
    DanglingActivity,

    /// A configuration value the profiler cannot run with.
    #[error("invalid profiler configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used by every fallible profiler operation.
pub type Result<T> = std::result::Result<T, ProfileError>;
