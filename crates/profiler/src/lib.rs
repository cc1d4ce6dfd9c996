//! Warp divergence profiler for cycle-level GPU simulators.
//!
//! This crate characterizes the cost of control-flow divergence with the following:
//! 1. **Status:** Per-lane cycle counters of active, extrinsically inactive and
//!    intrinsically inactive time, clocked once per simulated cycle.
//! 2. **Branches:** A tagged branch-target buffer of per-branch retirement,
//!    taken and warp-occupancy statistics, keyed by (source, target).
//! 3. **Contexts:** Pairs of the two, merged from child into parent contexts.
//! 4. **Reports:** Text tables and JSON dumps of the collected statistics.

/// Common types (addresses, constants, errors).
pub mod common;
/// Profiler configuration (defaults, hierarchical config structures).
pub mod config;
/// Per-lane activity states, activity vectors and the thread status table.
pub mod status;
/// Tagged branch-target buffer and its entries.
pub mod btb;
/// Per-context pairing of status table and branch buffer.
pub mod context;
/// Report data and rendering.
pub mod stats;

/// Root configuration type; use `ProfilerConfig::default()` or parse from JSON.
pub use crate::config::ProfilerConfig;
/// Status table and buffer of one simulation context.
pub use crate::context::ProfileContext;
/// Crate error type and result alias.
pub use crate::common::{ProfileError, Result};
/// Branch-side types.
pub use crate::btb::{BranchTag, BtbEntry, TaggedBtb};
/// Lane-side types.
pub use crate::status::{ActivityVector, LaneState, ThreadStatusTable};
