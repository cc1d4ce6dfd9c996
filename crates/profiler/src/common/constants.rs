//! Global profiler constants.
//!
//! This module defines constants shared across the profiler. It includes:
//! 1. **Warp Geometry:** The default lane count of a warp.
//! 2. **Lane Encodings:** Raw values the pipeline uses for lane activity states.
//! 3. **Report Layout:** Rule width of the branch report table.

/// Default number of lanes per warp.
pub const WARP_SIZE: usize = 32;

/// Raw encoding of an active lane.
pub const LANE_ACTIVE: u8 = 0;

/// Raw encoding of a lane masked off for an external reason (partial warp).
pub const LANE_INACTIVE_EXTRINSIC: u8 = 1;

/// Raw encoding of a lane masked off by the program's own control flow.
pub const LANE_INACTIVE_INTRINSIC: u8 = 2;

/// Width of the horizontal rules framing the branch report.
pub const REPORT_RULE_WIDTH: usize = 96;
