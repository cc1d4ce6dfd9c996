//! Common types shared by the status table and the branch-target buffer.
//!
//! This module provides the building blocks used across the profiler:
//! 1. **Addresses:** A strong type for branch source and target addresses.
//! 2. **Constants:** Default warp geometry and report layout constants.
//! 3. **Error Handling:** The contract-violation taxonomy and the crate `Result` alias.

/// Code address type used for branch sources and targets.
pub mod addr;

/// Common constants used throughout the profiler.
pub mod constants;

/// Error types for contract violations.
pub mod error;

pub use addr::CodeAddr;
pub use constants::WARP_SIZE;
pub use error::{ProfileError, Result};
