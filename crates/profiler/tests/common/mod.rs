//! Shared helpers for the profiler tests.

/// Activity vector builders.
pub mod builder;
