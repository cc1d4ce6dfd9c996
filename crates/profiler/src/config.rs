//! Configuration for the divergence profiler.
//!
//! This module defines the configuration structures used to parameterize a
//! profiling context. It provides:
//! 1. **Defaults:** Baseline warp geometry and report settings.
//! 2. **Structures:** Hierarchical config for the warp and for report rendering.
//! 3. **Validation:** Rejection of values no table can be built with.
//!
//! Configuration is supplied as JSON by the hosting simulator, or built with
//! `ProfilerConfig::default()`.

use serde::Deserialize;

use crate::common::{ProfileError, Result};
use crate::stats::REPORT_SECTIONS;

/// Default configuration constants for the profiler.
mod defaults {
    /// Default number of lanes per warp.
    pub const WARP_SIZE: usize = crate::common::constants::WARP_SIZE;

    /// Zero-instance branches are left out of rendered reports.
    pub const SKIP_EMPTY_BRANCHES: bool = true;

    /// Branch rows keep insertion order unless asked otherwise.
    pub const SORT_BY_PC: bool = false;
}

/// Root configuration structure containing all profiler settings.
///
/// # Examples
///
/// ```
/// use divprof_core::config::ProfilerConfig;
///
/// let config = ProfilerConfig::default();
/// assert_eq!(config.warp.warp_size, 32);
/// assert!(config.report.skip_empty_branches);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use divprof_core::config::ProfilerConfig;
///
/// let json = r#"{
///     "warp": { "warp_size": 16 },
///     "report": { "sections": ["status", "branches"], "sort_by_pc": true }
/// }"#;
///
/// let config = ProfilerConfig::from_json(json).unwrap();
/// assert_eq!(config.warp.warp_size, 16);
/// assert_eq!(config.report.sections, vec!["status", "branches"]);
/// assert!(config.report.sort_by_pc);
/// assert!(config.report.skip_empty_branches);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfilerConfig {
    /// Warp geometry
    #[serde(default)]
    pub warp: WarpConfig,
    /// Report rendering options
    #[serde(default)]
    pub report: ReportConfig,
}

impl ProfilerConfig {
    /// Parses and validates a configuration from a JSON document.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidConfig`] if the document does not parse
    /// or fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ProfileError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be used to build a profiling context.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidConfig`] for a zero warp size or an
    /// unknown report section name.
    pub fn validate(&self) -> Result<()> {
        if self.warp.warp_size == 0 {
            return Err(ProfileError::InvalidConfig(
                "warp_size must be at least 1".to_string(),
            ));
        }
        if let Some(unknown) = self
            .report
            .sections
            .iter()
            .find(|s| !REPORT_SECTIONS.contains(&s.as_str()))
        {
            return Err(ProfileError::InvalidConfig(format!(
                "unknown report section {unknown:?}, expected one of {REPORT_SECTIONS:?}"
            )));
        }
        Ok(())
    }
}

/// Warp geometry shared by the status table and every branch entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WarpConfig {
    /// Number of lanes per warp
    #[serde(default = "WarpConfig::default_warp_size")]
    pub warp_size: usize,
}

impl WarpConfig {
    /// Returns the default warp size.
    const fn default_warp_size() -> usize {
        defaults::WARP_SIZE
    }
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            warp_size: defaults::WARP_SIZE,
        }
    }
}

/// Report rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Sections printed by `ProfileContext::print`; empty prints all of them
    #[serde(default)]
    pub sections: Vec<String>,

    /// Leave branches with zero retirements out of the branch table
    #[serde(default = "ReportConfig::default_skip_empty_branches")]
    pub skip_empty_branches: bool,

    /// Order branch rows by (source, target) instead of first-seen order
    #[serde(default = "ReportConfig::default_sort_by_pc")]
    pub sort_by_pc: bool,
}

impl ReportConfig {
    /// Returns whether empty branches are skipped by default.
    const fn default_skip_empty_branches() -> bool {
        defaults::SKIP_EMPTY_BRANCHES
    }

    /// Returns whether rows are sorted by address by default.
    const fn default_sort_by_pc() -> bool {
        defaults::SORT_BY_PC
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            skip_empty_branches: defaults::SKIP_EMPTY_BRANCHES,
            sort_by_pc: defaults::SORT_BY_PC,
        }
    }
}
