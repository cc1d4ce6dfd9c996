//! Profiling context.
//!
//! A simulation context (a core, a sub-core partition) owns one thread status
//! table and one tagged BTB. The context drives both from the pipeline's
//! per-cycle and per-retirement hooks, and folds a finished child context
//! into its parent at an epoch boundary with [`ProfileContext::merge_child`].

use tracing::debug;

use crate::btb::{BranchTag, TaggedBtb};
use crate::common::{CodeAddr, ProfileError, Result};
use crate::config::ProfilerConfig;
use crate::stats::ProfileReport;
use crate::status::{ActivityVector, ThreadStatusTable};

/// Status table and branch buffer of one simulation context.
#[derive(Clone, Debug)]
pub struct ProfileContext {
    config: ProfilerConfig,
    status: ThreadStatusTable,
    btb: TaggedBtb,
}

impl ProfileContext {
    /// Creates an empty, unbound context.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidConfig`] if the configuration fails validation.
    pub fn new(config: &ProfilerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            status: ThreadStatusTable::from_config(config),
            btb: TaggedBtb::from_config(config),
        })
    }

    /// Configuration the context was built with.
    pub const fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Warp width shared by the table and the buffer.
    pub const fn width(&self) -> usize {
        self.status.width()
    }

    /// The thread status table.
    pub const fn status(&self) -> &ThreadStatusTable {
        &self.status
    }

    /// Mutable access to the thread status table.
    pub const fn status_mut(&mut self) -> &mut ThreadStatusTable {
        &mut self.status
    }

    /// The tagged branch-target buffer.
    pub const fn btb(&self) -> &TaggedBtb {
        &self.btb
    }

    /// Mutable access to the tagged branch-target buffer.
    pub const fn btb_mut(&mut self) -> &mut TaggedBtb {
        &mut self.btb
    }

    /// Binds the status table to the warp's activity vector.
    ///
    /// # Arguments
    ///
    /// * `activity` - The pipeline's vector for this warp; only a weak handle is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::WidthMismatch`] if the vector has the wrong length.
    pub fn bind(&mut self, activity: &ActivityVector) -> Result<()> {
        self.status.bind(activity)
    }

    /// Clocks the status table for one simulated cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Unbound`] or [`ProfileError::DanglingActivity`]
    /// if the table has no live activity vector.
    pub fn clock(&mut self) -> Result<()> {
        self.status.clock()
    }

    /// Records one retired branch with an explicit active-lane count.
    ///
    /// # Arguments
    ///
    /// * `tag` - Code-origin tag, kept only if the branch is new.
    /// * `source` - Address of the branch instruction.
    /// * `target` - Branch target address.
    /// * `taken` - Whether the branch was taken.
    /// * `active_lanes` - Lanes active at retirement, in `0..=width`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::OccupancyOutOfRange`] if `active_lanes` exceeds
    /// the warp width. The buffer is not touched in that case.
    pub fn record_branch(
        &mut self,
        tag: BranchTag,
        source: impl Into<CodeAddr>,
        target: impl Into<CodeAddr>,
        taken: bool,
        active_lanes: usize,
    ) -> Result<()> {
        if active_lanes > self.btb.width() {
            return Err(ProfileError::OccupancyOutOfRange {
                count: active_lanes,
                width: self.btb.width(),
            });
        }
        self.btb
            .lookup_or_create(tag, source, target)
            .record(taken, active_lanes)
    }

    /// Records one retired branch, taking the occupancy from the lanes
    /// currently active in the bound activity vector.
    ///
    /// # Arguments
    ///
    /// * `tag` - Code-origin tag, kept only if the branch is new.
    /// * `source` - Address of the branch instruction.
    /// * `target` - Branch target address.
    /// * `taken` - Whether the branch was taken.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Unbound`] or [`ProfileError::DanglingActivity`]
    /// if the table has no live activity vector.
    pub fn retire_branch(
        &mut self,
        tag: BranchTag,
        source: impl Into<CodeAddr>,
        target: impl Into<CodeAddr>,
        taken: bool,
    ) -> Result<()> {
        let active_lanes = self.status.active_lane_count()?;
        self.record_branch(tag, source, target, taken, active_lanes)
    }

    /// Folds a child context's statistics into this one.
    ///
    /// The child is only read; its binding and entries are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::WidthMismatch`] if the contexts were built for
    /// different warp widths. Nothing is merged in that case.
    pub fn merge_child(&mut self, child: &Self) -> Result<()> {
        if child.width() != self.width() {
            return Err(ProfileError::WidthMismatch {
                expected: self.width(),
                found: child.width(),
            });
        }
        self.status.merge(&child.status)?;
        self.btb.merge_btb(&child.btb)?;
        debug!(branches = self.btb.len(), "merged child context");
        Ok(())
    }

    /// Clears the status table and flushes the buffer for a new simulation phase.
    pub fn reset(&mut self) {
        self.status.clear();
        self.btb.flush();
    }

    /// Builds the report, applying the configured row filtering and ordering.
    pub fn report(&self) -> ProfileReport {
        let mut branches = self.btb.report();
        if self.config.report.skip_empty_branches {
            branches = branches.without_empty();
        }
        if self.config.report.sort_by_pc {
            branches = branches.sorted_by_pc();
        }
        ProfileReport {
            status: self.status.report(),
            branches,
        }
    }

    /// Prints only the requested report sections to stdout.
    ///
    /// Pass an empty slice to print all sections.
    pub fn print_sections(&self, sections: &[String]) {
        self.report().print_sections(sections);
    }

    /// Prints the sections selected in the configuration.
    pub fn print(&self) {
        self.print_sections(&self.config.report.sections);
    }
}
