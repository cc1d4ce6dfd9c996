//! Tagged branch-target buffer entry.
//!
//! One entry accumulates the dynamic behavior of a single static branch,
//! identified by its (source, target) pair: how often it retired, how often
//! it was taken, and a histogram of how many lanes were active each time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{CodeAddr, ProfileError, Result};

/// Static code-origin class of a branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchTag {
    /// Branch belonging to the program's own control flow.
    Intrinsic,
    /// Branch guarding work against external factors, such as a bounds check
    /// on the thread index.
    Extrinsic,
}

impl BranchTag {
    /// Label used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Intrinsic => "intrinsic",
            Self::Extrinsic => "extrinsic",
        }
    }
}

impl fmt::Display for BranchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Identity of a branch: its source and target addresses.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BranchKey {
    /// Address of the branch instruction.
    pub source: CodeAddr,
    /// Address the branch jumps to when taken.
    pub target: CodeAddr,
}

impl BranchKey {
    /// Creates a key from a source and target address.
    pub fn new(source: impl Into<CodeAddr>, target: impl Into<CodeAddr>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Dynamic statistics of one static branch.
///
/// Two entries compare equal when they track the same (source, target) pair,
/// whatever their tags and counters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BtbEntry {
    tag: BranchTag,
    key: BranchKey,
    instances: u64,
    taken_count: u64,
    /// `occupancy[n]` counts retirements with `n` active lanes, `0..=width`.
    occupancy: Vec<u64>,
}

impl BtbEntry {
    /// Creates a zeroed entry for a warp of `width` lanes.
    pub fn new(tag: BranchTag, key: BranchKey, width: usize) -> Self {
        Self {
            tag,
            key,
            instances: 0,
            taken_count: 0,
            occupancy: vec![0; width + 1],
        }
    }

    /// Code-origin tag recorded when the entry was created.
    pub const fn tag(&self) -> BranchTag {
        self.tag
    }

    /// The (source, target) identity of this entry.
    pub const fn key(&self) -> BranchKey {
        self.key
    }

    /// Address of the branch instruction.
    pub const fn source(&self) -> CodeAddr {
        self.key.source
    }

    /// Branch target address.
    pub const fn target(&self) -> CodeAddr {
        self.key.target
    }

    /// Warp width the occupancy histogram was sized for.
    pub fn width(&self) -> usize {
        self.occupancy.len().saturating_sub(1)
    }

    /// Number of times the branch retired, in either direction.
    pub const fn instances(&self) -> u64 {
        self.instances
    }

    /// Number of retirements where the branch was taken.
    pub const fn taken_count(&self) -> u64 {
        self.taken_count
    }

    /// Occupancy histogram, indexed by active-lane count.
    pub fn occupancy(&self) -> &[u64] {
        &self.occupancy
    }

    /// Records the direction of one retirement of the branch.
    ///
    /// Leaves the occupancy histogram alone; pair it with
    /// [`update_occupancy`](Self::update_occupancy), or use
    /// [`record`](Self::record) to do both.
    #[inline]
    pub fn update_branch(&mut self, taken: bool) {
        self.instances += 1;
        if taken {
            self.taken_count += 1;
        }
    }

    /// Records the number of active lanes at one retirement.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::OccupancyOutOfRange`] if `active_lanes` exceeds
    /// the warp width.
    #[inline]
    pub fn update_occupancy(&mut self, active_lanes: usize) -> Result<()> {
        let width = self.width();
        let bucket = self
            .occupancy
            .get_mut(active_lanes)
            .ok_or(ProfileError::OccupancyOutOfRange {
                count: active_lanes,
                width,
            })?;
        *bucket += 1;
        Ok(())
    }

    /// Records a full retirement: direction and occupancy.
    ///
    /// The occupancy is validated first, so a rejected call changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::OccupancyOutOfRange`] if `active_lanes` exceeds
    /// the warp width.
    pub fn record(&mut self, taken: bool, active_lanes: usize) -> Result<()> {
        self.update_occupancy(active_lanes)?;
        self.update_branch(taken);
        Ok(())
    }

    /// Adds another entry's counters into this one.
    ///
    /// The tag of `self` is kept even if `other` carries a different one.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::KeyMismatch`] if the entries track different
    /// branches and [`ProfileError::WidthMismatch`] if their histograms differ
    /// in size. `self` is untouched on error.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        if other.key != self.key {
            return Err(ProfileError::KeyMismatch {
                expected_pc: self.key.source,
                expected_target: self.key.target,
                found_pc: other.key.source,
                found_target: other.key.target,
            });
        }
        if other.width() != self.width() {
            return Err(ProfileError::WidthMismatch {
                expected: self.width(),
                found: other.width(),
            });
        }
        self.instances += other.instances;
        self.taken_count += other.taken_count;
        for (dst, src) in self.occupancy.iter_mut().zip(&other.occupancy) {
            *dst += src;
        }
        Ok(())
    }

    /// Fraction of retirements that were taken.
    ///
    /// NaN when the branch never retired.
    pub fn taken_fraction(&self) -> f64 {
        self.taken_count as f64 / self.instances as f64
    }

    /// Mean fraction of the warp's lanes active when the branch retired, in `[0, 1]`.
    ///
    /// Weighted over the occupancy histogram; NaN when it is empty.
    pub fn occupancy_fraction(&self) -> f64 {
        let occupied: u64 = self
            .occupancy
            .iter()
            .enumerate()
            .map(|(lanes, &count)| lanes as u64 * count)
            .sum();
        occupied as f64 / (self.dynamic_instruction_count() as f64 * self.width() as f64)
    }

    /// Total retirements recorded in the occupancy histogram.
    pub fn dynamic_instruction_count(&self) -> u64 {
        self.occupancy.iter().sum()
    }
}

impl PartialEq for BtbEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for BtbEntry {}
