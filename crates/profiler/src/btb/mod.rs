//! Tagged branch-target buffer (BTB).
//!
//! Unlike a predictor's BTB, this buffer never evicts: it is an associative
//! store of per-branch statistics keyed by (source, target). Entries are
//! created on first sight, updated in place on every retirement and folded
//! into a parent context's buffer with [`TaggedBtb::merge_btb`].

pub use self::entry::{BranchKey, BranchTag, BtbEntry};

/// Per-branch statistics entry and its identity types.
pub mod entry;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::common::{CodeAddr, ProfileError, Result};
use crate::config::ProfilerConfig;
use crate::stats::{BtbReport, BtbRow};

/// Growable store of per-branch statistics for one simulation context.
///
/// Entries are kept in first-seen order; a key index makes lookups O(1).
#[derive(Clone, Debug)]
pub struct TaggedBtb {
    width: usize,
    entries: Vec<BtbEntry>,
    index: HashMap<BranchKey, usize>,
}

impl TaggedBtb {
    /// Creates an empty buffer whose entries track warps of `width` lanes.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates an empty buffer sized by the configured warp width.
    pub fn from_config(config: &ProfilerConfig) -> Self {
        Self::new(config.warp.warp_size)
    }

    /// Warp width of the entries' occupancy histograms.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of distinct branches tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no branch has been seen since creation or the last flush.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for (source, target), creating a zeroed one if the
    /// branch has not been seen.
    ///
    /// An existing entry is returned unchanged: the tag recorded the first
    /// time a branch is seen wins over any tag passed later.
    ///
    /// # Arguments
    ///
    /// * `tag` - Code-origin tag, used only if the entry is created.
    /// * `source` - Address of the branch instruction.
    /// * `target` - Address the branch jumps to when taken.
    ///
    /// # Returns
    ///
    /// A mutable reference to the entry for (`source`, `target`).
    pub fn lookup_or_create(
        &mut self,
        tag: BranchTag,
        source: impl Into<CodeAddr>,
        target: impl Into<CodeAddr>,
    ) -> &mut BtbEntry {
        let key = BranchKey::new(source, target);
        let slot = if let Some(&slot) = self.index.get(&key) {
            if self.entries[slot].tag() != tag {
                trace!(
                    pc = %key.source,
                    target = %key.target,
                    kept = %self.entries[slot].tag(),
                    ignored = %tag,
                    "tag differs from first sighting"
                );
            }
            slot
        } else {
            let slot = self.entries.len();
            self.entries.push(BtbEntry::new(tag, key, self.width));
            let _ = self.index.insert(key, slot);
            trace!(pc = %key.source, target = %key.target, %tag, "new btb entry");
            slot
        };
        &mut self.entries[slot]
    }

    /// Returns the entry for (source, target) if the branch has been seen.
    pub fn get(
        &self,
        source: impl Into<CodeAddr>,
        target: impl Into<CodeAddr>,
    ) -> Option<&BtbEntry> {
        let key = BranchKey::new(source, target);
        self.index.get(&key).map(|&slot| &self.entries[slot])
    }

    /// Iterates over the entries in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, BtbEntry> {
        self.entries.iter()
    }

    /// Folds a child context's buffer into this one.
    ///
    /// Every child entry is looked up (or created, with the child's tag) here
    /// and its counters are added. The child is only read.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::WidthMismatch`] if the buffers track different
    /// warp widths; nothing is merged in that case.
    pub fn merge_btb(&mut self, child: &Self) -> Result<()> {
        if child.width != self.width {
            return Err(ProfileError::WidthMismatch {
                expected: self.width,
                found: child.width,
            });
        }
        for entry in &child.entries {
            self.lookup_or_create(entry.tag(), entry.source(), entry.target())
                .merge(entry)?;
        }
        debug!(
            merged = child.entries.len(),
            total = self.entries.len(),
            "merged child btb"
        );
        Ok(())
    }

    /// Drops every entry.
    pub fn flush(&mut self) {
        debug!(entries = self.entries.len(), "flushing btb");
        self.entries.clear();
        self.index.clear();
    }

    /// One report row per entry, in first-seen order.
    pub fn report(&self) -> BtbReport {
        BtbReport {
            rows: self.entries.iter().map(BtbRow::from).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TaggedBtb {
    type Item = &'a BtbEntry;
    type IntoIter = std::slice::Iter<'a, BtbEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
