//! Profiling statistics reports.
//!
//! This module turns the live tables into read-only report data. It provides:
//! 1. **Status report:** Active, extrinsic and intrinsic cycle totals of a warp,
//!    plus the lane states of the bound activity vector.
//! 2. **Branch report:** One row per tracked branch with PC, TYPE, TARGET,
//!    INSTANCES, TAKEN, OCCUPANCY and DYN_COUNT columns, in that order.
//! 3. **Sections:** Selective text rendering of a whole context and JSON dumps.

use std::fmt;

use serde::Serialize;

use crate::btb::{BranchTag, BtbEntry};
use crate::common::CodeAddr;
use crate::common::constants::REPORT_RULE_WIDTH;
use crate::status::LaneState;

/// Section names for selective report output.
///
/// Valid section identifiers: `"status"`, `"lanes"`, `"branches"`.
/// Pass an empty slice to [`ProfileReport::render_sections`] to render all sections.
pub const REPORT_SECTIONS: &[&str] = &["status", "lanes", "branches"];

/// Column headers of the branch report, in output order.
pub const BTB_COLUMNS: [&str; 7] = [
    "PC",
    "TYPE",
    "TARGET",
    "INSTANCES",
    "TAKEN",
    "OCCUPANCY",
    "DYN_COUNT",
];

/// Cycle totals of one thread status table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Warp width of the table.
    pub width: usize,
    /// Active cycles summed over all lanes.
    pub active_cycles: u64,
    /// Extrinsically inactive cycles summed over all lanes.
    pub extrinsic_cycles: u64,
    /// Intrinsically inactive cycles summed over all lanes.
    pub intrinsic_cycles: u64,
    /// Whether the table holds a binding, live or not.
    pub bound: bool,
    /// Current lane states, if the table is bound to a live vector.
    pub lanes: Option<Vec<LaneState>>,
}

impl StatusReport {
    /// Sum of the three totals: width times the cycles clocked.
    pub const fn total_cycles(&self) -> u64 {
        self.active_cycles + self.extrinsic_cycles + self.intrinsic_cycles
    }

    /// Renders the lane states as comma-separated encodings, if bound.
    pub fn lane_dump(&self) -> Option<String> {
        self.lanes.as_ref().map(|lanes| {
            lanes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12}, {:>12}, {:>12}",
            self.active_cycles, self.extrinsic_cycles, self.intrinsic_cycles
        )
    }
}

/// One branch of the branch report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BtbRow {
    /// Address of the branch instruction.
    pub source: CodeAddr,
    /// Code-origin tag.
    pub tag: BranchTag,
    /// Branch target address.
    pub target: CodeAddr,
    /// Retirements in either direction.
    pub instances: u64,
    /// Fraction of retirements taken; NaN for zero instances.
    pub taken_fraction: f64,
    /// Mean active-lane fraction at retirement; NaN for zero instances.
    pub occupancy_fraction: f64,
    /// Retirements counted by the occupancy histogram.
    pub dynamic_instruction_count: u64,
}

impl BtbRow {
    /// Returns `true` if the row has an undefined fraction: the branch never
    /// retired, or its retirements carry no occupancy samples.
    pub const fn is_empty(&self) -> bool {
        self.instances == 0 || self.dynamic_instruction_count == 0
    }
}

impl From<&BtbEntry> for BtbRow {
    fn from(entry: &BtbEntry) -> Self {
        Self {
            source: entry.source(),
            tag: entry.tag(),
            target: entry.target(),
            instances: entry.instances(),
            taken_fraction: entry.taken_fraction(),
            occupancy_fraction: entry.occupancy_fraction(),
            dynamic_instruction_count: entry.dynamic_instruction_count(),
        }
    }
}

impl fmt::Display for BtbRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12x} {:>12} {:>12x} {:>10} {:>12.6} {:>15.6} {:>12}",
            self.source,
            self.tag,
            self.target,
            self.instances,
            self.taken_fraction,
            self.occupancy_fraction,
            self.dynamic_instruction_count
        )
    }
}

/// Per-branch statistics of one buffer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BtbReport {
    /// Rows in buffer order unless re-sorted.
    pub rows: Vec<BtbRow>,
}

impl BtbReport {
    /// Drops rows whose taken or occupancy fraction is undefined.
    #[must_use]
    pub fn without_empty(mut self) -> Self {
        self.rows.retain(|row| !row.is_empty());
        self
    }

    /// Orders rows by (source, target).
    #[must_use]
    pub fn sorted_by_pc(mut self) -> Self {
        self.rows.sort_by_key(|row| (row.source, row.target));
        self
    }

    /// Serializes the rows as JSON.
    ///
    /// Undefined fractions are written as `null`.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for BtbReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(REPORT_RULE_WIDTH);
        let [pc, kind, target, instances, taken, occupancy, dyn_count] = BTB_COLUMNS;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{pc:>12} {kind:>12} {target:>12} {instances:>10} {taken:>12} {occupancy:>15} {dyn_count:>12}"
        )?;
        writeln!(f, "{rule}")?;
        for row in &self.rows {
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Everything a profiling context reports.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileReport {
    /// Lane activity totals.
    pub status: StatusReport,
    /// Branch statistics.
    pub branches: BtbReport,
}

impl ProfileReport {
    /// Renders the requested sections as text.
    ///
    /// Each element of `sections` should be one of [`REPORT_SECTIONS`]; unknown
    /// names are ignored. Pass an empty slice to render every section.
    pub fn render_sections(&self, sections: &[String]) -> String {
        Sections {
            report: self,
            sections,
        }
        .to_string()
    }

    /// Prints the requested sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Serializes the whole report as JSON.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_sections(&[]))
    }
}

struct Sections<'a> {
    report: &'a ProfileReport,
    sections: &'a [String],
}

impl Sections<'_> {
    fn want(&self, section: &str) -> bool {
        self.sections.is_empty() || self.sections.iter().any(|s| s == section)
    }
}

impl fmt::Display for Sections<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = &self.report.status;
        if self.want("status") {
            writeln!(f, "THREAD STATUS ({} lanes)", status.width)?;
            writeln!(f, "{:>12}, {:>12}, {:>12}", "ACTIVE", "EXTRINSIC", "INTRINSIC")?;
            write!(f, "{status}")?;
        }
        if self.want("lanes") {
            match status.lane_dump() {
                Some(dump) => writeln!(f, "{dump}")?,
                None if status.bound => writeln!(f, "(dangling)")?,
                None => writeln!(f, "(unbound)")?,
            }
        }
        if self.want("branches") {
            write!(f, "{}", self.report.branches)?;
        }
        Ok(())
    }
}
