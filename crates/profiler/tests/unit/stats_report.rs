//! Report Rendering Tests.
//!
//! Checks the column set and order of the branch table, the status totals
//! line, section selection and JSON dumps.

use divprof_core::btb::{BranchTag, TaggedBtb};
use divprof_core::stats::{BTB_COLUMNS, BtbReport, ProfileReport, REPORT_SECTIONS};
use divprof_core::status::ThreadStatusTable;
use pretty_assertions::assert_eq;

use crate::common::builder::partial_warp;
use crate::common::harness::{Observation, btb_from};

fn sample_btb() -> TaggedBtb {
    btb_from(
        32,
        &[
            Observation::new(BranchTag::Extrinsic, 0x100, 0x200, true, 32),
            Observation::new(BranchTag::Extrinsic, 0x100, 0x200, false, 32),
            Observation::new(BranchTag::Intrinsic, 0x80, 0x40, true, 16),
        ],
    )
}

// ══════════════════════════════════════════════════════════
// 1. Branch table
// ══════════════════════════════════════════════════════════

#[test]
fn columns_in_contract_order() {
    assert_eq!(
        BTB_COLUMNS,
        ["PC", "TYPE", "TARGET", "INSTANCES", "TAKEN", "OCCUPANCY", "DYN_COUNT"]
    );
}

#[test]
fn header_and_rules() {
    let text = BtbReport::default().to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "-".repeat(96));
    assert_eq!(lines[2], "-".repeat(96));
    let header: Vec<&str> = lines[1].split_whitespace().collect();
    assert_eq!(header, BTB_COLUMNS.to_vec());
}

#[test]
fn row_layout() {
    let report = sample_btb().report();
    let expected = format!(
        "{:>12} {:>12} {:>12} {:>10} {:>12} {:>15} {:>12}\n",
        "100", "extrinsic", "200", "2", "0.500000", "1.000000", "2"
    );
    assert_eq!(report.rows[0].to_string(), expected);

    let fields: Vec<String> = report.rows[1]
        .to_string()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    assert_eq!(
        fields,
        vec!["80", "intrinsic", "40", "1", "1.000000", "0.500000", "1"]
    );
}

#[test]
fn table_rows_follow_header() {
    let text = sample_btb().report().to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[3].contains("extrinsic"));
    assert!(lines[4].contains("intrinsic"));
}

#[test]
fn without_empty_and_sorted() {
    let mut btb = sample_btb();
    let _ = btb.lookup_or_create(BranchTag::Intrinsic, 0x8u64, 0xcu64);
    let report = btb.report();
    assert_eq!(report.rows.len(), 3);

    let filtered = report.without_empty().sorted_by_pc();
    let sources: Vec<u64> = filtered.rows.iter().map(|r| r.source.val()).collect();
    assert_eq!(sources, vec![0x80, 0x100]);
}

#[test]
fn json_dump_marks_undefined_fractions_null() {
    let mut btb = TaggedBtb::new(4);
    let _ = btb.lookup_or_create(BranchTag::Intrinsic, 0x10u64, 0x20u64);
    let json = btb.report().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let row = &value["rows"][0];
    assert_eq!(row["source"], 0x10);
    assert_eq!(row["tag"], "intrinsic");
    assert!(row["taken_fraction"].is_null());
    assert!(row["occupancy_fraction"].is_null());
}

// ══════════════════════════════════════════════════════════
// 2. Status totals
// ══════════════════════════════════════════════════════════

#[test]
fn status_totals_line() {
    let activity = partial_warp(4, 3);
    let mut table = ThreadStatusTable::new(4);
    table.bind(&activity).unwrap();
    for _ in 0..3 {
        table.clock().unwrap();
    }
    let report = table.report();
    assert_eq!(
        report.to_string(),
        format!("{:>12}, {:>12}, {:>12}\n", 9, 3, 0)
    );
}

// ══════════════════════════════════════════════════════════
// 3. Sections
// ══════════════════════════════════════════════════════════

fn profile_report() -> ProfileReport {
    let activity = partial_warp(4, 3);
    let mut table = ThreadStatusTable::new(4);
    table.bind(&activity).unwrap();
    table.clock().unwrap();
    ProfileReport {
        status: table.report(),
        branches: sample_btb().report(),
    }
}

#[test]
fn section_names() {
    assert_eq!(REPORT_SECTIONS, &["status", "lanes", "branches"]);
}

#[test]
fn render_all_sections() {
    let report = profile_report();
    let text = report.render_sections(&[]);
    assert!(text.starts_with("THREAD STATUS (4 lanes)\n"));
    assert!(text.contains("0, 0, 0, 1\n"));
    assert!(text.contains("DYN_COUNT"));
    assert_eq!(text, report.to_string());
}

#[test]
fn render_selected_sections() {
    let report = profile_report();
    let lanes_only = report.render_sections(&[String::from("lanes")]);
    assert_eq!(lanes_only, "0, 0, 0, 1\n");

    let branches_only = report.render_sections(&[String::from("branches")]);
    assert!(!branches_only.contains("THREAD STATUS"));
    assert!(branches_only.contains("intrinsic"));
}

#[test]
fn lanes_section_marks_missing_vector() {
    let lanes = [String::from("lanes")];
    let mut table = ThreadStatusTable::new(4);
    let unbound = ProfileReport {
        status: table.report(),
        branches: BtbReport::default(),
    };
    assert_eq!(unbound.render_sections(&lanes), "(unbound)\n");

    table.bind(&partial_warp(4, 3)).unwrap();
    let dangling = ProfileReport {
        status: table.report(),
        branches: BtbReport::default(),
    };
    assert_eq!(dangling.render_sections(&lanes), "(dangling)\n");
}

#[test]
fn unknown_sections_render_nothing() {
    assert_eq!(
        profile_report().render_sections(&[String::from("memory")]),
        ""
    );
}

#[test]
fn whole_report_json() {
    let json = profile_report().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["status"]["active_cycles"], 3);
    assert_eq!(value["status"]["lanes"][3], "InactiveExtrinsic");
    assert_eq!(value["branches"]["rows"].as_array().map(Vec::len), Some(2));
}
