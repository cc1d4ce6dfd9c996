//! Error taxonomy tests.

use divprof_core::common::{CodeAddr, ProfileError};

#[test]
fn invalid_lane_state_message() {
    assert_eq!(
        ProfileError::InvalidLaneState(7).to_string(),
        "invalid lane activity encoding 7"
    );
}

#[test]
fn lane_out_of_range_message() {
    let err = ProfileError::LaneOutOfRange {
        lane: 32,
        width: 32,
    };
    assert_eq!(err.to_string(), "lane 32 out of range for a warp of 32 lanes");
}

#[test]
fn key_mismatch_message_names_both_branches() {
    let err = ProfileError::KeyMismatch {
        expected_pc: CodeAddr(0x10),
        expected_target: CodeAddr(0x20),
        found_pc: CodeAddr(0x30),
        found_target: CodeAddr(0x40),
    };
    assert_eq!(
        err.to_string(),
        "cannot merge branch 0x30->0x40 into 0x10->0x20"
    );
}

#[test]
fn errors_are_std_errors() {
    fn takes_error(_: &dyn std::error::Error) {}
    takes_error(&ProfileError::Unbound);
    takes_error(&ProfileError::DanglingActivity);
}
