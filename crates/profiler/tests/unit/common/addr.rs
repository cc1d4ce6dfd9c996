//! Code address tests.

use divprof_core::common::CodeAddr;

#[test]
fn converts_from_and_to_u64() {
    let addr = CodeAddr::from(0x1234u64);
    assert_eq!(addr, CodeAddr::new(0x1234));
    assert_eq!(u64::from(addr), 0x1234);
    assert_eq!(addr.val(), 0x1234);
}

#[test]
fn display_is_prefixed_hex() {
    assert_eq!(CodeAddr(0x100).to_string(), "0x100");
}

#[test]
fn lower_hex_honors_width() {
    assert_eq!(format!("{:>8x}", CodeAddr(0xbeef)), "    beef");
}

#[test]
fn orders_numerically() {
    assert!(CodeAddr(0x10) < CodeAddr(0x100));
}
