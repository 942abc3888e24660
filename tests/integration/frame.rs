//! HTTP/2 frame parsing through the boundary.

use libridge::Host;
use ridge_core::FrameType;

use crate::*;

#[test]
fn test_empty_data_frame_round_trips() {
    let host = Host::new();
    let bytes = unhex("000000000000000001");
    assert_eq!(host.frame_canonical(&bytes).unwrap(), bytes);

    let frame = host.frame_parse(&bytes).unwrap();
    assert_eq!(frame.frame_type, FrameType::Data);
    assert_eq!(frame.flags, 0);
    assert_eq!(frame.stream_id, 1);
    assert!(frame.payload.is_empty());
}

#[test]
fn test_reserved_bit_is_cleared() {
    let host = Host::new();
    let canonical = host.frame_canonical(&unhex("000000000080000001")).unwrap();
    assert_eq!(canonical, unhex("000000000000000001"));
}

#[test]
fn test_settings_and_ping_payloads() {
    let host = Host::new();
    // SETTINGS_MAX_CONCURRENT_STREAMS = 100
    let settings = unhex("000006040000000000000300000064");
    let frame = host.frame_parse(&settings).unwrap();
    assert_eq!(frame.frame_type, FrameType::Settings);
    assert_eq!(frame.payload, unhex("000300000064"));

    let ack = unhex("000000040100000000");
    assert_eq!(host.frame_parse(&ack).unwrap().flags, 0x1);

    let ping = unhex("0000080600000000000102030405060708");
    assert_eq!(host.frame_canonical(&ping).unwrap(), ping);
}

#[test]
fn test_malformed_frames_are_absent() {
    let host = Host::new();
    // shorter than a header
    assert_eq!(host.frame_canonical(&unhex("0000000000")), None);
    // unknown type 0x0a
    assert_eq!(host.frame_canonical(&unhex("0000000a0000000001")), None);
    // declares 4 payload bytes, carries 2
    assert_eq!(host.frame_canonical(&unhex("0000040000000000010102")), None);
    // trailing byte after the payload
    assert_eq!(host.frame_canonical(&unhex("00000000000000000100")), None);
    // SETTINGS payload not a multiple of 6
    assert_eq!(host.frame_canonical(&unhex("0000050400000000000000000000")), None);
    // WINDOW_UPDATE must carry exactly 4 bytes
    assert_eq!(host.frame_canonical(&unhex("0000030800000000010000ff")), None);
    assert_eq!(host.frame_canonical(b""), None);
}
