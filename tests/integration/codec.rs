//! Hex, Huffman and HPACK through the boundary (RFC 7541 Appendix C).

use libridge::{Host, Op};
use ridge_core::Header;

use crate::*;

// ── Hex ───────────────────────────────────────────────────────────────────────

#[test]
fn test_hex_round_trip() {
    let host = Host::new();
    assert_eq!(host.hex_encode(&[0x00, 0xab, 0xff]).unwrap(), "00abff");
    assert_eq!(host.hex_decode("00ABff").unwrap(), [0x00, 0xab, 0xff]);
}

#[test]
fn test_hex_empty_and_invalid() {
    let host = Host::new();
    assert_eq!(host.hex_encode(b"").unwrap(), "");
    assert_eq!(host.hex_decode("").unwrap(), Vec::<u8>::new());
    assert_eq!(host.hex_decode("abc"), None);
    assert_eq!(host.hex_decode("zz"), None);
}

// ── Huffman ───────────────────────────────────────────────────────────────────

#[test]
fn test_huffman_appendix_c4_strings() {
    let host = Host::new();
    assert_eq!(
        hex::encode(host.huffman_encode(b"www.example.com").unwrap()),
        "f1e3c2e5f23a6ba0ab90f4ff"
    );
    assert_eq!(hex::encode(host.huffman_encode(b"no-cache").unwrap()), "a8eb10649cbf");
    assert_eq!(
        host.huffman_decode(&unhex("25a849e95ba97d7f")).unwrap(),
        b"custom-key"
    );
}

#[test]
fn test_huffman_rejects_bad_padding() {
    let host = Host::new();
    // '3' is 011001; zero padding is not a prefix of EOS.
    assert_eq!(host.huffman_decode(&[0x64]), None);
    // A full 32-bit EOS inside the string.
    assert_eq!(host.huffman_decode(&[0xff, 0xff, 0xff, 0xff]), None);
    assert_eq!(host.huffman_decode(&[0x67]).unwrap(), b"3");
}

#[test]
fn test_huffman_empty_is_success() {
    let host = Host::new();
    assert_eq!(host.huffman_encode(b"").unwrap(), Vec::<u8>::new());
    assert_eq!(host.huffman_decode(b"").unwrap(), Vec::<u8>::new());
}

// ── HPACK ─────────────────────────────────────────────────────────────────────

const C3_1_TEXT: &str = ":method: GET\n:scheme: http\n:path: /\n:authority: www.example.com\n";

#[test]
fn test_hpack_c3_1_plain_literals() {
    let host = Host::new();
    let text = host
        .call(Op::HeaderDecompress, &[unhex("828684410f7777772e6578616d706c652e636f6d").as_slice()])
        .unwrap();
    assert_eq!(String::from_utf8(text).unwrap(), C3_1_TEXT);
}

#[test]
fn test_hpack_c4_1_huffman_literals() {
    let headers = Host::new()
        .hpack_decode(&unhex("828684418cf1e3c2e5f23a6ba0ab90f4ff"))
        .unwrap();
    assert_eq!(
        headers,
        vec![
            Header::new(":method", "GET"),
            Header::new(":scheme", "http"),
            Header::new(":path", "/"),
            Header::new(":authority", "www.example.com"),
        ]
    );
}

#[test]
fn test_hpack_c2_1_literal_with_indexing() {
    let headers = Host::new()
        .hpack_decode(&unhex(
            "400a637573746f6d2d6b65790d637573746f6d2d686561646572",
        ))
        .unwrap();
    assert_eq!(headers, vec![Header::new("custom-key", "custom-header")]);
}

#[test]
fn test_hpack_decoding_is_stateless_per_call() {
    let host = Host::new();
    // Adds custom-key to the dynamic table, then refers to it as index 62.
    let block = unhex("400a637573746f6d2d6b65790d637573746f6d2d686561646572be");
    let headers = host.hpack_decode(&block).unwrap();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0], headers[1]);
    // The next call starts with an empty table.
    assert_eq!(host.hpack_decode(&[0xbe]), None);
}

#[test]
fn test_hpack_rejects_malformed_blocks() {
    let host = Host::new();
    assert_eq!(host.hpack_decode(&[0x80]), None);
    assert_eq!(host.hpack_decode(&[0x41, 0x05, b'a']), None);
    assert_eq!(host.hpack_decode(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f]), None);
}

#[test]
fn test_hpack_encode_round_trip_keeps_order() {
    let host = Host::new();
    let headers = vec![
        Header::new(":method", "GET"),
        Header::new(":path", "/"),
        Header::new("custom-key", "custom-value"),
        Header::new("accept", "text/html"),
        Header::new("custom-key", "second"),
    ];
    let block = host.hpack_encode(&headers).unwrap();
    assert_eq!(&block[..2], &[0x82, 0x84]);
    assert_eq!(host.hpack_decode(&block).unwrap(), headers);
}

#[test]
fn test_hpack_encode_from_text() {
    let host = Host::new();
    let block = host
        .call(Op::HeaderCompress, &[C3_1_TEXT.as_bytes()])
        .unwrap();
    let text = host.call(Op::HeaderDecompress, &[block.as_slice()]).unwrap();
    assert_eq!(String::from_utf8(text).unwrap(), C3_1_TEXT);
}

#[test]
fn test_hpack_empty_and_invalid_text() {
    let host = Host::new();
    assert_eq!(host.hpack_decode(b"").unwrap(), Vec::<Header>::new());
    assert_eq!(host.hpack_encode(&[]).unwrap(), Vec::<u8>::new());
    assert_eq!(host.hpack_encode(&[Header::new("", "x")]), None);
    assert_eq!(host.call(Op::HeaderCompress, &[&b"no separator\n"[..]]), None);
}

#[test]
fn test_hpack_well_formed_input_with_no_fields() {
    let host = Host::new();
    // Dynamic table size updates only: to 0, then to 4096.
    assert_eq!(host.hpack_decode(&[0x20]), Some(Vec::new()));
    assert_eq!(
        host.call(Op::HeaderDecompress, &[&[0x3f, 0xe1, 0x1f][..]]),
        Some(Vec::new())
    );
    // Blank lines parse to an empty list.
    assert_eq!(host.call(Op::HeaderCompress, &[&b"\n"[..]]), Some(Vec::new()));
    assert_eq!(host.call(Op::HeaderCompress, &[&b"\r\n\n"[..]]), Some(Vec::new()));
}

#[test]
fn test_hpack_malformed_size_updates_stay_absent() {
    let host = Host::new();
    // 4097 exceeds the table maximum.
    assert_eq!(host.hpack_decode(&[0x3f, 0xe2, 0x1f]), None);
    // A size update after the first field.
    assert_eq!(host.hpack_decode(&[0x82, 0x20]), None);
}

#[test]
fn test_hpack_decoded_list_is_capped() {
    let host = Host::new();
    // Literal with indexing: name "x", raw 4000-byte value, then references to it.
    let mut block = vec![0x40, 0x01, b'x', 0x7f, 0xa1, 0x1e];
    block.extend_from_slice(&[b'a'; 4000]);
    let with_refs = |refs: usize| {
        let mut b = block.clone();
        b.extend(std::iter::repeat(0xbe).take(refs));
        b
    };
    assert_eq!(host.hpack_decode(&with_refs(15)).map(|h| h.len()), Some(16));
    assert_eq!(host.hpack_decode(&with_refs(16)), None);
}
