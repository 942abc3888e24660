//! Property tests over the boundary.
//!
//! Every case drives the real exports, so each property also exercises
//! argument placement, packing and freeing.

use libridge::{Host, Op};
use proptest::prelude::*;
use ridge_core::Header;

/// Strategy for a header name the text form can carry.
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(":method".to_string()),
        Just(":path".to_string()),
        Just("accept".to_string()),
        "[a-z][a-z0-9-]{0,15}",
    ]
}

fn arb_header() -> impl Strategy<Value = Header> {
    (arb_name(), "[ -~]{0,24}").prop_map(|(name, value)| Header::new(name, value))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sha256_is_deterministic_and_32_bytes(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let host = Host::new();
        let a = host.call(Op::Sha256, &[data.as_slice()]).unwrap();
        let b = host.call(Op::Sha256, &[data.as_slice()]).unwrap();
        prop_assert_eq!(a.len(), 32);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn aead_round_trips(
        key in any::<[u8; 16]>(),
        iv in any::<[u8; 12]>(),
        aad in prop::collection::vec(any::<u8>(), 0..64),
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let host = Host::new();
        let sealed = host.aead_encrypt(&key, &iv, &aad, &plaintext).unwrap();
        prop_assert_eq!(sealed.len(), plaintext.len() + 16);
        prop_assert_eq!(host.aead_decrypt(&key, &iv, &aad, &sealed), Some(plaintext));
    }

    #[test]
    fn aead_bit_flip_is_rejected(
        key in any::<[u8; 16]>(),
        iv in any::<[u8; 12]>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
        flip in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let host = Host::new();
        let mut sealed = host.aead_encrypt(&key, &iv, b"", &plaintext).unwrap();
        let at = flip.index(sealed.len());
        sealed[at] ^= 1 << bit;
        prop_assert_eq!(host.aead_decrypt(&key, &iv, b"", &sealed), None);
    }

    #[test]
    fn dh_agreement_is_commutative(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let host = Host::new();
        let pa = host.dh_base(&a).unwrap();
        let pb = host.dh_base(&b).unwrap();
        prop_assert_eq!(host.dh_agree(&a, &pb), host.dh_agree(&b, &pa));
    }

    #[test]
    fn hex_round_trips(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let host = Host::new();
        let text = host.hex_encode(&data).unwrap();
        prop_assert_eq!(text.len(), data.len() * 2);
        prop_assert_eq!(host.hex_decode(&text), Some(data));
    }

    #[test]
    fn huffman_round_trips(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let host = Host::new();
        let encoded = host.huffman_encode(&data).unwrap();
        prop_assert_eq!(host.huffman_decode(&encoded), Some(data));
    }

    #[test]
    fn huffman_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
        // Any outcome is fine; the call must come back.
        let _ = Host::new().huffman_decode(&data);
    }

    #[test]
    fn hpack_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..128)) {
        let _ = Host::new().hpack_decode(&data);
    }

    #[test]
    fn frame_parse_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = Host::new().frame_canonical(&data);
    }

    #[test]
    fn hpack_encode_then_decode_keeps_order(headers in prop::collection::vec(arb_header(), 0..12)) {
        let host = Host::new();
        let block = host.hpack_encode(&headers).unwrap();
        prop_assert_eq!(host.hpack_decode(&block), Some(headers));
    }
}
