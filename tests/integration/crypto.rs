//! Hash, MAC, KDF, AEAD and X25519 through the boundary, checked against
//! published vectors.

use libridge::{Host, Op};

use crate::*;

// ── Hashing ───────────────────────────────────────────────────────────────────

#[test]
fn test_sha256_vectors() {
    let host = Host::new();
    assert_eq!(
        hex::encode(host.sha256(b"abc").unwrap()),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        hex::encode(host.sha256(b"").unwrap()),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_hmac_rfc4231_case2() {
    let tag = Host::new()
        .hmac_sha256(b"Jefe", b"what do ya want for nothing?")
        .unwrap();
    assert_eq!(
        hex::encode(tag),
        "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
    );
}

#[test]
fn test_hkdf_extract_rfc5869_case1() {
    let prk = Host::new()
        .hkdf_extract(&unhex("000102030405060708090a0b0c"), &[0x0b; 22])
        .unwrap();
    assert_eq!(
        hex::encode(prk),
        "077709362c2e32df0ddc3f0dc47bba6390b6c73bb50f9c3122ec844ad7c2b3e5"
    );
}

// ── AES-128-GCM ───────────────────────────────────────────────────────────────

#[test]
fn test_gcm_zero_block() {
    let host = Host::new();
    let sealed = host.aead_encrypt(&[0; 16], &[0; 12], b"", &[0; 16]).unwrap();
    assert_eq!(
        hex::encode(&sealed),
        "0388dace60b6a392f328c2b971b2fe78ab6e47d42cec13bdf53a67b21257bddf"
    );
    assert_eq!(
        host.aead_decrypt(&[0; 16], &[0; 12], b"", &sealed).unwrap(),
        [0u8; 16]
    );
}

#[test]
fn test_gcm_empty_plaintext_is_a_bare_tag() {
    let host = Host::new();
    let sealed = host.aead_encrypt(&[0; 16], &[0; 12], b"", b"").unwrap();
    assert_eq!(hex::encode(&sealed), "58e2fccefa7e3061367f1d57a4e7455a");

    // The payload is empty either way; the host tells success from failure.
    assert_eq!(host.aead_decrypt(&[0; 16], &[0; 12], b"", &sealed), Some(Vec::new()));
    let mut forged = sealed.clone();
    forged[0] ^= 1;
    assert_eq!(host.aead_decrypt(&[0; 16], &[0; 12], b"", &forged), None);
}

#[test]
fn test_gcm_rejects_tampering() {
    let host = Host::new();
    let key = [7u8; 16];
    let iv = [9u8; 12];
    let sealed = host.aead_encrypt(&key, &iv, b"hdr", b"payload").unwrap();
    assert_eq!(sealed.len(), 7 + 16);

    assert_eq!(host.aead_decrypt(&key, &iv, b"hdr", &sealed).unwrap(), b"payload");
    assert_eq!(host.aead_decrypt(&key, &iv, b"HDR", &sealed), None);
    assert_eq!(host.aead_decrypt(&[8u8; 16], &iv, b"hdr", &sealed), None);
    assert_eq!(host.aead_decrypt(&key, &iv, b"hdr", &sealed[..15]), None);
}

#[test]
fn test_gcm_short_key_is_zero_padded() {
    let host = Host::new();
    let short = host.call(Op::AeadEncrypt, &[&[1u8, 2, 3][..], &[0u8; 12][..], &b""[..], &b"x"[..]]);
    let mut padded = [0u8; 16];
    padded[..3].copy_from_slice(&[1, 2, 3]);
    let full = host.aead_encrypt(&padded, &[0; 12], b"", b"x");
    assert!(short.is_some());
    assert_eq!(short, full);
}

// ── X25519 ────────────────────────────────────────────────────────────────────

const ALICE_PRIVATE: &str = "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a";
const ALICE_PUBLIC: &str = "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";
const BOB_PRIVATE: &str = "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb";
const BOB_PUBLIC: &str = "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f";
const SHARED: &str = "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742";

#[test]
fn test_x25519_rfc7748() {
    let host = Host::new();
    let alice = unhex_n::<32>(ALICE_PRIVATE);
    let bob = unhex_n::<32>(BOB_PRIVATE);

    assert_eq!(hex::encode(host.dh_base(&alice).unwrap()), ALICE_PUBLIC);
    assert_eq!(hex::encode(host.dh_base(&bob).unwrap()), BOB_PUBLIC);

    let ab = host.dh_agree(&alice, &unhex_n(BOB_PUBLIC)).unwrap();
    let ba = host.dh_agree(&bob, &unhex_n(ALICE_PUBLIC)).unwrap();
    assert_eq!(hex::encode(ab), SHARED);
    assert_eq!(ab, ba);
}

#[test]
fn test_keygen_from_host_randomness() {
    let host = Host::new();
    let a = host.random_scalar();
    let b = host.random_scalar();
    assert_ne!(*a, *b);
    let pa = host.dh_base(&a).unwrap();
    let pb = host.dh_base(&b).unwrap();
    assert_eq!(host.dh_agree(&a, &pb), host.dh_agree(&b, &pa));
}

// ── Arity ─────────────────────────────────────────────────────────────────────

#[test]
fn test_wrong_argument_count_is_absent() {
    let host = Host::new();
    assert_eq!(host.call(Op::HmacSha256, &[&b"only one"[..]]), None);
    assert!(host.call_raw(Op::Sha256, &[&b"a"[..], &b"b"[..]]).is_empty());
}
