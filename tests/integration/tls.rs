//! TLS 1.3 key schedule through the boundary (RFC 8448 §3).

use libridge::{Host, Op};
use ridge_core::tls::{KeyBundle, KEY_BUNDLE_LEN};

use crate::*;

const SHARED_SECRET: &str = "8bd4054fb55b9d63fdfbacf9f04b9f0d35e6d63f537563efd46272900f89492d";
const HELLO_HASH: &str = "860c06edc07858ee8e78f0e7428c58edd6b43f2ca3e6e95f02ed063cf0e1cad8";
const HANDSHAKE_SECRET: &str = "1dc826e93606aa6fdc0aadc12f741b01046aa6b99f691ed221a9f0ca043fbeac";

#[test]
fn test_handshake_keys_rfc8448() {
    let bundle = Host::new()
        .tls_handshake_keys(&unhex_n(SHARED_SECRET), &unhex_n(HELLO_HASH))
        .unwrap();
    assert_eq!(hex::encode(bundle.server_key), "3fce516009c21727d0f2e4e86ee403bc");
    assert_eq!(hex::encode(bundle.server_iv), "5d313eb2671276ee13000b30");
    assert_eq!(hex::encode(bundle.client_key), "dbfaa693d1762c5b666af5d950258d01");
    assert_eq!(hex::encode(bundle.client_iv), "5bd3c71b836e0b76bb73265f");
}

#[test]
fn test_handshake_bundle_wire_layout() {
    let host = Host::new();
    let wire = host
        .call(
            Op::TlsHandshakeKeys,
            &[unhex(SHARED_SECRET).as_slice(), unhex(HELLO_HASH).as_slice()],
        )
        .unwrap();
    assert_eq!(wire.len(), KEY_BUNDLE_LEN);
    assert_eq!(
        hex::encode(&wire),
        "3fce516009c21727d0f2e4e86ee403bc5d313eb2671276ee13000b30\
         dbfaa693d1762c5b666af5d950258d015bd3c71b836e0b76bb73265f"
    );
}

#[test]
fn test_application_keys_zero_inputs() {
    let bundle = Host::new()
        .tls_application_keys(&[0; 32], &[0; 32])
        .unwrap();
    assert_eq!(
        hex::encode(bundle.to_wire()),
        "70719f2edcaa329b63e0cb99c8014a43f14ce05e4f35ee3c5619639d675c82e1\
         fa86bdd0d611907a895fc2487b41ef84ed06ff907c771b1f"
    );
}

#[test]
fn test_application_keys_differ_from_handshake_keys() {
    let host = Host::new();
    let hs = host
        .tls_handshake_keys(&unhex_n(SHARED_SECRET), &unhex_n(HELLO_HASH))
        .unwrap();
    let app = host
        .tls_application_keys(&unhex_n(HANDSHAKE_SECRET), &unhex_n(HELLO_HASH))
        .unwrap();
    assert_ne!(hs, app);
    assert_ne!(app.server_key, app.client_key);
}

#[test]
fn test_short_secret_is_zero_padded() {
    let host = Host::new();
    let short = host
        .call(Op::TlsApplicationKeys, &[&[0u8; 5][..], &[0u8; 32][..]])
        .and_then(|wire| KeyBundle::from_wire(&wire));
    let full = host.tls_application_keys(&[0; 32], &[0; 32]);
    assert!(short.is_some());
    assert_eq!(short, full);
}
