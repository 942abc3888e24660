//! TLS 1.3 key schedule (RFC 8446 §7.1), SHA-256 suites only.
//!
//! ```text
//!              0
//!              |
//!   0 ->  HKDF-Extract = Early Secret
//!              |
//!        Derive-Secret(., "derived", "")
//!              |
//!   (EC)DHE -> HKDF-Extract = Handshake Secret
//!              |
//!              +--> Derive-Secret(., "s hs traffic", ClientHello...ServerHello)
//!              +--> Derive-Secret(., "c hs traffic", ClientHello...ServerHello)
//!              |
//!        Derive-Secret(., "derived", "")
//!              |
//!   0 ->  HKDF-Extract = Master Secret
//!              |
//!              +--> Derive-Secret(., "s ap traffic", ClientHello...server Finished)
//!              +--> Derive-Secret(., "c ap traffic", ClientHello...server Finished)
//! ```
//!
//! Every traffic secret is expanded into a 16-byte AES-128-GCM key and a
//! 12-byte IV. The four values always travel together as a [`KeyBundle`].

use std::sync::OnceLock;

use static_assertions::assert_eq_size;
use thiserror::Error;
use zerocopy::{AsBytes, FromBytes, FromZeroes};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{self, CryptoError, AES_KEY_LEN, DIGEST_LEN, GCM_IV_LEN};

const LABEL_PREFIX: &[u8] = b"tls13 ";

// ── Key Bundle ────────────────────────────────────────────────────────────────

/// Server and client traffic keys for one epoch (handshake or application).
///
/// Wire order is fixed: server key, server IV, client key, client IV.
///
/// Wire size: 56 bytes.
#[derive(Debug, Clone, PartialEq, Eq, AsBytes, FromBytes, FromZeroes, Zeroize, ZeroizeOnDrop)]
#[repr(C)]
pub struct KeyBundle {
    pub server_key: [u8; AES_KEY_LEN],
    pub server_iv: [u8; GCM_IV_LEN],
    pub client_key: [u8; AES_KEY_LEN],
    pub client_iv: [u8; GCM_IV_LEN],
}

assert_eq_size!(KeyBundle, [u8; 56]);

/// Wire size of a [`KeyBundle`].
pub const KEY_BUNDLE_LEN: usize = 56;

impl KeyBundle {
    /// Read a bundle from exactly 56 bytes.
    pub fn from_wire(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != KEY_BUNDLE_LEN {
            return None;
        }
        Self::read_from(bytes)
    }

    /// The 56 concatenated bytes in wire order.
    pub fn to_wire(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

// ── HKDF-Expand-Label ─────────────────────────────────────────────────────────

/// HKDF-Expand-Label(Secret, Label, Context, Length)
///
/// ```text
/// struct {
///     uint16 length;
///     opaque label<7..255> = "tls13 " + Label;
///     opaque context<0..255>;
/// } HkdfLabel;
/// ```
pub fn hkdf_expand_label(
    secret: &[u8],
    label: &[u8],
    context: &[u8],
    length: usize,
) -> Result<Vec<u8>, TlsError> {
    let full_label_len = LABEL_PREFIX.len() + label.len();
    let label_len = u8::try_from(full_label_len).map_err(|_| TlsError::LabelTooLong(full_label_len))?;
    let context_len = u8::try_from(context.len()).map_err(|_| TlsError::ContextTooLong(context.len()))?;
    let out_len = u16::try_from(length).map_err(|_| CryptoError::OutputTooLong(length))?;

    let mut info = Vec::with_capacity(2 + 1 + full_label_len + 1 + context.len());
    info.extend_from_slice(&out_len.to_be_bytes());
    info.push(label_len);
    info.extend_from_slice(LABEL_PREFIX);
    info.extend_from_slice(label);
    info.push(context_len);
    info.extend_from_slice(context);

    Ok(crypto::hkdf_expand(secret, &info, length)?)
}

/// Derive-Secret(Secret, Label, Messages) with the transcript hash
/// already computed by the caller.
pub fn derive_secret(
    secret: &[u8],
    label: &[u8],
    transcript_hash: &[u8],
) -> Result<Zeroizing<[u8; DIGEST_LEN]>, TlsError> {
    let okm = hkdf_expand_label(secret, label, transcript_hash, DIGEST_LEN)?;
    Ok(Zeroizing::new(crypto::fit(&okm)))
}

// ── Fixed points of the schedule ─────────────────────────────────────────────

/// Early Secret with no PSK: HKDF-Extract(0, 0).
pub fn early_secret() -> &'static [u8; DIGEST_LEN] {
    static EARLY: OnceLock<[u8; DIGEST_LEN]> = OnceLock::new();
    EARLY.get_or_init(|| crypto::hkdf_extract(&[0u8; DIGEST_LEN], &[0u8; DIGEST_LEN]))
}

/// Derive-Secret(Early Secret, "derived", ""), the salt for the
/// handshake-secret extraction. Identical for every non-PSK handshake.
fn handshake_salt() -> &'static [u8; DIGEST_LEN] {
    static SALT: OnceLock<[u8; DIGEST_LEN]> = OnceLock::new();
    SALT.get_or_init(|| match derived_salt(early_secret()) {
        Ok(salt) => *salt,
        Err(e) => unreachable!("fixed-size derivation cannot fail: {e}"),
    })
}

fn derived_salt(secret: &[u8]) -> Result<Zeroizing<[u8; DIGEST_LEN]>, TlsError> {
    derive_secret(secret, b"derived", &crypto::hash(b""))
}

/// Handshake Secret = HKDF-Extract(derived salt, (EC)DHE shared secret).
pub fn handshake_secret(shared_secret: &[u8; DIGEST_LEN]) -> Zeroizing<[u8; DIGEST_LEN]> {
    Zeroizing::new(crypto::hkdf_extract(handshake_salt(), shared_secret))
}

/// Master Secret = HKDF-Extract(Derive-Secret(hs, "derived", ""), 0).
pub fn master_secret(
    handshake_secret: &[u8; DIGEST_LEN],
) -> Result<Zeroizing<[u8; DIGEST_LEN]>, TlsError> {
    let salt = derived_salt(handshake_secret)?;
    Ok(Zeroizing::new(crypto::hkdf_extract(
        salt.as_slice(),
        &[0u8; DIGEST_LEN],
    )))
}

// ── Traffic keys ──────────────────────────────────────────────────────────────

/// key = HKDF-Expand-Label(secret, "key", "", 16)
/// iv  = HKDF-Expand-Label(secret, "iv",  "", 12)
fn traffic_key_iv(
    traffic_secret: &[u8],
) -> Result<([u8; AES_KEY_LEN], [u8; GCM_IV_LEN]), TlsError> {
    let key = Zeroizing::new(hkdf_expand_label(traffic_secret, b"key", b"", AES_KEY_LEN)?);
    let iv = Zeroizing::new(hkdf_expand_label(traffic_secret, b"iv", b"", GCM_IV_LEN)?);
    Ok((crypto::fit(&key), crypto::fit(&iv)))
}

fn bundle_from(
    secret: &[u8],
    server_label: &[u8],
    client_label: &[u8],
    transcript_hash: &[u8],
) -> Result<KeyBundle, TlsError> {
    let server = derive_secret(secret, server_label, transcript_hash)?;
    let client = derive_secret(secret, client_label, transcript_hash)?;
    let (server_key, server_iv) = traffic_key_iv(server.as_slice())?;
    let (client_key, client_iv) = traffic_key_iv(client.as_slice())?;
    Ok(KeyBundle {
        server_key,
        server_iv,
        client_key,
        client_iv,
    })
}

/// Handshake traffic keys from the (EC)DHE shared secret and the
/// ClientHello...ServerHello transcript hash.
pub fn derive_handshake_keys(
    shared_secret: &[u8; DIGEST_LEN],
    hello_hash: &[u8; DIGEST_LEN],
) -> Result<KeyBundle, TlsError> {
    let hs = handshake_secret(shared_secret);
    bundle_from(hs.as_slice(), b"s hs traffic", b"c hs traffic", hello_hash)
}

/// Application traffic keys from the handshake secret and the
/// ClientHello...server Finished transcript hash.
pub fn derive_application_keys(
    handshake_secret: &[u8; DIGEST_LEN],
    transcript_hash: &[u8; DIGEST_LEN],
) -> Result<KeyBundle, TlsError> {
    let master = master_secret(handshake_secret)?;
    bundle_from(
        master.as_slice(),
        b"s ap traffic",
        b"c ap traffic",
        transcript_hash,
    )
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlsError {
    #[error("HKDF label of {0} bytes exceeds 255")]
    LabelTooLong(usize),

    #[error("HKDF context of {0} bytes exceeds 255")]
    ContextTooLong(usize),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
