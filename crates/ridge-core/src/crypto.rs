//! Cryptographic primitives for Ridge.
//!
//! Provides four things:
//!   1. SHA-256 hashing and HMAC-SHA-256
//!   2. HKDF-Extract / HKDF-Expand over SHA-256 (RFC 5869)
//!   3. AES-128-GCM authenticated encryption
//!   4. X25519 Diffie-Hellman (RFC 7748)
//!
//! Everything here is a pure function of its arguments. Nothing generates
//! randomness: keys, IVs and scalars always come from the caller.
//!
//! There is no unsafe code in this module.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Key, Nonce};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use thiserror::Error;
use x25519_dalek::{PublicKey, StaticSecret};

/// SHA-256 digest length, also the HMAC and HKDF-Extract output length.
pub const DIGEST_LEN: usize = 32;

/// AES-128 key length.
pub const AES_KEY_LEN: usize = 16;

/// GCM nonce length. Other IV sizes are not supported.
pub const GCM_IV_LEN: usize = 12;

/// GCM authentication tag length, appended to every ciphertext.
pub const GCM_TAG_LEN: usize = 16;

/// X25519 scalar and point length.
pub const X25519_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

// ── Fixed-size arguments ─────────────────────────────────────────────────────

/// Fit a caller-supplied argument into a fixed-size array.
///
/// Longer inputs are truncated, shorter inputs are zero-padded on the right.
/// This is the single policy for every argument whose size is part of an
/// operation's contract (AES key, GCM IV, X25519 scalar/point, TLS secrets).
pub fn fit<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let n = bytes.len().min(N);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}

// ── SHA-256 / HMAC ───────────────────────────────────────────────────────────

/// Hash a byte slice, returning a 32-byte SHA-256 digest.
pub fn hash(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(data).into()
}

/// HMAC-SHA-256 (RFC 2104). Keys of any length are accepted; keys longer
/// than the block size are hashed first.
pub fn hmac_sha256(key: &[u8], msg: &[u8]) -> [u8; DIGEST_LEN] {
    let mut mac = match <HmacSha256 as Mac>::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC accepts keys of any length"),
    };
    mac.update(msg);
    mac.finalize().into_bytes().into()
}

// ── HKDF ─────────────────────────────────────────────────────────────────────

/// HKDF-Extract(salt, IKM) -> 32-byte PRK.
///
/// An empty salt is replaced by 32 zero bytes (RFC 5869 §2.2).
pub fn hkdf_extract(salt: &[u8], ikm: &[u8]) -> [u8; DIGEST_LEN] {
    let salt = if salt.is_empty() { None } else { Some(salt) };
    let (prk, _) = Hkdf::<Sha256>::extract(salt, ikm);
    prk.into()
}

/// HKDF-Expand(PRK, info, L) -> L bytes of output keying material.
///
/// Fails if the PRK is shorter than a digest or if `length` exceeds
/// 255 * 32 bytes.
pub fn hkdf_expand(prk: &[u8], info: &[u8], length: usize) -> Result<Vec<u8>, CryptoError> {
    let hk = Hkdf::<Sha256>::from_prk(prk).map_err(|_| CryptoError::ShortPrk(prk.len()))?;
    let mut okm = vec![0u8; length];
    hk.expand(info, &mut okm)
        .map_err(|_| CryptoError::OutputTooLong(length))?;
    Ok(okm)
}

// ── AES-128-GCM ──────────────────────────────────────────────────────────────

/// Encrypt `plaintext` under AES-128-GCM.
///
/// Output is `ciphertext || tag`, always `plaintext.len() + 16` bytes.
pub fn aes128_gcm_seal(
    key: &[u8; AES_KEY_LEN],
    iv: &[u8; GCM_IV_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key));
    cipher
        .encrypt(
            Nonce::from_slice(iv),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| CryptoError::Seal)
}

/// Decrypt `ciphertext || tag` under AES-128-GCM.
///
/// The tag is verified before any plaintext is released. On mismatch
/// nothing but the error comes back.
pub fn aes128_gcm_open(
    key: &[u8; AES_KEY_LEN],
    iv: &[u8; GCM_IV_LEN],
    aad: &[u8],
    sealed: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < GCM_TAG_LEN {
        return Err(CryptoError::TooShort(sealed.len()));
    }
    let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(iv), Payload { msg: sealed, aad })
        .map_err(|_| CryptoError::AuthFailed)
}

// ── X25519 ───────────────────────────────────────────────────────────────────

/// `scalar * basepoint`: the public point for a private scalar.
///
/// The scalar is clamped per RFC 7748 §5.
pub fn x25519_base(scalar: &[u8; X25519_LEN]) -> [u8; X25519_LEN] {
    let secret = StaticSecret::from(*scalar);
    *PublicKey::from(&secret).as_bytes()
}

/// `scalar * point`: the shared secret between a private scalar and a
/// peer's public point.
///
/// Low-order points are not rejected: they yield the all-zero secret, as
/// the bare RFC 7748 function does.
pub fn x25519_agree(scalar: &[u8; X25519_LEN], point: &[u8; X25519_LEN]) -> [u8; X25519_LEN] {
    let secret = StaticSecret::from(*scalar);
    secret.diffie_hellman(&PublicKey::from(*point)).to_bytes()
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("AEAD authentication failed")]
    AuthFailed,

    #[error("AEAD encryption failed: plaintext exceeds the GCM limit")]
    Seal,

    #[error("sealed input too short: {0} bytes, need at least {}", GCM_TAG_LEN)]
    TooShort(usize),

    #[error("HKDF pseudorandom key too short: {0} bytes")]
    ShortPrk(usize),

    #[error("HKDF output length {0} exceeds 255 * 32")]
    OutputTooLong(usize),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
