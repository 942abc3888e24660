//! The operation table behind the exported symbols.
//!
//! Each [`Op`] names one primitive, its argument arity, and the export it
//! is reachable through. [`Op::run`] is the single place where a failed
//! computation collapses into the absent result.

use std::fmt;

use ridge_core::crypto::{self, CryptoError, AES_KEY_LEN, DIGEST_LEN, GCM_IV_LEN, X25519_LEN};
use ridge_core::frame::{self, FrameError};
use ridge_core::hpack::{self, HpackError};
use ridge_core::huffman::{self, HuffmanError};
use ridge_core::tls::{self, TlsError};
use ridge_core::wire::{self, WireError};
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Sha256,
    HmacSha256,
    HkdfExtract,
    AeadEncrypt,
    AeadDecrypt,
    DhBase,
    DhAgree,
    HexEncode,
    HexDecode,
    HeaderDecompress,
    HeaderCompress,
    HuffmanEncode,
    HuffmanDecode,
    TlsHandshakeKeys,
    TlsApplicationKeys,
    FrameParse,
}

impl Op {
    pub const ALL: [Op; 16] = [
        Op::Sha256,
        Op::HmacSha256,
        Op::HkdfExtract,
        Op::AeadEncrypt,
        Op::AeadDecrypt,
        Op::DhBase,
        Op::DhAgree,
        Op::HexEncode,
        Op::HexDecode,
        Op::HeaderDecompress,
        Op::HeaderCompress,
        Op::HuffmanEncode,
        Op::HuffmanDecode,
        Op::TlsHandshakeKeys,
        Op::TlsApplicationKeys,
        Op::FrameParse,
    ];

    /// Stable operation name, as used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Op::Sha256 => "sha256",
            Op::HmacSha256 => "hmac-sha256",
            Op::HkdfExtract => "hkdf-extract",
            Op::AeadEncrypt => "aead-encrypt",
            Op::AeadDecrypt => "aead-decrypt",
            Op::DhBase => "dh-base",
            Op::DhAgree => "dh-agree",
            Op::HexEncode => "hex-encode",
            Op::HexDecode => "hex-decode",
            Op::HeaderDecompress => "header-decompress",
            Op::HeaderCompress => "header-compress",
            Op::HuffmanEncode => "huffman-encode",
            Op::HuffmanDecode => "huffman-decode",
            Op::TlsHandshakeKeys => "tls-handshake-keys",
            Op::TlsApplicationKeys => "tls-application-keys",
            Op::FrameParse => "frame-parse",
        }
    }

    /// Exported symbol that reaches this operation.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Sha256 => "ridge_sha256",
            Op::HmacSha256 => "ridge_hmac_sha256",
            Op::HkdfExtract => "ridge_hkdf_extract",
            Op::AeadEncrypt => "ridge_aes128_gcm_encrypt",
            Op::AeadDecrypt => "ridge_aes128_gcm_decrypt",
            Op::DhBase => "ridge_x25519_base",
            Op::DhAgree => "ridge_x25519_agree",
            Op::HexEncode => "ridge_hex_encode",
            Op::HexDecode => "ridge_hex_decode",
            Op::HeaderDecompress => "ridge_hpack_decode",
            Op::HeaderCompress => "ridge_hpack_encode",
            Op::HuffmanEncode => "ridge_huffman_encode",
            Op::HuffmanDecode => "ridge_huffman_decode",
            Op::TlsHandshakeKeys => "ridge_tls_handshake_keys",
            Op::TlsApplicationKeys => "ridge_tls_application_keys",
            Op::FrameParse => "ridge_h2_frame_parse",
        }
    }

    /// Argument names in call order.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            Op::Sha256 => &["data"],
            Op::HmacSha256 => &["key", "msg"],
            Op::HkdfExtract => &["salt", "ikm"],
            Op::AeadEncrypt => &["key", "iv", "aad", "plaintext"],
            Op::AeadDecrypt => &["key", "iv", "aad", "ciphertext"],
            Op::DhBase => &["scalar"],
            Op::DhAgree => &["scalar", "point"],
            Op::HexEncode | Op::HuffmanEncode | Op::HuffmanDecode => &["data"],
            Op::HexDecode => &["text"],
            Op::HeaderDecompress => &["block"],
            Op::HeaderCompress => &["headers"],
            Op::TlsHandshakeKeys => &["shared-secret", "hello-hash"],
            Op::TlsApplicationKeys => &["handshake-secret", "transcript-hash"],
            Op::FrameParse => &["frame"],
        }
    }

    pub fn arity(self) -> usize {
        self.params().len()
    }

    /// Run the operation on imported arguments. `None` is the absent
    /// result: a wrong argument count or any failed computation.
    pub fn run(self, args: &[&[u8]]) -> Option<Vec<u8>> {
        let arg_lens: Vec<usize> = args.iter().map(|a| a.len()).collect();
        match self.compute(args) {
            Ok(out) => {
                tracing::debug!(op = self.name(), ?arg_lens, result_len = out.len(), "dispatched");
                Some(out)
            }
            Err(e @ OpError::Arity { .. }) => {
                tracing::warn!(op = self.name(), error = %e, "caller contract violation");
                None
            }
            Err(e) => {
                tracing::debug!(op = self.name(), ?arg_lens, error = %e, "operation failed");
                None
            }
        }
    }

    fn compute(self, args: &[&[u8]]) -> Result<Vec<u8>, OpError> {
        if args.len() != self.arity() {
            return Err(OpError::Arity {
                expected: self.arity(),
                got: args.len(),
            });
        }

        match self {
            Op::Sha256 => Ok(crypto::hash(args[0]).to_vec()),
            Op::HmacSha256 => Ok(crypto::hmac_sha256(args[0], args[1]).to_vec()),
            Op::HkdfExtract => Ok(crypto::hkdf_extract(args[0], args[1]).to_vec()),
            Op::AeadEncrypt => {
                let key = self.fixed::<AES_KEY_LEN>(0, args[0]);
                let iv = self.fixed::<GCM_IV_LEN>(1, args[1]);
                Ok(crypto::aes128_gcm_seal(&key, &iv, args[2], args[3])?)
            }
            Op::AeadDecrypt => {
                let key = self.fixed::<AES_KEY_LEN>(0, args[0]);
                let iv = self.fixed::<GCM_IV_LEN>(1, args[1]);
                Ok(crypto::aes128_gcm_open(&key, &iv, args[2], args[3])?)
            }
            Op::DhBase => {
                let scalar = self.fixed::<X25519_LEN>(0, args[0]);
                Ok(crypto::x25519_base(&scalar).to_vec())
            }
            Op::DhAgree => {
                let scalar = self.fixed::<X25519_LEN>(0, args[0]);
                let point = self.fixed::<X25519_LEN>(1, args[1]);
                Ok(crypto::x25519_agree(&scalar, &point).to_vec())
            }
            Op::HexEncode => Ok(wire::hex_encode(args[0])),
            Op::HexDecode => Ok(wire::hex_decode(args[0])?),
            Op::HeaderDecompress => Ok(hpack::decompress(args[0])?),
            Op::HeaderCompress => Ok(hpack::compress(args[0])?),
            Op::HuffmanEncode => Ok(huffman::encode(args[0])),
            Op::HuffmanDecode => Ok(huffman::decode(args[0])?),
            Op::TlsHandshakeKeys => {
                let shared = self.fixed::<DIGEST_LEN>(0, args[0]);
                let hello = self.fixed::<DIGEST_LEN>(1, args[1]);
                Ok(tls::derive_handshake_keys(&shared, &hello)?.to_wire())
            }
            Op::TlsApplicationKeys => {
                let hs = self.fixed::<DIGEST_LEN>(0, args[0]);
                let transcript = self.fixed::<DIGEST_LEN>(1, args[1]);
                Ok(tls::derive_application_keys(&hs, &transcript)?.to_wire())
            }
            Op::FrameParse => Ok(frame::canonicalize(args[0])?),
        }
    }

    /// Truncate or zero-pad a fixed-size argument, warning when the caller
    /// got the size wrong.
    fn fixed<const N: usize>(self, position: usize, arg: &[u8]) -> Zeroizing<[u8; N]> {
        if arg.len() != N {
            tracing::warn!(
                op = self.name(),
                arg = self.params()[position],
                expected = N,
                got = arg.len(),
                "fixed-size argument normalised"
            );
        }
        Zeroizing::new(crypto::fit(arg))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for Op {
    type Error = OpError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Op::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| OpError::UnknownOp(name.to_string()))
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpError {
    #[error("unknown operation {0:?}")]
    UnknownOp(String),

    #[error("expected {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Huffman(#[from] HuffmanError),

    #[error(transparent)]
    Hpack(#[from] HpackError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
