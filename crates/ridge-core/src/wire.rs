//! Packed result envelope: the only shape a result takes when it crosses
//! the module boundary.
//!
//! ```text
//! +----------------+--------------------+
//! | len: u32 (LE)  | payload: len bytes |
//! +----------------+--------------------+
//! ```
//!
//! An empty payload (`len == 0`) is the failure/absent marker. An
//! operation whose legitimate output is zero bytes is indistinguishable
//! from a failed one; callers that care must check inputs themselves.
//!
//! Also home to the hex codec, which is the text form every binary value
//! takes on the command line.

use static_assertions::assert_eq_size;
use thiserror::Error;
use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

// ── Envelope Header ──────────────────────────────────────────────────────────

/// Length prefix of a packed result.
///
/// Wire size: 4 bytes.
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes)]
#[repr(C)]
pub struct ResultHeader {
    /// Payload length in bytes, not including this header.
    pub len: U32<LittleEndian>,
}

assert_eq_size!(ResultHeader, [u8; 4]);

/// Size of the length prefix.
pub const RESULT_HEADER_LEN: usize = 4;

/// Build a packed result. `None` packs to the 4-byte absent marker.
///
/// Payloads beyond `u32::MAX` bytes have no representation.
pub fn pack(payload: Option<&[u8]>) -> Result<Vec<u8>, WireError> {
    let payload = payload.unwrap_or_default();
    let len = u32::try_from(payload.len()).map_err(|_| WireError::PayloadTooLarge(payload.len()))?;

    let header = ResultHeader { len: U32::new(len) };
    let mut out = Vec::with_capacity(RESULT_HEADER_LEN + payload.len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Read the payload out of a packed result.
///
/// Bytes past the declared length are ignored. A buffer too short for its
/// own prefix is an error rather than a partial read.
pub fn unpack(buf: &[u8]) -> Result<&[u8], WireError> {
    let header = ResultHeader::read_from_prefix(buf).ok_or(WireError::Truncated(buf.len()))?;
    let declared = header.len.get() as usize;
    let body = &buf[RESULT_HEADER_LEN..];
    if declared > body.len() {
        return Err(WireError::LengthMismatch {
            declared,
            available: body.len(),
        });
    }
    Ok(&body[..declared])
}

/// Total allocation size of a packed result, read from its prefix.
pub fn packed_len(header: &[u8; RESULT_HEADER_LEN]) -> usize {
    RESULT_HEADER_LEN + u32::from_le_bytes(*header) as usize
}

// ── Hex ───────────────────────────────────────────────────────────────────────

/// Lowercase ASCII hex, two characters per input byte.
pub fn hex_encode(data: &[u8]) -> Vec<u8> {
    hex::encode(data).into_bytes()
}

/// Decode ASCII hex of either case. Odd lengths and non-hex characters fail.
pub fn hex_decode(text: &[u8]) -> Result<Vec<u8>, WireError> {
    Ok(hex::decode(text)?)
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireError {
    #[error("packed result truncated: {0} bytes is shorter than the length prefix")]
    Truncated(usize),

    #[error("packed result declares {declared} payload bytes but only {available} follow")]
    LengthMismatch { declared: usize, available: usize },

    #[error("payload of {0} bytes does not fit a 32-bit length prefix")]
    PayloadTooLarge(usize),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
