//! HTTP/2 frame layer (RFC 7540 §4.1).
//!
//! ```text
//! +-----------------------------------------------+
//! |                 Length (24)                   |
//! +---------------+---------------+---------------+
//! |   Type (8)    |   Flags (8)   |
//! +-+-------------+---------------+-------------------------------+
//! |R|                 Stream Identifier (31)                      |
//! +=+=============================================================+
//! |                   Frame Payload (0...)                      ...
//! +---------------------------------------------------------------+
//! ```
//!
//! Parsing accepts exactly one frame: the input must be the header plus the
//! declared payload with nothing after it. Payload contents are not
//! interpreted beyond the fixed sizes some frame types carry.

use static_assertions::assert_eq_size;
use thiserror::Error;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

pub const FRAME_HEADER_LEN: usize = 9;

/// Largest length a 24-bit field can carry.
pub const MAX_PAYLOAD_LEN: usize = (1 << 24) - 1;

const STREAM_ID_MASK: u32 = 0x7fff_ffff;

// ── Frame Header ─────────────────────────────────────────────────────────────

/// Fixed 9-byte frame header, big-endian on the wire.
///
/// Wire size: 9 bytes.
#[derive(Debug, Clone, AsBytes, FromBytes, FromZeroes)]
#[repr(C, packed)]
pub struct FrameHeader {
    /// Payload length, 24-bit big-endian.
    pub length: [u8; 3],
    pub frame_type: u8,
    pub flags: u8,
    /// High bit reserved; ignored on read, cleared on write.
    pub stream_id: [u8; 4],
}

assert_eq_size!(FrameHeader, [u8; 9]);

impl FrameHeader {
    pub fn payload_len(&self) -> usize {
        let [a, b, c] = self.length;
        u32::from_be_bytes([0, a, b, c]) as usize
    }

    pub fn stream_id(&self) -> u32 {
        u32::from_be_bytes(self.stream_id) & STREAM_ID_MASK
    }
}

// ── Frame Type ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    Data = 0x0,
    Headers = 0x1,
    Priority = 0x2,
    RstStream = 0x3,
    Settings = 0x4,
    PushPromise = 0x5,
    Ping = 0x6,
    GoAway = 0x7,
    WindowUpdate = 0x8,
    Continuation = 0x9,
}

impl FrameType {
    fn check_payload(self, len: usize) -> Result<(), FrameError> {
        let ok = match self {
            FrameType::Priority => len == 5,
            FrameType::RstStream | FrameType::WindowUpdate => len == 4,
            FrameType::Ping => len == 8,
            FrameType::Settings => len % 6 == 0,
            FrameType::GoAway => len >= 8,
            FrameType::PushPromise => len >= 4,
            FrameType::Data | FrameType::Headers | FrameType::Continuation => true,
        };
        if ok {
            Ok(())
        } else {
            Err(FrameError::BadPayloadSize { frame_type: self, len })
        }
    }
}

impl TryFrom<u8> for FrameType {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x0 => Ok(FrameType::Data),
            0x1 => Ok(FrameType::Headers),
            0x2 => Ok(FrameType::Priority),
            0x3 => Ok(FrameType::RstStream),
            0x4 => Ok(FrameType::Settings),
            0x5 => Ok(FrameType::PushPromise),
            0x6 => Ok(FrameType::Ping),
            0x7 => Ok(FrameType::GoAway),
            0x8 => Ok(FrameType::WindowUpdate),
            0x9 => Ok(FrameType::Continuation),
            other => Err(FrameError::UnknownType(other)),
        }
    }
}

impl From<FrameType> for u8 {
    fn from(t: FrameType) -> u8 {
        t as u8
    }
}

// ── Frame ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub frame_type: FrameType,
    pub flags: u8,
    /// 31-bit stream identifier.
    pub stream_id: u32,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        let header =
            FrameHeader::read_from_prefix(bytes).ok_or(FrameError::Truncated(bytes.len()))?;
        let frame_type = FrameType::try_from(header.frame_type)?;
        let payload = &bytes[FRAME_HEADER_LEN..];
        let declared = header.payload_len();
        if payload.len() != declared {
            return Err(FrameError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }
        frame_type.check_payload(declared)?;

        Ok(Self {
            frame_type,
            flags: header.flags,
            stream_id: header.stream_id(),
            payload: payload.to_vec(),
        })
    }

    pub fn header(&self) -> Result<FrameHeader, FrameError> {
        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLarge(self.payload.len()));
        }
        let [_, a, b, c] = (self.payload.len() as u32).to_be_bytes();
        Ok(FrameHeader {
            length: [a, b, c],
            frame_type: self.frame_type.into(),
            flags: self.flags,
            stream_id: (self.stream_id & STREAM_ID_MASK).to_be_bytes(),
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FrameError> {
        let header = self.header()?;
        let mut out = Vec::with_capacity(FRAME_HEADER_LEN + self.payload.len());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&self.payload);
        Ok(out)
    }
}

/// Parse one frame and write it back in canonical form.
pub fn canonicalize(bytes: &[u8]) -> Result<Vec<u8>, FrameError> {
    Frame::parse(bytes)?.to_bytes()
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame truncated: {0} bytes is shorter than the 9-byte header")]
    Truncated(usize),

    #[error("unknown frame type {0:#04x}")]
    UnknownType(u8),

    #[error("header declares {declared} payload bytes but {actual} follow")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("{frame_type:?} frame cannot carry a {len}-byte payload")]
    BadPayloadSize { frame_type: FrameType, len: usize },

    #[error("payload of {0} bytes exceeds the 24-bit length field")]
    PayloadTooLarge(usize),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
