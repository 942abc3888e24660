//! Header fields and their line-oriented text form.
//!
//! A header list is rendered as one `name: value\n` line per field. Names
//! may begin with `:` (pseudo-headers) but contain no further colon, so the
//! first `": "` after the first byte always separates name from value.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl Header {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// HPACK table accounting size (RFC 7541 §4.1).
    pub fn hpack_size(&self) -> usize {
        self.name.len() + self.value.len() + 32
    }

    /// Check that the field can be written as a single text line and read
    /// back unchanged.
    pub fn validate(&self) -> Result<(), HeaderError> {
        let Some((_, rest)) = self.name.split_first() else {
            return Err(HeaderError::EmptyName);
        };
        if self.name.iter().any(|&b| b.is_ascii_whitespace() || b == 0) {
            return Err(HeaderError::InvalidName(lossy(&self.name)));
        }
        if rest.contains(&b':') {
            return Err(HeaderError::InvalidName(lossy(&self.name)));
        }
        if self.value.iter().any(|&b| matches!(b, b'\r' | b'\n' | 0)) {
            return Err(HeaderError::InvalidValue(lossy(&self.name)));
        }
        Ok(())
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Render a header list as `name: value\n` lines.
pub fn serialize_list(headers: &[Header]) -> Result<Vec<u8>, HeaderError> {
    let mut out = Vec::new();
    for header in headers {
        header.validate()?;
        out.extend_from_slice(&header.name);
        out.extend_from_slice(b": ");
        out.extend_from_slice(&header.value);
        out.push(b'\n');
    }
    Ok(out)
}

/// Parse `name: value` lines. A trailing newline is optional; blank lines
/// are skipped.
pub fn parse_list(text: &[u8]) -> Result<Vec<Header>, HeaderError> {
    let mut headers = Vec::new();
    for (index, line) in text.split(|&b| b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let split = line
            .windows(2)
            .skip(1)
            .position(|w| w == b": ")
            .map(|p| p + 1)
            .ok_or(HeaderError::MissingSeparator(index + 1))?;
        let header = Header::new(&line[..split], &line[split + 2..]);
        header.validate()?;
        headers.push(header);
    }
    Ok(headers)
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("header name is empty")]
    EmptyName,

    #[error("header name {0:?} contains whitespace, NUL, or an inner colon")]
    InvalidName(String),

    #[error("value of header {0:?} contains CR, LF, or NUL")]
    InvalidValue(String),

    #[error("line {0} has no \": \" separator")]
    MissingSeparator(usize),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
