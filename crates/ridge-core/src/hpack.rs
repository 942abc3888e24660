//! HPACK header compression (RFC 7541).
//!
//! The decoder handles every field representation in §6 and keeps a
//! dynamic table for the lifetime of one [`Decoder`]. The boundary
//! operations create a fresh decoder per block, so a block may only
//! reference dynamic entries it inserted itself.
//!
//! A one-byte indexed field can expand to a full table entry, so decoded
//! output is capped: the header list may not exceed
//! [`DEFAULT_MAX_LIST_SIZE`] octets, counted as in RFC 7540 §6.5.2
//! (name + value + 32 per field).
//!
//! The encoder never indexes. It emits an indexed field on an exact static
//! match, otherwise a literal without indexing that borrows a static name
//! where one exists. Strings are Huffman coded only when that is strictly
//! shorter.

use std::collections::VecDeque;

use thiserror::Error;

use crate::header::{Header, HeaderError};
use crate::huffman::{self, HuffmanError};

/// SETTINGS_HEADER_TABLE_SIZE default (RFC 7540 §6.5.2).
pub const DEFAULT_TABLE_SIZE: usize = 4096;

/// Ceiling on the decoded header list, in SETTINGS_MAX_HEADER_LIST_SIZE units.
pub const DEFAULT_MAX_LIST_SIZE: usize = 64 * 1024;

// ── Static Table (Appendix A) ────────────────────────────────────────────────

#[rustfmt::skip]
static STATIC_TABLE: [(&str, &str); 61] = [
    (":authority", ""),
    (":method", "GET"),
    (":method", "POST"),
    (":path", "/"),
    (":path", "/index.html"),
    (":scheme", "http"),
    (":scheme", "https"),
    (":status", "200"),
    (":status", "204"),
    (":status", "206"),
    (":status", "304"),
    (":status", "400"),
    (":status", "404"),
    (":status", "500"),
    ("accept-charset", ""),
    ("accept-encoding", "gzip, deflate"),
    ("accept-language", ""),
    ("accept-ranges", ""),
    ("accept", ""),
    ("access-control-allow-origin", ""),
    ("age", ""),
    ("allow", ""),
    ("authorization", ""),
    ("cache-control", ""),
    ("content-disposition", ""),
    ("content-encoding", ""),
    ("content-language", ""),
    ("content-length", ""),
    ("content-location", ""),
    ("content-range", ""),
    ("content-type", ""),
    ("cookie", ""),
    ("date", ""),
    ("etag", ""),
    ("expect", ""),
    ("expires", ""),
    ("from", ""),
    ("host", ""),
    ("if-match", ""),
    ("if-modified-since", ""),
    ("if-none-match", ""),
    ("if-range", ""),
    ("if-unmodified-since", ""),
    ("last-modified", ""),
    ("link", ""),
    ("location", ""),
    ("max-forwards", ""),
    ("proxy-authenticate", ""),
    ("proxy-authorization", ""),
    ("range", ""),
    ("referer", ""),
    ("refresh", ""),
    ("retry-after", ""),
    ("server", ""),
    ("set-cookie", ""),
    ("strict-transport-security", ""),
    ("transfer-encoding", ""),
    ("user-agent", ""),
    ("vary", ""),
    ("via", ""),
    ("www-authenticate", ""),
];

/// 1-based index of an exact (name, value) match.
fn static_exact(header: &Header) -> Option<usize> {
    STATIC_TABLE
        .iter()
        .position(|(n, v)| n.as_bytes() == header.name && v.as_bytes() == header.value)
        .map(|i| i + 1)
}

/// 1-based index of the first entry with this name.
fn static_name(name: &[u8]) -> Option<usize> {
    STATIC_TABLE
        .iter()
        .position(|(n, _)| n.as_bytes() == name)
        .map(|i| i + 1)
}

// ── Dynamic Table ────────────────────────────────────────────────────────────

/// FIFO of inserted fields; the front is the newest (index 62).
#[derive(Debug)]
pub struct DynamicTable {
    entries: VecDeque<Header>,
    size: usize,
    max_size: usize,
}

impl DynamicTable {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            size: 0,
            max_size,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current accounted size in octets.
    pub fn size(&self) -> usize {
        self.size
    }

    fn get(&self, index: usize) -> Option<&Header> {
        self.entries.get(index)
    }

    fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.evict_to(max_size);
    }

    /// An entry larger than the whole table empties it and is not stored
    /// (§4.4).
    fn insert(&mut self, header: Header) {
        let entry_size = header.hpack_size();
        if entry_size > self.max_size {
            self.entries.clear();
            self.size = 0;
            return;
        }
        self.evict_to(self.max_size - entry_size);
        self.size += entry_size;
        self.entries.push_front(header);
    }

    fn evict_to(&mut self, limit: usize) {
        while self.size > limit {
            match self.entries.pop_back() {
                Some(old) => self.size -= old.hpack_size(),
                None => {
                    self.size = 0;
                    break;
                }
            }
        }
    }
}

// ── Primitive codecs (§5) ────────────────────────────────────────────────────

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn peek(&self) -> Result<u8, HpackError> {
        self.buf.get(self.pos).copied().ok_or(HpackError::Truncated)
    }

    fn byte(&mut self) -> Result<u8, HpackError> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], HpackError> {
        let end = self.pos.checked_add(n).ok_or(HpackError::Truncated)?;
        let slice = self.buf.get(self.pos..end).ok_or(HpackError::Truncated)?;
        self.pos = end;
        Ok(slice)
    }

    /// Prefix-coded integer; values beyond `u32::MAX` are rejected.
    fn integer(&mut self, prefix_bits: u8) -> Result<usize, HpackError> {
        let mask = ((1u16 << prefix_bits) - 1) as u8;
        let mut value = u64::from(self.byte()? & mask);
        if value < u64::from(mask) {
            return Ok(value as usize);
        }

        let mut shift = 0u32;
        loop {
            let b = self.byte()?;
            value += u64::from(b & 0x7f) << shift;
            if value > u64::from(u32::MAX) {
                return Err(HpackError::IntegerOverflow);
            }
            if b & 0x80 == 0 {
                return Ok(value as usize);
            }
            shift += 7;
            if shift > 28 {
                return Err(HpackError::IntegerOverflow);
            }
        }
    }

    fn string(&mut self) -> Result<Vec<u8>, HpackError> {
        let huffman_coded = self.peek()? & 0x80 != 0;
        let len = self.integer(7)?;
        let raw = self.take(len)?;
        if huffman_coded {
            Ok(huffman::decode(raw)?)
        } else {
            Ok(raw.to_vec())
        }
    }
}

fn encode_integer(out: &mut Vec<u8>, value: usize, prefix_bits: u8, flags: u8) {
    let max = (1usize << prefix_bits) - 1;
    if value < max {
        out.push(flags | value as u8);
        return;
    }
    out.push(flags | max as u8);
    let mut rest = value - max;
    while rest >= 0x80 {
        out.push((rest & 0x7f) as u8 | 0x80);
        rest >>= 7;
    }
    out.push(rest as u8);
}

fn encode_string(out: &mut Vec<u8>, data: &[u8]) {
    let coded_len = huffman::encoded_len(data);
    if coded_len < data.len() {
        encode_integer(out, coded_len, 7, 0x80);
        out.extend_from_slice(&huffman::encode(data));
    } else {
        encode_integer(out, data.len(), 7, 0x00);
        out.extend_from_slice(data);
    }
}

// ── Decoder ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Decoder {
    table: DynamicTable,
    /// Ceiling a size update may raise the table to.
    max_table_size: usize,
    max_list_size: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_SIZE)
    }
}

impl Decoder {
    pub fn new(max_table_size: usize) -> Self {
        Self {
            table: DynamicTable::new(max_table_size),
            max_table_size,
            max_list_size: DEFAULT_MAX_LIST_SIZE,
        }
    }

    pub fn with_max_list_size(mut self, max_list_size: usize) -> Self {
        self.max_list_size = max_list_size;
        self
    }

    pub fn table(&self) -> &DynamicTable {
        &self.table
    }

    fn lookup(&self, index: usize) -> Result<Header, HpackError> {
        match index {
            0 => Err(HpackError::ZeroIndex),
            1..=61 => {
                let (name, value) = STATIC_TABLE[index - 1];
                Ok(Header::new(name, value))
            }
            _ => self
                .table
                .get(index - STATIC_TABLE.len() - 1)
                .cloned()
                .ok_or(HpackError::InvalidIndex(index)),
        }
    }

    fn literal(&self, reader: &mut Reader<'_>, prefix_bits: u8) -> Result<Header, HpackError> {
        let index = reader.integer(prefix_bits)?;
        let name = if index == 0 {
            reader.string()?
        } else {
            self.lookup(index)?.name
        };
        let value = reader.string()?;
        Ok(Header { name, value })
    }

    /// Decode one complete header block.
    pub fn decode(&mut self, block: &[u8]) -> Result<Vec<Header>, HpackError> {
        let mut reader = Reader::new(block);
        let mut list = HeaderList::new(self.max_list_size);

        while !reader.at_end() {
            let first = reader.peek()?;
            if first & 0x80 != 0 {
                // §6.1 indexed field
                let index = reader.integer(7)?;
                list.push(self.lookup(index)?)?;
            } else if first & 0xc0 == 0x40 {
                // §6.2.1 literal with incremental indexing
                let header = self.literal(&mut reader, 6)?;
                self.table.insert(header.clone());
                list.push(header)?;
            } else if first & 0xe0 == 0x20 {
                // §6.3 dynamic table size update
                if !list.headers.is_empty() {
                    return Err(HpackError::LateTableSizeUpdate);
                }
                let size = reader.integer(5)?;
                if size > self.max_table_size {
                    return Err(HpackError::TableSizeTooLarge(size));
                }
                self.table.set_max_size(size);
            } else {
                // §6.2.2 without indexing (0000) and §6.2.3 never indexed (0001)
                list.push(self.literal(&mut reader, 4)?)?;
            }
        }
        Ok(list.headers)
    }
}

/// Decoded fields plus their running accounted size.
struct HeaderList {
    headers: Vec<Header>,
    size: usize,
    limit: usize,
}

impl HeaderList {
    fn new(limit: usize) -> Self {
        Self {
            headers: Vec::new(),
            size: 0,
            limit,
        }
    }

    fn push(&mut self, header: Header) -> Result<(), HpackError> {
        self.size = self.size.saturating_add(header.hpack_size());
        if self.size > self.limit {
            return Err(HpackError::HeaderListTooLarge(self.limit));
        }
        self.headers.push(header);
        Ok(())
    }
}

// ── Encoder ──────────────────────────────────────────────────────────────────

/// Encode a header list without touching any dynamic table.
pub fn encode(headers: &[Header]) -> Vec<u8> {
    let mut out = Vec::new();
    for header in headers {
        if let Some(index) = static_exact(header) {
            encode_integer(&mut out, index, 7, 0x80);
            continue;
        }
        match static_name(&header.name) {
            Some(index) => encode_integer(&mut out, index, 4, 0x00),
            None => {
                out.push(0x00);
                encode_string(&mut out, &header.name);
            }
        }
        encode_string(&mut out, &header.value);
    }
    out
}

// ── Text conversions ─────────────────────────────────────────────────────────

/// Decode a block with a fresh decoder and render it as header text.
pub fn decompress(block: &[u8]) -> Result<Vec<u8>, HpackError> {
    let headers = Decoder::default().decode(block)?;
    Ok(crate::header::serialize_list(&headers)?)
}

/// Parse header text and encode it as a block.
pub fn compress(text: &[u8]) -> Result<Vec<u8>, HpackError> {
    let headers = crate::header::parse_list(text)?;
    Ok(encode(&headers))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HpackError {
    #[error("header block truncated")]
    Truncated,

    #[error("prefix integer exceeds 32 bits")]
    IntegerOverflow,

    #[error("index 0 is not a valid table reference")]
    ZeroIndex,

    #[error("index {0} is past the end of the header table")]
    InvalidIndex(usize),

    #[error("table size update to {0} exceeds the negotiated maximum")]
    TableSizeTooLarge(usize),

    #[error("table size update after the first header field")]
    LateTableSizeUpdate,

    #[error("decoded header list exceeds {0} octets")]
    HeaderListTooLarge(usize),

    #[error(transparent)]
    Huffman(#[from] HuffmanError),

    #[error(transparent)]
    Field(#[from] HeaderError),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
