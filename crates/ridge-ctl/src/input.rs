//! Command-line argument sources.
//!
//!   <hex>          bytes given as hex (the default)
//!   hex:<hex>      same, explicit
//!   text:<string>  UTF-8 bytes of the string
//!   @<path>        contents of a file
//!   -              all of stdin
//!
//! An empty hex string is a valid zero-length argument.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};

pub fn read_arg(source: &str, max_bytes: u64) -> Result<Vec<u8>> {
    if source == "-" {
        return read_limited(std::io::stdin().lock(), max_bytes).context("failed to read stdin");
    }
    if let Some(path) = source.strip_prefix('@') {
        return read_file(Path::new(path), max_bytes);
    }
    if let Some(text) = source.strip_prefix("text:") {
        return Ok(text.as_bytes().to_vec());
    }
    let digits = source.strip_prefix("hex:").unwrap_or(source);
    hex::decode(digits).with_context(|| format!("argument {source:?} is not valid hex"))
}

fn read_file(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_limited(file, max_bytes).with_context(|| format!("failed to read {}", path.display()))
}

fn read_limited(reader: impl Read, max_bytes: u64) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(max_bytes.saturating_add(1)).read_to_end(&mut buf)?;
    if buf.len() as u64 > max_bytes {
        bail!("input exceeds the configured limit of {max_bytes} bytes");
    }
    Ok(buf)
}
