//! CLI command modules and shared output rendering.

pub mod config;
pub mod keys;
pub mod run;

use anyhow::{Context, Result};
use std::io::Write;

use crate::config::{OutputConfig, OutputFormat};

/// Renders named byte fields as hex lines or one JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: OutputFormat,
    uppercase: bool,
    raw: bool,
}

impl Output {
    pub fn new(config: &OutputConfig, raw: bool) -> Self {
        Self {
            format: config.format,
            uppercase: config.uppercase_hex,
            raw,
        }
    }

    pub fn hex(&self, bytes: &[u8]) -> String {
        if self.uppercase {
            hex::encode_upper(bytes)
        } else {
            hex::encode(bytes)
        }
    }

    /// Text form of `fields` for the configured format. A single field in
    /// hex mode is printed bare.
    pub fn render(&self, label: &str, fields: &[(&str, &[u8])]) -> String {
        match self.format {
            OutputFormat::Json => {
                let mut obj = serde_json::Map::new();
                obj.insert("op".into(), label.into());
                for (name, bytes) in fields {
                    obj.insert((*name).into(), self.hex(bytes).into());
                }
                serde_json::Value::Object(obj).to_string()
            }
            OutputFormat::Hex => match fields {
                [(_, bytes)] => self.hex(bytes),
                _ => fields
                    .iter()
                    .map(|(name, bytes)| format!("{name}: {}", self.hex(bytes)))
                    .collect::<Vec<_>>()
                    .join("\n"),
            },
        }
    }

    pub fn emit(&self, label: &str, fields: &[(&str, &[u8])]) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        if self.raw {
            for (_, bytes) in fields {
                stdout.write_all(bytes).context("failed to write stdout")?;
            }
        } else {
            writeln!(stdout, "{}", self.render(label, fields)).context("failed to write stdout")?;
        }
        Ok(())
    }
}
