//! `ops` and `run`: drive any boundary operation from the command line.

use anyhow::{bail, Result};
use libridge::{Host, Op};
use ridge_core::KeyBundle;

use super::Output;
use crate::config::RidgeConfig;
use crate::input;

pub fn cmd_ops() -> Result<()> {
    println!("═══════════════════════════════════════");
    println!("  Operations ({})", Op::ALL.len());
    println!("═══════════════════════════════════════");
    for op in Op::ALL {
        println!("  {:<22} {:<28} {}", op.name(), op.symbol(), op.params().join(" "));
    }
    Ok(())
}

pub fn cmd_run(config: &RidgeConfig, output: &Output, name: &str, sources: &[&str]) -> Result<()> {
    let op = Op::try_from(name)?;
    if sources.len() != op.arity() {
        bail!(
            "{op} takes {} argument(s): {}",
            op.arity(),
            op.params().join(" ")
        );
    }

    let args = sources
        .iter()
        .map(|source| input::read_arg(source, config.input.max_bytes))
        .collect::<Result<Vec<_>>>()?;
    let views: Vec<&[u8]> = args.iter().map(Vec::as_slice).collect();

    tracing::debug!(op = op.name(), arg_count = views.len(), "running");
    let Some(result) = Host::new().call(op, &views) else {
        bail!("{op} failed: the boundary returned an empty result");
    };

    match op {
        Op::TlsHandshakeKeys | Op::TlsApplicationKeys => {
            let Some(bundle) = KeyBundle::from_wire(&result) else {
                bail!("{op} returned {} bytes, expected a 56-byte key bundle", result.len());
            };
            output.emit(
                op.name(),
                &[
                    ("server_key", bundle.server_key.as_slice()),
                    ("server_iv", bundle.server_iv.as_slice()),
                    ("client_key", bundle.client_key.as_slice()),
                    ("client_iv", bundle.client_iv.as_slice()),
                ],
            )
        }
        _ => output.emit(op.name(), &[("result", result.as_slice())]),
    }
}
