//! Key material from the host's CSPRNG. The boundary itself never
//! generates randomness.

use anyhow::{bail, Context, Result};
use libridge::Host;

use super::Output;

pub fn cmd_random(output: &Output, kind: &str) -> Result<()> {
    let host = Host::new();
    match kind {
        "key" => output.emit("random-key", &[("key", host.random_key().as_slice())]),
        "iv" => output.emit("random-iv", &[("iv", host.random_iv().as_slice())]),
        "scalar" => output.emit("random-scalar", &[("scalar", host.random_scalar().as_slice())]),
        other => bail!("unknown random kind {other:?} (expected key, iv, or scalar)"),
    }
}

/// Fresh X25519 key pair: a random scalar and its public point.
pub fn cmd_keygen(output: &Output) -> Result<()> {
    let host = Host::new();
    let private = host.random_scalar();
    let public = host
        .dh_base(&private)
        .context("dh-base returned an empty result")?;
    output.emit(
        "keygen",
        &[("private", private.as_slice()), ("public", public.as_slice())],
    )
}
