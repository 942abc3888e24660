//! ridge-ctl: command-line host for the ridge boundary.
//!
//! Every operation goes through the same exported symbols an embedding
//! runtime would call.

mod cmd;
mod config;
mod input;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use cmd::Output;
use config::RidgeConfig;

fn print_usage() {
    println!("Usage: ridge-ctl [--raw] <command>");
    println!();
    println!("Commands:");
    println!("  ops                      List boundary operations and their arguments");
    println!("  run <op> <arg>...        Run one operation");
    println!("  random key|iv|scalar     Random key material from the OS");
    println!("  keygen                   Random X25519 private scalar and public point");
    println!("  config init              Write the default config file if missing");
    println!("  config show              Print the effective configuration");
    println!();
    println!("Arguments:");
    println!("  <hex> | hex:<hex>        Bytes as hex");
    println!("  text:<string>            UTF-8 bytes of the string");
    println!("  @<path>                  File contents");
    println!("  -                        Standard input");
    println!();
    println!("Options:");
    println!("  --raw                    Write result bytes to stdout unencoded");
    println!();
    println!("Config: {}", RidgeConfig::file_path().display());
}

/// RUST_LOG → config `log.filter` → "warn".
fn init_tracing(config: &RidgeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = RidgeConfig::load().context("failed to load config")?;
    init_tracing(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut raw = false;
    let mut remaining: Vec<&str> = Vec::new();
    for arg in &args {
        if arg == "--raw" {
            raw = true;
        } else {
            remaining.push(arg);
        }
    }
    let output = Output::new(&config.output, raw);

    match remaining.as_slice() {
        ["ops"] => cmd::run::cmd_ops(),
        ["run", op, rest @ ..] => cmd::run::cmd_run(&config, &output, op, rest),
        ["random", kind] => cmd::keys::cmd_random(&output, kind),
        ["keygen"] => cmd::keys::cmd_keygen(&output),
        ["config", "init"] => cmd::config::cmd_config_init(),
        ["config", "show"] => cmd::config::cmd_config_show(&config),
        ["help"] | ["--help"] | ["-h"] | [] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
