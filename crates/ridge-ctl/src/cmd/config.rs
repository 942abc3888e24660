//! `config init` / `config show`.

use anyhow::{Context, Result};

use crate::config::RidgeConfig;

pub fn cmd_config_init() -> Result<()> {
    let path = RidgeConfig::write_default_if_missing().context("failed to write default config")?;
    println!("Config: {}", path.display());
    Ok(())
}

pub fn cmd_config_show(config: &RidgeConfig) -> Result<()> {
    println!("# {}", RidgeConfig::file_path().display());
    print!("{}", config.to_toml().context("failed to render config")?);
    Ok(())
}
