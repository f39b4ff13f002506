//! Config command - print the effective configuration

use super::Context;
use anyhow::{Context as _, Result};

pub fn run(ctx: &Context) -> Result<()> {
    let contents = toml::to_string_pretty(&ctx.config).context("Failed to serialize config")?;

    println!("# Config: {}", ctx.config_path.display());
    println!("# Credentials: {}", ctx.credentials.path().display());
    println!();
    print!("{}", contents);

    Ok(())
}
