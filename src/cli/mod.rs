//! Command-line entry point
//!
//! Resolves the invocation against the base flags plus any `--exp_config`
//! file and prints the final config tree as YAML on stdout.

use anyhow::{Context, Result};
use expcfg::args::{parse_args, prescan};
use expcfg::ConfigError;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn run() -> Result<()> {
    let tokens: Vec<String> = std::env::args().skip(1).collect();

    // RUST_LOG always takes precedence; --debug_on falls back to DEBUG.
    let filter = if prescan(tokens.as_slice()).debug_on {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let config = match parse_args(tokens) {
        Ok(config) => config,
        // Help output and usage errors go through clap's own exit path.
        Err(ConfigError::Cli(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };

    let rendered = serde_yaml::to_string(&config).context("Failed to render config as YAML")?;
    print!("{rendered}");
    Ok(())
}
