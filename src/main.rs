//! expcfg: resolve an experiment invocation and print the final config

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
