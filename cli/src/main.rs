mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::Cli;

pub fn main() -> anyhow::Result<()> {
    logging::init()?;
    let cli = Cli::parse();
    commands::run(cli)
}
