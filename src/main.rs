use anyhow::Result;
use clap::Parser;

use minibatch::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
