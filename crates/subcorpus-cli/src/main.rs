mod commands;
mod logging;

use clap::Parser;
use commands::Commands;

/// subcorpus: subtitle corpus preparation and tokenizer bootstrapping.
#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.command.run()
}
