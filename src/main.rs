use anyhow::Result;
use clap::Parser;
use wallet_ledger::cli::Cli;
use wallet_ledger::observability;

fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init(cli.verbose);
    cli.run()
}
