use anyhow::Result;
use clap::Parser;

use careers::cli::{self, Cli};
use careers::{init_tracing, LogTarget};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Warnings only unless RUST_LOG says otherwise; results own stdout.
    init_tracing("warn", LogTarget::Stderr);

    cli::run(cli).await
}
