use clap::Parser;
use sea_temps::cli::{init_logging, run, Cli};
use sea_temps::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    run(cli).await
}
