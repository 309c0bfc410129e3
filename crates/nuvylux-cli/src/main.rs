#![warn(clippy::all, rust_2018_idioms)]

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = nuvylux_cli::cli::Cli::parse();

    if let Err(e) = nuvylux_cli::tracing::init(&args) {
        eprintln!("Failed to start tracing: {e}");
    }

    nuvylux_cli::run(args).await
}
