use anyhow::anyhow;
use nuvylux_shared::telemetry::{self, DEFAULT_FILTER};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

const APP_NAME: &str = "nuvylux_cli";

/// Traces go to a JSON file unless `--stdout` is set or the file cannot be
/// created. Readable lines then go to stderr, stdout is kept for command output
pub fn init(cli: &Cli) -> anyhow::Result<()> {
    if !cli.is_to_std_out {
        match init_to_file() {
            Ok(path) => {
                eprintln!("Tracing to {path:?}");
                return Ok(());
            }
            Err(e) => eprintln!("Failed to start tracing to file, using stderr instead: {e:#}"),
        }
    }
    init_to_stderr()
}

fn init_to_file() -> anyhow::Result<PathBuf> {
    let (file, path) = telemetry::create_trace_file(APP_NAME)?;
    let subscriber = telemetry::get_subscriber(APP_NAME.into(), DEFAULT_FILTER, file);
    telemetry::init_subscriber(subscriber)?;
    Ok(path)
}

fn init_to_stderr() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to start tracing to stderr: {e}"))
}
