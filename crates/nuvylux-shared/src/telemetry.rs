use anyhow::Context;
use chrono::NaiveDateTime;
use std::{
    fs::{create_dir_all, File},
    path::PathBuf,
};
use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Relative to the working directory, one sub folder per app
pub const TRACE_FOLDER: &str = "traces";

/// Used when `RUST_LOG` is not set. The gateway is chatty at debug, the HTTP
/// stack below it is not useful below warn
pub const DEFAULT_FILTER: &str = "info,nuvylux_client_core=debug,hyper=warn,reqwest=warn";

/// Bunyan JSON subscriber writing to `sink`.
///
/// `RUST_LOG` wins over `default_env_filter_directive`. For the directive
/// syntax see <https://docs.rs/tracing-subscriber/0.3.19/tracing_subscriber/filter/struct.EnvFilter.html#directives>
pub fn get_subscriber<Sink, S>(
    name: String,
    default_env_filter_directive: S,
    sink: Sink,
) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    S: AsRef<str>,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_env_filter_directive));
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name, sink))
}

/// Installs `subscriber` globally and routes `log` records into it. Fails if
/// called twice
pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) -> anyhow::Result<()> {
    LogTracer::init().context("failed to route log records to tracing")?;
    set_global_default(subscriber).context("failed to set global subscriber")?;
    Ok(())
}

fn trace_file_path(app_name: &str, started_at: NaiveDateTime) -> PathBuf {
    PathBuf::from(TRACE_FOLDER)
        .join(app_name)
        .join(format!("{}.log", started_at.format("%Y-%m-%dT%H-%M-%S")))
}

/// Creates `traces/{app_name}/{start time}.log`, returns the open file and
/// its path
pub fn create_trace_file(app_name: &str) -> anyhow::Result<(File, PathBuf)> {
    let file_path = trace_file_path(app_name, chrono::Local::now().naive_local());
    if let Some(folder) = file_path.parent() {
        create_dir_all(folder)
            .with_context(|| format!("failed to create trace folder: {folder:?}"))?;
    }
    let file = File::create(&file_path)
        .with_context(|| format!("failed to create trace file: {file_path:?}"))?;
    Ok((file, file_path))
}
