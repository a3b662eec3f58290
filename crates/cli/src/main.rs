mod args;

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use torrengo_core::{
    load_config, load_optional_config, validate_config, Config, Pipeline, PipelineError,
    PipelineOutcome, SequenceError, SourceRegistry,
};

use args::Args;

/// Environment variable naming an explicit config file
const CONFIG_ENV: &str = "TORRENGO_CONFIG";

/// Config file used when TORRENGO_CONFIG is not set
const DEFAULT_CONFIG_PATH: &str = "torrengo.toml";

/// Exit status when the torrent was downloaded but the client failed
const EXIT_LAUNCH_FAILED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = load()?;

    let request = args
        .to_request(&config.search.default_source)
        .context("Invalid search")?;

    let registry =
        SourceRegistry::from_config(&config).context("Failed to initialize sources")?;
    info!(sources = ?registry.names(), "Sources initialized");

    let pipeline = Pipeline::from_config(&config, registry);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match pipeline.run(&request, stdin.lock(), &mut stdout).await? {
        PipelineOutcome::NoResults => info!("Nothing to download"),
        PipelineOutcome::Launched(outcome) => info!(
            path = %outcome.path.display(),
            client = %outcome.client,
            "Torrent opened in client"
        ),
    }

    Ok(())
}

/// Where configuration is read from.
#[derive(Debug, PartialEq, Eq)]
enum ConfigLocation {
    /// Named by TORRENGO_CONFIG; the file must exist.
    Explicit(PathBuf),
    /// The default file; built-in defaults apply when it is missing.
    Default(PathBuf),
}

impl ConfigLocation {
    fn from_env_value(value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => ConfigLocation::Explicit(PathBuf::from(path)),
            _ => ConfigLocation::Default(PathBuf::from(DEFAULT_CONFIG_PATH)),
        }
    }
}

fn load() -> Result<Config> {
    load_from(&ConfigLocation::from_env_value(std::env::var_os(CONFIG_ENV)))
}

/// Load and validate configuration.
fn load_from(location: &ConfigLocation) -> Result<Config> {
    let config = match location {
        ConfigLocation::Explicit(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        ConfigLocation::Default(path) => load_optional_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
    };

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so they never interleave with the result table
    if std::env::var("TORRENGO_LOG_FORMAT").as_deref() == Ok("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

/// A failed launch still left the torrent on disk, so it gets its own status.
fn exit_status(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<PipelineError>() {
        Some(PipelineError::Sequence(SequenceError::Launch { .. })) => EXIT_LAUNCH_FAILED,
        _ => 1,
    }
}
