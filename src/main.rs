//! zhihu-dl command line entry point
//!
//! `zhihu-dl serve` runs the web form and REST API; `zhihu-dl fetch` runs a
//! single batch from a file or stdin.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use zhihu_dl::{BatchOrchestrator, Config, Credential, Error, Result};

/// Batch retrieval of Zhihu content to local storage
#[derive(Parser, Debug)]
#[command(name = "zhihu-dl")]
#[command(version)]
#[command(about = "Batch retrieval of Zhihu content to local storage", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// JSON configuration file
    #[arg(long, short = 'c', env = "ZHIHU_DL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory retrieved files are written to
    #[arg(long, env = "ZHIHU_DL_OUTPUT_DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Append-only log of failed URLs
    #[arg(long, env = "ZHIHU_DL_FAILURE_LOG", global = true)]
    failure_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the submission form and REST API
    Serve {
        /// Address to listen on
        #[arg(long, env = "ZHIHU_DL_BIND")]
        bind: Option<SocketAddr>,
    },

    /// Run one batch and print the summary
    Fetch {
        /// Cookie string, or @path to read it from a file
        #[arg(long, env = "ZHIHU_DL_COOKIES", default_value = "")]
        cookies: String,

        /// File with one URL per line (stdin if omitted)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli.global)?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.api.bind_address = bind;
            }
            config.validate()?;

            let config = Arc::new(config);
            let orchestrator = BatchOrchestrator::from_config(&config)?;
            zhihu_dl::api::start_api_server(orchestrator, config, zhihu_dl::shutdown_signal())
                .await
        }
        Commands::Fetch { cookies, input } => {
            config.validate()?;

            let credential = read_credential(&cookies).await?;
            let raw = match input {
                Some(path) => tokio::fs::read_to_string(&path).await?,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin().read_to_string(&mut buf).await?;
                    buf
                }
            };

            let orchestrator = BatchOrchestrator::from_config(&config)?;
            let summary = orchestrator.run_batch(&raw, &credential).await?;

            println!("{}", summary.message);
            println!(
                "{} of {} succeeded; failures are listed in {}",
                summary.succeeded,
                summary.total,
                orchestrator.failure_log().path().display()
            );
            Ok(())
        }
    }
}

/// Config file (or defaults) with command line overrides applied
fn load_config(args: &GlobalArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(dir) = &args.output_dir {
        config.output.output_dir = dir.clone();
    }
    if let Some(log) = &args.failure_log {
        config.output.failure_log = log.clone();
    }

    Ok(config)
}

async fn read_credential(value: &str) -> Result<Credential> {
    match value.strip_prefix('@') {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| Error::Config {
                    message: format!("cannot read cookie file {}: {}", path, e),
                    key: Some("cookies".to_string()),
                })?;
            Ok(Credential::new(content.trim()))
        }
        None => Ok(Credential::new(value)),
    }
}
