mod status_cmd;
mod terminal_output;
mod turn_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use codelens_config::{config_dir, config_file_path, load_and_prepare, CodeLensConfig};
use codelens_gateway::{start_server, GatewayState};
use codelens_logging::{init_logger, LogOptions};

#[derive(Parser)]
#[command(name = "codelens")]
#[command(about = "CodeLens: explain code from questions and screenshots")]
#[command(version)]
struct Cli {
    /// Config file (defaults to `~/.codelens/config.yaml`)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web UI
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Ask the model one question and print the reply
    Ask {
        question: String,
    },
    /// Extract code from a screenshot and ask the model to explain it
    Explain {
        image: PathBuf,
    },
    /// Query a running server's health endpoint
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let mut config = load_and_prepare(&path).await?;

    init_logger(&LogOptions {
        level: config.logging.level.clone(),
        dir: config.logging.dir.as_ref().map(PathBuf::from),
    })?;

    match cli.command {
        Commands::Serve { port, bind } => {
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(bind) = bind {
                config.gateway.bind = bind;
            }
            run_server(config).await?;
        }
        Commands::Ask { question } => turn_cmd::ask(&config, question).await?,
        Commands::Explain { image } => turn_cmd::explain(&config, &image).await?,
        Commands::Status => status_cmd::run(&config).await?,
    }

    Ok(())
}

async fn run_server(config: CodeLensConfig) -> Result<()> {
    info!(
        addr = %config.gateway.addr(),
        model = %config.model.model,
        model_url = %config.model.base_url,
        ocr = %config.ocr.command,
        "Starting CodeLens"
    );

    let state = GatewayState::from_config(&config);
    start_server(&config.gateway.addr(), state).await
}
