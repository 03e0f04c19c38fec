use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use callscribe::{HandlerConfig, S3Event, TranscriptionPipeline, handlers::lambda};

/// Callscribe - transcribe, translate and summarize uploaded call recordings
#[derive(Parser, Debug)]
#[command(name = "callscribe")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run (default: serve Lambda invocations)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process a single S3 event read from a JSON file and print the response
    Invoke {
        /// Path to the S3 event JSON
        #[arg(short = 'e', long = "event", value_name = "FILE")]
        event: PathBuf,

        /// Transcription job name (random UUID if not specified)
        #[arg(long = "request-id")]
        request_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // CloudWatch adds its own timestamps and does not render ANSI colors
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        info!("Loading configuration from {}", config_path.display());
        HandlerConfig::from_file(config_path).map_err(|e| anyhow!(e.to_string()))?
    } else {
        HandlerConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
    };

    let pipeline = TranscriptionPipeline::from_config(config)
        .await
        .map_err(|e| anyhow!("Failed to initialize AWS clients: {}", e))?;

    match cli.command {
        Some(Commands::Invoke { event, request_id }) => {
            let contents = std::fs::read_to_string(&event)
                .map_err(|e| anyhow!("Failed to read event file {}: {}", event.display(), e))?;
            let event: S3Event = serde_json::from_str(&contents)
                .map_err(|e| anyhow!("Failed to parse S3 event: {}", e))?;
            let request_id = request_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

            let response = pipeline.handle(&event, &request_id).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        None => {
            info!("Starting Lambda runtime");
            lambda::run(Arc::new(pipeline))
                .await
                .map_err(|e| anyhow!(e.to_string()))?;
        }
    }

    Ok(())
}
