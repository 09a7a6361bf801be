use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use status_monitor::config::{MonitoringConfig, ProbeConfig};
use status_monitor::ingest::RemoteForwarder;
use status_monitor::monitor::{Aggregator, ObservationBuilder, StatusFileWriter};
use status_monitor::probe::ServiceProber;

#[derive(Parser)]
#[command(name = "status-cli")]
#[command(about = "Management CLI for the status monitor", long_about = None)]
struct Cli {
    /// Base URL of a running monitor instance.
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check monitor liveness
    Status,
    /// Aggregate health of every tracked subject
    Health,
    /// Latest observation for one service
    Service { name: String },
    /// Upload an observation document (a JSON file)
    Submit { path: PathBuf },
    /// Run one probing round on this host, without a running monitor
    Round {
        /// Service units to probe (defaults to the stock set)
        #[arg(short, long)]
        service: Vec<String>,

        /// Application name derived from the probed services
        #[arg(short, long, default_value = "app1")]
        application: String,

        /// Directory for per-observation JSON files
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Remote /add endpoint to upload results to
        #[arg(short, long)]
        ingest: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "status_monitor=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client
                .get(format!("{}/healthcheck", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Service { name } => {
            let res = client
                .get(format!("{}/healthcheck/{}", cli.url, name))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Submit { path } => {
            let body = tokio::fs::read(&path).await?;
            let part = reqwest::multipart::Part::bytes(body)
                .file_name(
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "observation.json".to_string()),
                )
                .mime_str("application/json")?;
            let form = reqwest::multipart::Form::new().part("file", part);
            let res = client
                .post(format!("{}/add", cli.url))
                .multipart(form)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Round {
            service,
            application,
            out,
            ingest,
        } => {
            run_round(service, application, out, ingest).await?;
        }
    }

    Ok(())
}

/// The disconnected-prober path: probe locally, keep files, optionally
/// upload to a remote monitor. No store involved.
async fn run_round(
    services: Vec<String>,
    application: String,
    out: Option<PathBuf>,
    ingest: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let defaults = MonitoringConfig::default();
    let config = MonitoringConfig {
        services: if services.is_empty() {
            defaults.services
        } else {
            services
        },
        application_name: application,
        output_dir: None,
        ingest_url: None,
    };

    let mut aggregator = Aggregator::new(
        ServiceProber::new(&ProbeConfig::default()),
        ObservationBuilder::from_host(),
        &config,
    );
    if let Some(dir) = out {
        aggregator = aggregator.with_writer(StatusFileWriter::create(dir)?);
    }
    if let Some(url) = ingest {
        aggregator = aggregator.with_forwarder(RemoteForwarder::new(url));
    }

    let round = aggregator.run_round().await;
    for observation in &round {
        println!("{}: {}", observation.subject_name(), observation.status());
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: monitor answered {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
