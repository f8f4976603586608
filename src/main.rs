//! CLI entry point for the API client.
//!
//! Sends a single GET, POST, PUT or PATCH request against the configured API
//! and prints the JSON response to stdout.

use anyhow::{Context, Result};
use api_client::ApiClient;
use api_client::config::ClientConfiguration;
use api_client::output::{Format, write_json};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "api_client")]
#[command(about = "Send JSON requests to an HTTP API", long_about = None)]
struct Cli {
    /// Base URL of the API (overrides API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Access token sent as `Authorization: Token <TOKEN>` (overrides API_ACCESS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// JSON file holding `base_url` and `access_token`
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<String>,

    /// Log failures and print `{}` instead of exiting with an error
    #[arg(long, global = true, default_value_t = false)]
    lenient: bool,

    /// Print the response on a single line
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a GET request
    Get {
        /// Path appended to the base URL
        path: String,
    },
    /// Send a POST request with a JSON body
    Post {
        /// Path appended to the base URL
        path: String,

        /// JSON request body
        #[arg(short, long, default_value = "{}")]
        data: String,
    },
    /// Send a PUT request with a JSON body
    Put {
        /// Path appended to the base URL
        path: String,

        /// JSON request body
        #[arg(short, long, default_value = "{}")]
        data: String,
    },
    /// Send a PATCH request with a JSON body
    Patch {
        /// Path appended to the base URL
        path: String,

        /// JSON request body
        #[arg(short, long, default_value = "{}")]
        data: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/api_client.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("api_client.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    let client = ApiClient::new(config).context("Failed to build API client")?;
    info!(base_url = %client.base_url(), "Client ready");

    let response = send(&client, &cli).await?;

    let format = if cli.compact {
        Format::Compact
    } else {
        Format::Pretty
    };
    write_json(&mut std::io::stdout().lock(), &response, format)?;

    Ok(())
}

/// Layers configuration sources: file or environment, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<ClientConfiguration> {
    let mut config = match &cli.config {
        Some(path) => ClientConfiguration::load(path)
            .with_context(|| format!("Failed to load config from '{path}'"))?,
        None => ClientConfiguration::from_env(),
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = Some(base_url.clone());
    }
    if let Some(token) = &cli.token {
        config.access_token = Some(token.clone());
    }

    debug!(?config, "Configuration resolved");
    Ok(config)
}

fn parse_body(data: &str) -> Result<Value> {
    serde_json::from_str(data).context("--data must be valid JSON")
}

#[tracing::instrument(skip_all, fields(lenient = cli.lenient))]
async fn send(client: &ApiClient, cli: &Cli) -> Result<Value> {
    if cli.lenient {
        let lenient = client.lenient();
        let response = match &cli.command {
            Commands::Get { path } => lenient.get(path).await,
            Commands::Post { path, data } => lenient.post(path, &parse_body(data)?).await,
            Commands::Put { path, data } => lenient.put(path, &parse_body(data)?).await,
            Commands::Patch { path, data } => lenient.patch(path, &parse_body(data)?).await,
        };
        return Ok(response);
    }

    let response = match &cli.command {
        Commands::Get { path } => client.get(path).await?,
        Commands::Post { path, data } => client.post(path, &parse_body(data)?).await?,
        Commands::Put { path, data } => client.put(path, &parse_body(data)?).await?,
        Commands::Patch { path, data } => client.patch(path, &parse_body(data)?).await?,
    };
    Ok(response)
}
