//! Relay HTTP server binary.
//!
//! Hosts the prompt function behind axum. Without an API key the function
//! runs in demo mode.

use clap::Parser;
use relay_core::config::{ConfigOverrides, ServiceConfig};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// CLI arguments for the server.
#[derive(Parser, Debug)]
#[command(name = "relay_server", about = "Relay prompt function server")]
struct Args {
    /// Host to bind.
    #[arg(long, env = "RELAY_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Chat API key; overrides `OPENAI_API_KEY`. Unset or "demo-key" runs in demo mode.
    #[arg(long)]
    api_key: Option<String>,

    /// Model identifier; overrides `OPENAI_MODEL`.
    #[arg(long)]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible API; overrides `OPENAI_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Chat API request timeout in seconds; overrides `RELAY_REQUEST_TIMEOUT_SECS`.
    #[arg(long)]
    request_timeout_secs: Option<u64>,
}

impl Args {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig::from_env().with_overrides(ConfigOverrides {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,relay_api=debug,relay_core=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.service_config();

    info!(host = %args.host, port = args.port, model = %config.model, "starting relay_server");

    let state = relay_api::AppState::from_config(&config)?;
    info!(mode = state.handler.mode().as_str(), "completer ready");

    let app = relay_api::router(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    let local_addr = listener.local_addr()?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, shutting down");
            }
            shutdown.cancel();
        }
    });

    info!(addr = %local_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
