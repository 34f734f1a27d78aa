use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use relay_core::config::{ConfigOverrides, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "relay_cli", about = "Run the Relay prompt function locally")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version.
    Version,
    /// Run one invocation and print the response envelope.
    Invoke(InvokeArgs),
}

#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// HTTP method of the invocation.
    #[arg(long, default_value = "POST")]
    pub method: String,

    /// JSON request body.
    #[arg(long, conflicts_with = "body_file", required_unless_present = "body_file")]
    pub body: Option<String>,

    /// File holding the JSON request body.
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Chat API key; overrides `OPENAI_API_KEY`. Unset or "demo-key" runs in demo mode.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Overrides `OPENAI_MODEL`.
    #[arg(long)]
    pub model: Option<String>,

    /// Overrides `OPENAI_BASE_URL`.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Overrides `RELAY_REQUEST_TIMEOUT_SECS`.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}

impl InvokeArgs {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::from_env().with_overrides(ConfigOverrides {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
        })
    }
}
