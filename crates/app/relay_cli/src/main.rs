// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands, InvokeArgs};
use relay_api::function::RequestHandler;
use relay_api::invocation::{Invocation, InvocationBody};
use relay_core::completion::Completer;

mod cli;
mod logging;

fn main() -> Result<()> {
    match run() {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded.
fn run() -> Result<bool> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
        Commands::Invoke(invoke_args) => invoke(invoke_args),
    }
}

fn invoke(args: &InvokeArgs) -> Result<bool> {
    let body = match (&args.body, &args.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err(Error::Custom("either --body or --body-file is required".into())),
    };

    let completer = Completer::from_config(&args.service_config())?;
    let handler = RequestHandler::new(completer);
    log::info!("invoking in {} mode", handler.mode().as_str());

    let runtime = tokio::runtime::Runtime::new()?;
    let invocation = Invocation::new(args.method.as_str(), InvocationBody::Text(body));
    let (status, envelope) = runtime.block_on(handler.handle(invocation));

    log::info!("status {}", status.as_u16());
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    Ok(status.is_success())
}
