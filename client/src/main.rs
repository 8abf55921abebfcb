//! Client entry-point: loads settings, wires the HTTP adapter, runs a command.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use tokio::io::BufReader;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use jobboard::inbound::cli::{Cli, CliApp, CliError, Command};
use jobboard::outbound::http::HttpJobBoardClient;
use jobboard::settings::ClientSettings;

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = ClientSettings::from_environment()?;
    let client = Arc::new(
        HttpJobBoardClient::new(settings.base_url()?, settings.request_timeout())
            .wrap_err("build HTTP client")?,
    );
    let app = CliApp::new(Arc::clone(&client), Arc::clone(&client), client)
        .with_debounce(settings.search_debounce())
        .with_page_limit(settings.page_limit);

    let mut out = io::stdout();
    let command = match cli.command {
        Command::Login { email, password } => {
            app.start(None, &mut out).await?;
            Command::Login {
                email: email.or_else(|| settings.email.clone()),
                password: password.or_else(|| settings.password.clone()),
            }
        }
        command => {
            app.start(settings.credentials().as_ref(), &mut out).await?;
            command
        }
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let outcome = app.run(command, stdin, &mut out).await;
    out.flush()?;
    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %e, "command failed");
            // Failed commands have already rendered their notice.
            if !matches!(e, CliError::Failed(_)) {
                writeln!(io::stderr(), "error: {e}")?;
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
