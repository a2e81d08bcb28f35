mod cli;
mod error;
mod server;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::error::ServerError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "server stopped");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), ServerError> {
    let coordinator = cli.coordinator()?;
    tracing::info!(
        providers = ?coordinator.providers(),
        deadline_ms = cli.deadline_ms,
        cancellation = ?coordinator.cancellation(),
        "race coordinator ready"
    );

    server::serve(coordinator, cli.bind).await
}
