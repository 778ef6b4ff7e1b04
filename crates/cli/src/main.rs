use armor_cli::commands::Command;
use armor_cli::Cli;
use clap::Parser;
use std::process::ExitCode;

/// Runs the armor CLI with the provided arguments.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_ansi(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
