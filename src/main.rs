mod auth;
mod cli;
mod environment;
mod error;
mod history;
mod http;
mod settings;
mod storage;
mod template;
mod testing;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::{Cli, Command, commands};
use storage::DataDir;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let data = cli.data_dir.map(DataDir::at).unwrap_or_else(DataDir::current);

    let result = match cli.command {
        Command::Run(args) => commands::run(&data, args).await,
        Command::Send(args) => commands::send(&data, args).await,
        Command::Headers { action } => commands::headers(&data, action),
        Command::History { limit } => commands::history(&data, limit),
        Command::Templates => commands::templates(&data),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
