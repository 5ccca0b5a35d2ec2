//! SheetQuery CLI - spreadsheet ingestion and natural-language querying.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let session = commands::Session {
        database: cli.database,
        llm: cli.llm,
        model: cli.model,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Ingest { file } => commands::ingest::run(&session, file),

        Commands::Ask {
            upload_id,
            question,
            format,
        } => commands::ask::run(&session, &upload_id, &question, format),

        Commands::Info { upload_id, json } => commands::info::run(&session, &upload_id, json),

        Commands::Serve { port, host } => commands::serve::run(&session, &host, port),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
