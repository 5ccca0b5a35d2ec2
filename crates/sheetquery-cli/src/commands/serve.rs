//! Serve command - run the HTTP API.

use std::sync::Arc;

use colored::Colorize;

use crate::server::{app, state::AppState};

use super::Session;

pub fn run(session: &Session, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let sq = session.open()?;
    let state = AppState::new(Arc::new(sq));

    let url = format!("http://{}:{}", host, port);
    println!();
    println!(
        "{} {}",
        "Starting SheetQuery API at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Database: {}", session.database.display());
    println!(
        "  Translator: {}",
        state.translator_name.as_deref().unwrap_or("none (keyword fallback)")
    );
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, host, port))
}
