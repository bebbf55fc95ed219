mod cli;
mod error;
mod logging;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tickwatch_core::terminal::install_panic_cursor_restore;
use tickwatch_core::{ConfigStore, CrosstermTerminal, CursorRestore, Monitor, YahooQuoteSource};
use tracing::{error, info};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, code = error.exit_code(), "tickwatch exited with an error");
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let _log_guard = logging::init_logging(&cli.log_dir)?;

    install_panic_cursor_restore();
    let _cursor = CursorRestore;

    let store = ConfigStore::new(&cli.config);
    let config = {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        store.load_or_create(&mut input, &mut output)?
    };
    info!(
        path = %store.path().display(),
        symbols = config.symbols.len(),
        "config loaded"
    );

    let mut monitor = Monitor::from_config(
        Arc::new(YahooQuoteSource::default()),
        CrosstermTerminal::stdout(),
        &config,
    )?;
    monitor.run(interrupted()).await?;
    Ok(())
}

/// Resolves on ctrl+c. If the handler cannot be installed the ticker keeps
/// running rather than exiting straight away.
async fn interrupted() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "unable to listen for ctrl+c");
        std::future::pending::<()>().await;
    }
}
