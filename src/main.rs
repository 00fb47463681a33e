mod api;
mod cli;
mod dialog;
mod draft;
mod i18n;
mod logging;
mod model;
mod options;
mod orchestrator;
#[cfg(feature = "tui")]
mod tui;
mod validation;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Logging is best-effort.
    if let Err(e) = logging::init() {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let res = cli::run(args).await;
    if let Err(e) = &res {
        tracing::error!(error = %format!("{e:#}"), "segment-studio exited with error");
    }
    res
}
