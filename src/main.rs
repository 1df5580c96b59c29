//! bumpgate CLI

mod cli;

use bumpgate::error::{Error, Result};
use clap::Parser;
use cli::{Cli, Stylize, run_command};
use std::fs::OpenOptions;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; `RUST_LOG` overrides the defaults
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default = if verbose { "bumpgate=debug" } else { "bumpgate=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        anstream::eprintln!("{} {e}", "error:".error());
        return ExitCode::FAILURE;
    }

    let (operation, args) = cli.command.split();
    let result = tokio::select! {
        result = run_command(operation, args, cli.api_url.as_deref()) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, cancelling in-flight requests");
            return ExitCode::from(130);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Interrupted) => {
            warn!("interrupted at prompt, stopping");
            ExitCode::from(130)
        }
        Err(e) => {
            anstream::eprintln!("{} {e}", "error:".error());
            ExitCode::FAILURE
        }
    }
}
