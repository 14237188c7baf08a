//! Courseup CLI - reproducible course environment provisioning
//!
//! Entry point for the courseup command-line application.

use anyhow::Result;
use clap::Parser;

use courseup::cli::output::{display_error, status};
use courseup::cli::Cli;

// Two workers: one can sit in a blocking stage (subprocess wait, retry
// sleep) while the other keeps servicing the signal branch
#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The tool's terminal output is its log: INFO by default, DEBUG when
    // verbose, errors only when quiet
    let default_level = if cli.quiet {
        "courseup=error"
    } else if cli.verbose {
        "courseup=debug"
    } else {
        "courseup=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    // The command runs on its own task; its stages block on subprocesses
    // and sleeps, and must never starve the interrupt branch below.
    // Re-running after an interrupt is safe from whatever state was left.
    let command = tokio::spawn(cli.run());

    // biased: a pending interrupt wins even when the same signal already
    // killed a child subprocess and surfaced as a command error
    tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{} Interrupted", status::INTERRUPTED);
            Ok(())
        }
        joined = command => match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                display_error(&e);
                std::process::exit(1);
            }
            Err(e) => {
                display_error(&anyhow::Error::new(e));
                std::process::exit(1);
            }
        },
    }
}
