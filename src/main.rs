//! ptywrap
//!
//! Runs the configured target inside a pty and relays its output to
//! stdout. Every argument is passed through to the target.

use std::env;
use std::io;
use std::process::ExitCode;

use ptywrap::config::LOG_ENV;
use ptywrap::{Config, Error, PtyRunner, TerminalSnapshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // stdout carries the child's bytes only; diagnostics go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut args = env::args_os();
    let argv0 = args.next().unwrap_or_default();

    // The terminal is checked first: without one there is nothing to mirror,
    // whatever the configuration says.
    let snapshot = match TerminalSnapshot::from_stdin() {
        Ok(snapshot) => snapshot,
        Err(e) => return fail(&e),
    };
    tracing::debug!(
        cols = snapshot.size().cols,
        rows = snapshot.size().rows,
        "captured invoking terminal"
    );

    let config = match Config::from_env(&argv0) {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };

    match PtyRunner::new(config).run(&snapshot, args) {
        Ok(exit) => {
            tracing::debug!(code = exit.code(), "exiting with child status");
            u8::try_from(exit.code()).map_or(ExitCode::FAILURE, ExitCode::from)
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &Error) -> ExitCode {
    tracing::debug!(error = ?e, "fatal");
    eprintln!("ptywrap: {}", e);
    ExitCode::FAILURE
}
