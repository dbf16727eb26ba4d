// src/signal.rs

//! Provides signal handling for graceful shutdown.

use crate::cancellation::CancellationToken;
use anyhow::{Context, Result};

/// Sets up a handler for Ctrl+C (SIGINT, and SIGTERM on unix).
///
/// The first signal cancels the returned token, which makes a running download
/// stop its workers and return [`Outcome::Cancelled`](crate::download::Outcome::Cancelled).
/// A second signal, received while that shutdown is still in progress, exits
/// the process immediately with status 1.
///
/// # Errors
/// Returns an error if the signal handler cannot be set.
pub fn setup_signal_handler() -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let handler_token = token.clone();

    ctrlc::set_handler(move || {
        if handler_token.is_cancelled() {
            eprintln!("\nForced exit.");
            std::process::exit(1);
        }
        log::info!("Ctrl+C signal received, attempting graceful shutdown.");
        handler_token.cancel();
    })
    .context("Failed to set Ctrl+C signal handler")?;

    Ok(token)
}

// Note: Testing signal handlers directly is complex and often skipped
// or handled via integration tests that send signals to the process.
