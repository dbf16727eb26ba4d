// src/main.rs

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use dirgrab::cli::{Cli, Commands};
use dirgrab::config::{Action, ConfigBuilder};
use dirgrab::credentials::{CredentialStore, FileCredentialStore};
#[cfg(feature = "progress")]
use dirgrab::progress::IndicatifProgress;
use dirgrab::progress::{LineProgress, ProgressReporter};
use dirgrab::run;
use dirgrab::signal::setup_signal_handler;
use std::sync::Arc;

// Wrapper struct to handle subcommands without breaking the library's Cli struct
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct AppArgs {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    cli: Cli,
}

fn main() -> Result<()> {
    // Initialize logging. Default to 'info' if RUST_LOG is not set.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                if cfg!(debug_assertions) {
                    "dirgrab=debug".parse()?
                } else {
                    "dirgrab=info".parse()?
                },
            ),
        )
        .init();

    log::debug!("Starting dirgrab v{}...", env!("CARGO_PKG_VERSION"));

    // Panic hook that keeps build paths out of the message
    std::panic::set_hook(Box::new(|info| {
        let msg = match info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => "Box<Any>",
        };
        eprintln!(
            "Application Error: {}",
            msg.replace(env!("CARGO_MANIFEST_DIR"), "<redacted>")
        );
    }));

    // --- Setup ---
    let args = match AppArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Usage errors exit with 1 like every other failure.
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Some(Commands::Version) = args.command {
        println!("dirgrab version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // --- Configuration ---
    let store = FileCredentialStore::new()?;
    let config = ConfigBuilder::from_cli(args.cli)
        .token(store.get()?)
        .build()?;
    log::debug!("Configuration built successfully: {:?}", config);

    if config.action == Action::Help {
        AppArgs::command().print_help()?;
        println!();
        return Ok(());
    }

    // Downloads always report per-file lines. They go above a progress bar
    // when stderr is a TTY, and plainly to stdout otherwise.
    let progress_reporter: Option<Arc<dyn ProgressReporter>> =
        if matches!(config.action, Action::Download { .. }) {
            #[cfg(feature = "progress")]
            {
                if atty::is(atty::Stream::Stderr) {
                    Some(Arc::new(IndicatifProgress::new()))
                } else {
                    Some(Arc::new(LineProgress))
                }
            }
            #[cfg(not(feature = "progress"))]
            {
                Some(Arc::new(LineProgress))
            }
        } else {
            None
        };

    // --- Execution ---
    let token = setup_signal_handler()?;
    let runtime = tokio::runtime::Runtime::new()?;
    let mut stdout = std::io::stdout();
    let result = runtime.block_on(run(
        &config,
        &store as &dyn CredentialStore,
        &token,
        progress_reporter,
        &mut stdout,
    ));
    // Workers abandoned by a deadline or cancellation must not keep the process alive.
    runtime.shutdown_background();

    // --- Error Handling ---
    if let Err(e) = result {
        if e.is_cancelled() {
            eprintln!("\nOperation cancelled.");
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}
