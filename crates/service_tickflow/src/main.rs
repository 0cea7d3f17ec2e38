//! Tickflow CLI
//!
//! Entry point for the tick streaming pipeline.
//!
//! # Commands
//!
//! - `tickflow run` - run the producer/consumer pipeline until signalled
//! - `tickflow generate --count <n>` - emit ticks to stdout as JSON lines
//! - `tickflow symbols` - print the configured symbol universe
//!
//! Configuration comes from `TICKFLOW_*` environment variables; invalid
//! values are fatal at startup (exit code 1). SIGINT and SIGTERM both
//! trigger graceful shutdown: current batches finish, pending publishes
//! flush, final statistics print, exit code 0.

use anyhow::Result;
use clap::{Parser, Subcommand};
use service_tickflow::config::StreamConfig;
use service_tickflow::runner;
use tick_core::shutdown::ShutdownFlag;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Tickflow streaming pipeline CLI
#[derive(Parser)]
#[command(name = "tickflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full producer/consumer pipeline until interrupted
    Run,

    /// Generate ticks straight to stdout as JSON lines
    Generate {
        /// Number of ticks to emit
        #[arg(short, long, default_value = "10")]
        count: u64,

        /// Fixed RNG seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Print the configured symbol universe
    Symbols,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration errors are startup-fatal, before any transport work.
    let config = StreamConfig::from_env()?;

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(config.log_level.parse()?))
        .init();

    match cli.command {
        Commands::Run => {
            let shutdown = ShutdownFlag::new();
            spawn_signal_watcher(shutdown.clone());

            let summary = runner::run_pipeline(&config, shutdown).await?;
            info!(
                published = summary.published,
                processed = summary.processed,
                errors = summary.errors,
                "pipeline shutdown complete"
            );
        }
        Commands::Generate { count, seed } => {
            runner::run_generate(count, seed)?;
        }
        Commands::Symbols => {
            runner::run_symbols();
        }
    }

    Ok(())
}

/// Watch for termination signals and set the shutdown flag.
///
/// The loops observe the flag at their own boundaries; signal delivery
/// itself never interrupts in-flight work.
fn spawn_signal_watcher(shutdown: ShutdownFlag) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            let mut sigterm =
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to install SIGTERM handler");
                        if ctrl_c.await.is_ok() {
                            info!("shutdown signal received");
                            shutdown.trigger();
                        }
                        return;
                    }
                };

            tokio::select! {
                _ = ctrl_c => info!("interrupt received"),
                _ = sigterm.recv() => info!("termination signal received"),
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("interrupt received");
        }

        shutdown.trigger();
    });
}
