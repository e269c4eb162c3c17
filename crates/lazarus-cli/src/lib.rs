//! Lazarus CLI library

pub mod config;
pub mod console;
pub mod resurrect;
pub mod scan;
pub mod status;

// Re-export CLI types for testing
pub use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lazarus")]
#[command(about = "Lazarus - repository resurrection engine client")]
#[command(version, author, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub server: config::ServerArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a repository and print its death report
    Scan(scan::ScanArgs),
    /// Scan a repository and attempt to bring it back to life
    Resurrect(resurrect::ResurrectArgs),
    /// Check that the engine is online
    Status,
}

/// Token cancelled when the user hits Ctrl+C
pub fn cancel_on_interrupt() -> lazarus_core::CancellationToken {
    let token = lazarus_core::CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received");
            on_interrupt.cancel();
        }
    });
    token
}
