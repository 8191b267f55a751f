//! Ridgeline CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending database migrations
//! rl-cli migrate
//!
//! # Seed the database with development data
//! rl-cli seed --owner dev-owner
//!
//! # Wipe and reseed the demo store
//! rl-cli seed --owner dev-owner --force
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with development data

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rl-cli")]
#[command(author, version, about = "Ridgeline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with development data
    Seed {
        /// Owner id the demo store is created under; send this value in the
        /// owner header to see the store in the dashboard
        #[arg(long, default_value = "dev-owner")]
        owner: String,

        /// Delete the existing demo store and content before seeding
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { owner, force } => commands::seed::run(&owner, force).await?,
    }
    Ok(())
}
