//! Tradepost CLI - database migrations and seeding tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the database (if missing) and apply migrations
//! tp-cli migrate
//!
//! # Seed the category tree from a YAML file
//! tp-cli seed categories -f crates/cli/seed/categories.yaml
//!
//! # Seed demo accounts and listings for local development
//! tp-cli seed demo
//! ```
//!
//! # Environment Variables
//!
//! - `TRADEPOST_DATABASE_URL` - `SQLite` connection string
//!   (e.g. `sqlite://tradepost.db`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tp-cli")]
#[command(author, version, about = "Tradepost CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database if missing and apply migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Load the category tree from a YAML file
    Categories {
        /// Path to the YAML category file
        #[arg(short, long)]
        file: String,
    },
    /// Insert demo accounts and listings for local development
    Demo,
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
        Commands::Seed { target } => match target {
            SeedTarget::Categories { file } => commands::seed::categories(&file).await?,
            SeedTarget::Demo => commands::seed::demo().await?,
        },
    }
    Ok(())
}
