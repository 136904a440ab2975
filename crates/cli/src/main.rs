//! StoreForge CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! storeforge migrate
//!
//! # Provision a demo store from an idea
//! storeforge seed --idea "I teach yoga and sell online courses"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Provision a demo store through the real provisioning service

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "storeforge")]
#[command(author, version, about = "StoreForge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Provision a demo store from a business idea
    Seed {
        /// The one-line business idea to provision from
        #[arg(short, long, default_value = "I teach yoga and sell online courses")]
        idea: String,

        /// Publish the store immediately
        #[arg(short, long)]
        publish: bool,
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
        Commands::Seed { idea, publish } => commands::seed::run(&idea, publish).await?,
    }
    Ok(())
}
