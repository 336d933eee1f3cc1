//! Quillpress CLI - Schema setup and seed data.
//!
//! # Usage
//!
//! ```bash
//! # Run PostgreSQL migrations
//! quillpress migrate postgres
//!
//! # Create MongoDB unique indexes
//! quillpress migrate mongo
//!
//! # Set up both backends
//! quillpress migrate all
//!
//! # Seed demo data (Jane Doe, her first post, one comment)
//! quillpress seed postgres
//! quillpress seed mongo
//! quillpress seed all
//! ```
//!
//! # Environment Variables
//!
//! - `POSTGRES_DATABASE_URL` - `PostgreSQL` connection string
//! - `MONGODB_DATABASE_URL` - MongoDB connection string (replica set)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quillpress")]
#[command(author, version, about = "Quillpress CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up database schemas (migrations / unique indexes)
    Migrate {
        #[command(subcommand)]
        target: Target,
    },
    /// Seed demo data
    Seed {
        #[command(subcommand)]
        target: Target,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum Target {
    /// Relational backend (sqlx migrations)
    Postgres,
    /// Document backend (unique index sync)
    Mongo,
    /// Both backends
    All,
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
        Commands::Migrate { target } => match target {
            Target::Postgres => commands::migrate::postgres().await?,
            Target::Mongo => commands::migrate::mongo().await?,
            Target::All => {
                commands::migrate::postgres().await?;
                commands::migrate::mongo().await?;
            }
        },
        Commands::Seed { target } => match target {
            Target::Postgres => commands::seed::postgres().await?,
            Target::Mongo => commands::seed::mongo().await?,
            Target::All => {
                commands::seed::postgres().await?;
                commands::seed::mongo().await?;
            }
        },
    }
    Ok(())
}
