//! Schema setup commands.
//!
//! The relational backend runs embedded sqlx migrations; the document
//! backend has no migrations, only the unique indexes backing its natural
//! keys.
//!
//! # Environment Variables
//!
//! - `POSTGRES_DATABASE_URL` - `PostgreSQL` connection string
//! - `MONGODB_DATABASE_URL` - MongoDB connection string

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use quillpress_mongo::Store;

/// Run `PostgreSQL` migrations.
///
/// # Errors
///
/// Returns an error if the environment variable is missing, the connection
/// fails, or a migration fails.
pub async fn postgres() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("POSTGRES_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "POSTGRES_DATABASE_URL not set")?;

    info!("Connecting to PostgreSQL...");
    let pool = quillpress_postgres::create_pool(&database_url).await?;

    info!("Running migrations...");
    quillpress_postgres::MIGRATOR.run(&pool).await?;

    info!("PostgreSQL migrations complete");
    Ok(())
}

/// Create MongoDB unique indexes.
///
/// # Errors
///
/// Returns an error if the environment variable is missing, the connection
/// fails, or index creation fails.
pub async fn mongo() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MONGODB_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "MONGODB_DATABASE_URL not set")?;

    info!("Connecting to MongoDB...");
    let store = Store::connect(database_url.expose_secret()).await?;

    info!("Syncing unique indexes...");
    store.sync_indexes().await?;

    info!("MongoDB indexes complete");
    Ok(())
}
