//! Database operations for the relational backend.
//!
//! ## Tables
//!
//! - `users` - Owners; unique `email`, optional embedded address columns
//! - `posts` - Dependents of users; unique `slug`, `author_id` foreign key
//! - `comments` - Dependents of posts; `post_id` foreign key
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/postgres/migrations/` and run via:
//! ```bash
//! cargo run -p quillpress-cli -- migrate postgres
//! ```

pub mod comments;
pub mod posts;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use comments::CommentRepository;
pub use posts::PostRepository;
pub use users::UserRepository;

/// Embedded migrations for the relational schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Uniqueness violation (e.g., duplicate email or slug).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A dependent references an owner that does not exist.
    #[error("reference integrity violation: {0}")]
    ReferenceIntegrity(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
