//! Integration tests for Quillpress.
//!
//! # Running Tests
//!
//! The tests exercise live stores and are `#[ignore]`d by default:
//!
//! ```bash
//! # Relational backend (any PostgreSQL)
//! POSTGRES_DATABASE_URL=postgres://localhost/quillpress_test \
//!     cargo test -p quillpress-integration-tests --test postgres_linked_writes -- --ignored
//!
//! # Document backend (must be a replica set; transactions require one)
//! MONGODB_DATABASE_URL=mongodb://localhost/quillpress_test \
//!     cargo test -p quillpress-integration-tests --test mongo_linked_writes -- --ignored
//! ```
//!
//! Each run generates fresh natural keys, so tests can be repeated against
//! the same database without cleanup.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used)]

use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use quillpress_core::{Email, Slug};
use quillpress_mongo::Store;

/// A fresh, unique email for this test run.
#[must_use]
pub fn unique_email() -> Email {
    Email::parse(&format!("user-{}@example.com", Uuid::new_v4().simple()))
        .expect("generated email is valid")
}

/// A fresh, unique slug for this test run.
#[must_use]
pub fn unique_slug() -> Slug {
    Slug::parse(&format!("post-{}", Uuid::new_v4().simple())).expect("generated slug is valid")
}

/// Connect to the test `PostgreSQL` database and run migrations.
///
/// # Panics
///
/// Panics if `POSTGRES_DATABASE_URL` is unset or the database is unreachable.
pub async fn postgres_pool() -> PgPool {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("POSTGRES_DATABASE_URL")
        .map(SecretString::from)
        .expect("POSTGRES_DATABASE_URL must be set for integration tests");

    let pool = quillpress_postgres::create_pool(&database_url)
        .await
        .expect("failed to connect to PostgreSQL");

    quillpress_postgres::MIGRATOR
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

/// Connect to the test MongoDB deployment and sync indexes.
///
/// # Panics
///
/// Panics if `MONGODB_DATABASE_URL` is unset or the deployment is unreachable.
pub async fn mongo_store() -> Store {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MONGODB_DATABASE_URL")
        .expect("MONGODB_DATABASE_URL must be set for integration tests");

    let store = Store::connect(&database_url)
        .await
        .expect("failed to connect to MongoDB");

    store
        .sync_indexes()
        .await
        .expect("failed to sync indexes");

    store
}
