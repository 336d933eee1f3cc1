//! Quillpress relational backend.
//!
//! Users, posts, and comments stored in `PostgreSQL` via `sqlx`. The
//! back-reference from a user to their posts is the `author_id` foreign key;
//! the owner's collection is derived by query, so the linked-entity write is
//! two inserts inside one transaction (see
//! [`db::users::UserRepository::create_with_first_post`]).
//!
//! # Modules
//!
//! - [`db`] - Connection pool, error type, repositories, embedded migrations
//! - [`models`] - Domain types returned by the repositories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod db;
pub mod models;

pub use db::{MIGRATOR, RepositoryError, create_pool};
