//! Quillpress document backend.
//!
//! Users, posts, and comments stored in MongoDB. The back-reference from an
//! owner to its dependents is an explicit id array maintained procedurally:
//! the linked-entity write inserts the owner, inserts the dependent carrying
//! the owner id, then appends the dependent id to the owner's array - all
//! three mutations inside one session transaction (see
//! [`db::users::UserRepository::create_with_first_post`]).
//!
//! Transactions require the target deployment to be a replica set or
//! sharded cluster.
//!
//! # Modules
//!
//! - [`db`] - Connection handle, error type, repositories, index sync
//! - [`models`] - Document shapes and their reference-typed domain forms
//! - [`password`] - Argon2 hash/verify free functions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod db;
pub mod models;
pub mod password;

pub use db::{ConnectError, RepositoryError, Store};
