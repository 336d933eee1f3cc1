//! Quillpress Core - Shared domain types.
//!
//! This crate provides the types used across both storage backends:
//! - `postgres` - Relational backend (sqlx)
//! - `mongo` - Document backend (mongodb)
//! - `cli` - Migration and seeding tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access. Each
//! backend declares its own storage shapes and converts them into these
//! domain types at the repository boundary.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, and slugs, plus the
//!   [`types::Ref`] reference/resolved sum type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
