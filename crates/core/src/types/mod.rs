//! Core types for Quillpress.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod reference;
pub mod slug;

pub use address::Address;
pub use email::{Email, EmailError};
pub use id::*;
pub use reference::Ref;
pub use slug::{Slug, SlugError};
