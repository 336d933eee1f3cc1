//! User domain types.

use chrono::{DateTime, Utc};

use quillpress_core::{Address, Email, UserId};

use super::post::Post;

/// A stored user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique natural key).
    pub email: Email,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional embedded address; all four parts or none.
    pub address: Option<Address>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Attributes for creating a user.
///
/// No references yet - the user is always the owner side of a linked write.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address (must be unused).
    pub email: Email,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional embedded address.
    pub address: Option<Address>,
}

/// A user together with their posts, ordered by creation time.
#[derive(Debug, Clone)]
pub struct UserWithPosts {
    /// The owner.
    pub user: User,
    /// The owner's posts, fully resolved.
    pub posts: Vec<Post>,
}

/// A user's display name, e.g. `"Jane Doe"`.
#[must_use]
pub fn full_name(user: &User) -> String {
    format!("{} {}", user.first_name, user.last_name)
}
