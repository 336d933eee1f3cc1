//! Post domain types.

use chrono::{DateTime, Utc};

use quillpress_core::{PostId, Slug, UserId};

use super::user::User;

/// A stored post (domain type).
#[derive(Debug, Clone)]
pub struct Post {
    /// Unique post ID.
    pub id: PostId,
    /// URL slug (unique natural key).
    pub slug: Slug,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// The authoring user.
    pub author_id: UserId,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
}

/// Attributes for creating a post.
///
/// The author is supplied separately - it is not known until the owner side
/// of the linked write has been persisted.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// URL slug (must be unused).
    pub slug: Slug,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
}

/// A post with its author resolved in place of the bare reference.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    /// The post.
    pub post: Post,
    /// The authoring user, fully resolved.
    pub author: User,
}
