//! Comment domain types.

use chrono::{DateTime, Utc};

use quillpress_core::{CommentId, PostId};

/// A stored comment (domain type).
#[derive(Debug, Clone)]
pub struct Comment {
    /// Unique comment ID.
    pub id: CommentId,
    /// Comment text.
    pub comment: String,
    /// The parent post.
    pub post_id: PostId,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
}

/// Attributes for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Comment text.
    pub comment: String,
}
