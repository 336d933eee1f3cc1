//! Comment repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use quillpress_core::{CommentId, PostId};

use super::RepositoryError;
use crate::models::comment::{Comment, NewComment};

/// Comment record from the database.
#[derive(Debug, FromRow)]
struct CommentRow {
    id: i32,
    comment: String,
    post_id: i32,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId::new(row.id),
            comment: row.comment,
            post_id: PostId::new(row.post_id),
            created_at: row.created_at,
        }
    }
}

/// Repository for comment database operations.
pub struct CommentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a post's comments, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_post(&self, post_id: PostId) -> Result<Vec<Comment>, RepositoryError> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            r"
            SELECT id, comment, post_id, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(post_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    /// Create a new comment on an existing post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ReferenceIntegrity` if the post does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        post_id: PostId,
        new_comment: &NewComment,
    ) -> Result<Comment, RepositoryError> {
        let row: CommentRow = sqlx::query_as(
            r"
            INSERT INTO comments (comment, post_id)
            VALUES ($1, $2)
            RETURNING id, comment, post_id, created_at
            ",
        )
        .bind(&new_comment.comment)
        .bind(post_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::ReferenceIntegrity(format!(
                    "post {post_id} does not exist"
                ));
            }
            RepositoryError::Database(e)
        })?;

        Ok(Comment::from(row))
    }
}
