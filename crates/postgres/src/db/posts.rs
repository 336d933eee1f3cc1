//! Post repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use quillpress_core::{Address, Email, PostId, Slug, UserId};

use super::RepositoryError;
use crate::models::post::{NewPost, Post, PostWithAuthor};
use crate::models::user::User;

/// Post record from the database.
#[derive(Debug, FromRow)]
pub(crate) struct PostRow {
    id: i32,
    slug: String,
    title: String,
    body: String,
    author_id: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = RepositoryError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid slug in database: {e}"))
        })?;

        Ok(Self {
            id: PostId::new(row.id),
            slug,
            title: row.title,
            body: row.body,
            author_id: UserId::new(row.author_id),
            created_at: row.created_at,
        })
    }
}

/// Post joined with its author's columns.
#[derive(Debug, FromRow)]
struct PostAuthorRow {
    id: i32,
    slug: String,
    title: String,
    body: String,
    author_id: i32,
    created_at: DateTime<Utc>,
    email: String,
    first_name: String,
    last_name: String,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    author_created_at: DateTime<Utc>,
    author_updated_at: DateTime<Utc>,
}

impl TryFrom<PostAuthorRow> for PostWithAuthor {
    type Error = RepositoryError;

    fn try_from(row: PostAuthorRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid slug in database: {e}"))
        })?;

        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let address = match (row.street, row.city, row.state, row.zip) {
            (Some(street), Some(city), Some(state), Some(zip)) => Some(Address {
                street,
                city,
                state,
                zip,
            }),
            (None, None, None, None) => None,
            _ => {
                return Err(RepositoryError::DataCorruption(
                    "partial address in database".to_owned(),
                ));
            }
        };

        Ok(Self {
            post: Post {
                id: PostId::new(row.id),
                slug,
                title: row.title,
                body: row.body,
                author_id: UserId::new(row.author_id),
                created_at: row.created_at,
            },
            author: User {
                id: UserId::new(row.author_id),
                email,
                first_name: row.first_name,
                last_name: row.last_name,
                address,
                created_at: row.author_created_at,
                updated_at: row.author_updated_at,
            },
        })
    }
}

/// Repository for post database operations.
pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a post by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored post is invalid.
    pub async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Post>, RepositoryError> {
        let row: Option<PostRow> = sqlx::query_as(
            r"
            SELECT id, slug, title, body, author_id, created_at
            FROM posts
            WHERE slug = $1
            ",
        )
        .bind(slug.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Post::try_from).transpose()
    }

    /// List a user's posts, ordered by creation time.
    ///
    /// The reverse lookup of the linked-entity write: returns exactly the
    /// posts created against the given author id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored post is invalid.
    pub async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepositoryError> {
        let rows: Vec<PostRow> = sqlx::query_as(
            r"
            SELECT id, slug, title, body, author_id, created_at
            FROM posts
            WHERE author_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(author_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Post::try_from).collect()
    }

    /// List a user's posts with the author resolved in place of the bare
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_by_author_with_author(
        &self,
        author_id: UserId,
    ) -> Result<Vec<PostWithAuthor>, RepositoryError> {
        let rows: Vec<PostAuthorRow> = sqlx::query_as(
            r"
            SELECT p.id, p.slug, p.title, p.body, p.author_id, p.created_at,
                   u.email, u.first_name, u.last_name,
                   u.street, u.city, u.state, u.zip,
                   u.created_at AS author_created_at,
                   u.updated_at AS author_updated_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1
            ORDER BY p.created_at ASC, p.id ASC
            ",
        )
        .bind(author_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PostWithAuthor::try_from).collect()
    }

    /// Create a new post for an existing author.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::ReferenceIntegrity` if the author does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        author_id: UserId,
        new_post: &NewPost,
    ) -> Result<Post, RepositoryError> {
        let row: PostRow = sqlx::query_as(
            r"
            INSERT INTO posts (slug, title, body, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, slug, title, body, author_id, created_at
            ",
        )
        .bind(new_post.slug.as_str())
        .bind(&new_post.title)
        .bind(&new_post.body)
        .bind(author_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return RepositoryError::Conflict("slug already exists".to_owned());
                }
                if db_err.is_foreign_key_violation() {
                    return RepositoryError::ReferenceIntegrity(format!(
                        "author {author_id} does not exist"
                    ));
                }
            }
            RepositoryError::Database(e)
        })?;

        Post::try_from(row)
    }
}
