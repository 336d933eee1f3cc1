//! User repository for database operations.
//!
//! Users are the owner side of the linked-entity write: a post can only be
//! created against a user id that already exists. Queries use runtime-checked
//! sqlx with explicit row types decoded into domain types at the boundary.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use quillpress_core::{Address, Email, UserId};

use super::RepositoryError;
use super::posts::PostRepository;
use crate::models::post::{NewPost, Post};
use crate::models::user::{NewUser, User, UserWithPosts};

/// User record from the database.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    email: String,
    first_name: String,
    last_name: String,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        // The CHECK constraint makes a partial address unrepresentable, but
        // the decode boundary still refuses one rather than inventing fields.
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
            id: UserId::new(row.id),
            email,
            first_name: row.first_name,
            last_name: row.last_name,
            address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_USER: &str = r"
    SELECT id, email, first_name, last_name, street, city, state, zip,
           created_at, updated_at
    FROM users
";

const INSERT_USER: &str = r"
    INSERT INTO users (email, first_name, last_name, street, city, state, zip)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id, email, first_name, last_name, street, city, state, zip,
              created_at, updated_at
";

const INSERT_POST: &str = r"
    INSERT INTO posts (slug, title, body, author_id)
    VALUES ($1, $2, $3, $4)
    RETURNING id, slug, title, body, author_id, created_at
";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored user is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored user is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by email together with their posts, ordered by creation
    /// time. The readback side of the linked-entity write: every post is
    /// returned fully resolved, never as a bare id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn get_with_posts(
        &self,
        email: &Email,
    ) -> Result<Option<UserWithPosts>, RepositoryError> {
        let Some(user) = self.get_by_email(email).await? else {
            return Ok(None);
        };

        let posts = PostRepository::new(self.pool)
            .list_by_author(user.id)
            .await?;

        Ok(Some(UserWithPosts { user, posts }))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let address = new_user.address.as_ref();

        let row: UserRow = sqlx::query_as(INSERT_USER)
            .bind(new_user.email.as_str())
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(address.map(|a| a.street.as_str()))
            .bind(address.map(|a| a.city.as_str()))
            .bind(address.map(|a| a.state.as_str()))
            .bind(address.map(|a| a.zip.as_str()))
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("email already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        User::try_from(row)
    }

    /// Create a user and their first post in one transaction.
    ///
    /// The linked-entity write: the user is inserted first to obtain its
    /// generated id, the post is inserted carrying that id as `author_id`,
    /// and both become visible atomically at commit. The back-reference is
    /// the foreign key itself - the user's post collection is derived by
    /// query, so no third mutation exists on this backend.
    ///
    /// Dropping the transaction before commit rolls both inserts back, so an
    /// error on either statement leaves nothing visible.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_first_post(
        &self,
        new_user: &NewUser,
        new_post: &NewPost,
    ) -> Result<(User, Post), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Step 1: persist the owner, obtaining its generated id
        let address = new_user.address.as_ref();

        let user_row: UserRow = sqlx::query_as(INSERT_USER)
            .bind(new_user.email.as_str())
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(address.map(|a| a.street.as_str()))
            .bind(address.map(|a| a.city.as_str()))
            .bind(address.map(|a| a.state.as_str()))
            .bind(address.map(|a| a.zip.as_str()))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("email already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        let user = User::try_from(user_row)?;

        // Step 2: persist the dependent carrying the owner id
        let post_row: super::posts::PostRow = sqlx::query_as(INSERT_POST)
            .bind(new_post.slug.as_str())
            .bind(&new_post.title)
            .bind(&new_post.body)
            .bind(user.id.as_i32())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("slug already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        let post = Post::try_from(post_row)?;

        tx.commit().await?;

        Ok((user, post))
    }
}
