//! Database operations for the document backend.
//!
//! ## Collections
//!
//! - `users` - Owners; unique index on `email`, `posts` id array
//! - `posts` - Dependents of users; unique index on `slug`, `comments` id array
//! - `comments` - Dependents of posts
//!
//! Unique indexes are created by [`Store::sync_indexes`], run via:
//! ```bash
//! cargo run -p quillpress-cli -- migrate mongo
//! ```

pub mod comments;
pub mod posts;
pub mod users;

use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use thiserror::Error;
use url::Url;

pub use comments::CommentRepository;
pub use posts::PostRepository;
pub use users::UserRepository;

use crate::models::comment::CommentDocument;
use crate::models::post::PostDocument;
use crate::models::user::UserDocument;

/// Errors that can occur while establishing a connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The connection string is not a valid `mongodb://` URL.
    #[error("invalid connection string: {0}")]
    InvalidUrl(String),

    /// Driver error while connecting.
    #[error("connection error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Driver error from mongodb.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Uniqueness violation (e.g., duplicate email or slug).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A dependent references an owner that does not exist.
    #[error("reference integrity violation: {0}")]
    ReferenceIntegrity(String),
}

/// Returns `true` for duplicate-key write failures (code 11000).
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(write_err)) => {
            write_err.code == 11000
        }
        mongodb::error::ErrorKind::Command(command_err) => command_err.code == 11000,
        _ => false,
    }
}

/// Explicitly constructed connection handle.
///
/// Owns a client and the selected database; constructed once and passed to
/// repositories rather than living in a module-level singleton.
#[derive(Debug, Clone)]
pub struct Store {
    client: Client,
    database: Database,
}

impl Store {
    /// Connect to the database named in the URL's path.
    ///
    /// # Errors
    ///
    /// Returns `ConnectError::InvalidUrl` if the URL does not parse or does
    /// not use the `mongodb` scheme, `ConnectError::Database` if the driver
    /// rejects it.
    pub async fn connect(url: &str) -> Result<Self, ConnectError> {
        let parsed = Url::parse(url).map_err(|e| ConnectError::InvalidUrl(e.to_string()))?;

        if parsed.scheme() != "mongodb" {
            return Err(ConnectError::InvalidUrl(format!(
                "connection URL does not have a `mongodb` scheme; url={parsed}"
            )));
        }

        let client = Client::with_uri_str(parsed.as_str()).await?;

        let db_name = parsed
            .path()
            .trim_start_matches('/')
            .split('?')
            .next()
            .unwrap_or("quillpress");
        let db_name = if db_name.is_empty() {
            "quillpress"
        } else {
            db_name
        };

        let database = client.database(db_name);

        Ok(Self { client, database })
    }

    /// The underlying client, used to start sessions.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn users(&self) -> Collection<UserDocument> {
        self.database.collection("users")
    }

    pub(crate) fn posts(&self) -> Collection<PostDocument> {
        self.database.collection("posts")
    }

    pub(crate) fn comments(&self) -> Collection<CommentDocument> {
        self.database.collection("comments")
    }

    /// Create the unique indexes backing the natural keys.
    ///
    /// Idempotent; the schema analog of running relational migrations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if index creation fails.
    pub async fn sync_indexes(&self) -> Result<(), RepositoryError> {
        let mut email_options = IndexOptions::default();
        email_options.unique = Some(true);
        email_options.name = Some("users_email_unique".to_owned());

        self.users()
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! { "email": 1 })
                    .options(email_options)
                    .build(),
            )
            .await?;

        let mut slug_options = IndexOptions::default();
        slug_options.unique = Some(true);
        slug_options.name = Some("posts_slug_unique".to_owned());

        self.posts()
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! { "slug": 1 })
                    .options(slug_options)
                    .build(),
            )
            .await?;

        Ok(())
    }
}
