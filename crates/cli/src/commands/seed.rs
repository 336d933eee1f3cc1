//! Seed demo data.
//!
//! Creates the same small graph on each backend: Jane Doe (with an embedded
//! address), her first post, and one comment on it. The user and post go
//! through the linked-entity write; the comment through the comment
//! repository. Re-running against a seeded database fails with a uniqueness
//! violation, which is surfaced as-is.
//!
//! # Environment Variables
//!
//! - `POSTGRES_DATABASE_URL` - `PostgreSQL` connection string
//! - `MONGODB_DATABASE_URL` - MongoDB connection string (replica set)

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use quillpress_core::{Address, Email, Slug};

/// Demo password for the seeded document-backend user.
const SEED_PASSWORD: &str = "jane-demo-password";

fn seed_address() -> Address {
    Address {
        street: "123 Main St".to_owned(),
        city: "Anytown".to_owned(),
        state: "Anystate".to_owned(),
        zip: "12345".to_owned(),
    }
}

/// Seed the relational backend.
///
/// # Errors
///
/// Returns an error if the environment variable is missing or any write
/// fails (including re-seeding an already-seeded database).
pub async fn postgres() -> Result<(), Box<dyn std::error::Error>> {
    use quillpress_postgres::db::{CommentRepository, UserRepository};
    use quillpress_postgres::models::{NewComment, NewPost, NewUser};

    dotenvy::dotenv().ok();

    let database_url = std::env::var("POSTGRES_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "POSTGRES_DATABASE_URL not set")?;

    let pool = quillpress_postgres::create_pool(&database_url).await?;
    info!("Connected to PostgreSQL");

    // Seed user + first post atomically
    let (user, post) = UserRepository::new(&pool)
        .create_with_first_post(
            &NewUser {
                email: Email::parse("jane.doe@example.com")?,
                first_name: "Jane".to_owned(),
                last_name: "Doe".to_owned(),
                address: Some(seed_address()),
            },
            &NewPost {
                slug: Slug::parse("my-first-post")?,
                title: "My First Post".to_owned(),
                body: "This is the body of my first post.".to_owned(),
            },
        )
        .await?;
    info!(user = %user.id, post = %post.id, "Seeded user and first post");

    // Seed comment
    let comment = CommentRepository::new(&pool)
        .create(
            post.id,
            &NewComment {
                comment: "Great post!".to_owned(),
            },
        )
        .await?;
    info!(comment = %comment.id, "Seeded comment");

    info!("PostgreSQL seeding finished");
    Ok(())
}

/// Seed the document backend.
///
/// # Errors
///
/// Returns an error if the environment variable is missing or any write
/// fails (including re-seeding an already-seeded database).
pub async fn mongo() -> Result<(), Box<dyn std::error::Error>> {
    use quillpress_mongo::db::{CommentRepository, UserRepository};
    use quillpress_mongo::models::{NewComment, NewPost, NewUser};
    use quillpress_mongo::{Store, password};

    dotenvy::dotenv().ok();

    let database_url = std::env::var("MONGODB_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "MONGODB_DATABASE_URL not set")?;

    let store = Store::connect(database_url.expose_secret()).await?;
    info!("Connected to MongoDB");

    // Seed user + first post atomically
    let (user, post) = UserRepository::new(&store)
        .create_with_first_post(
            &NewUser {
                email: Email::parse("jane.doe@example.com")?,
                password_hash: password::hash_password(SEED_PASSWORD)?,
                first_name: "Jane".to_owned(),
                last_name: "Doe".to_owned(),
                address: Some(seed_address()),
            },
            &NewPost {
                slug: Slug::parse("my-first-post")?,
                title: "My First Post".to_owned(),
                body: "This is the body of my first post.".to_owned(),
            },
        )
        .await?;
    info!(user = %user.id, post = %post.id, "Seeded user and first post");

    // Seed comment
    let comment = CommentRepository::new(&store)
        .create(
            post.id,
            &NewComment {
                comment: "Great post!".to_owned(),
            },
        )
        .await?;
    info!(comment = %comment.id, "Seeded comment");

    info!("MongoDB seeding finished");
    Ok(())
}
