//! Relational backend: linked-entity writes and graph readback.
//!
//! Requires a running `PostgreSQL` instance:
//!
//! ```bash
//! POSTGRES_DATABASE_URL=postgres://localhost/quillpress_test \
//!     cargo test -p quillpress-integration-tests --test postgres_linked_writes -- --ignored
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used)]

use quillpress_integration_tests::{postgres_pool, unique_email, unique_slug};
use quillpress_postgres::RepositoryError;
use quillpress_postgres::db::{CommentRepository, PostRepository, UserRepository};
use quillpress_postgres::models::{NewComment, NewPost, NewUser};

fn new_user(email: quillpress_core::Email) -> NewUser {
    NewUser {
        email,
        first_name: "A".to_owned(),
        last_name: "B".to_owned(),
        address: None,
    }
}

fn new_post(slug: quillpress_core::Slug) -> NewPost {
    NewPost {
        slug,
        title: "T".to_owned(),
        body: "B".to_owned(),
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_user_with_post_then_read_back() {
    let pool = postgres_pool().await;
    let users = UserRepository::new(&pool);

    let email = unique_email();
    let slug = unique_slug();

    let (user, post) = users
        .create_with_first_post(&new_user(email.clone()), &new_post(slug.clone()))
        .await
        .expect("linked write failed");
    assert_eq!(post.author_id, user.id);

    // Readback by natural key returns the dependent fully resolved
    let fetched = users
        .get_with_posts(&email)
        .await
        .expect("readback failed")
        .expect("user not found after commit");

    assert_eq!(fetched.user.email, email);
    assert_eq!(fetched.posts.len(), 1);
    let first = fetched.posts.first().unwrap();
    assert_eq!(first.slug, slug);
    assert_eq!(first.title, "T");
    assert_eq!(first.body, "B");

    // Reverse lookup with the author resolved in place of the bare id
    let by_author = PostRepository::new(&pool)
        .list_by_author_with_author(user.id)
        .await
        .expect("reverse lookup failed");

    assert_eq!(by_author.len(), 1);
    let entry = by_author.first().unwrap();
    assert_eq!(entry.post.title, "T");
    assert_eq!(entry.author.email, email);
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_email_conflicts_and_keeps_first_user() {
    let pool = postgres_pool().await;
    let users = UserRepository::new(&pool);

    let email = unique_email();

    let mut first = new_user(email.clone());
    first.first_name = "First".to_owned();
    users.create(&first).await.expect("first create failed");

    let mut second = new_user(email.clone());
    second.first_name = "Second".to_owned();
    let err = users
        .create(&second)
        .await
        .expect_err("duplicate email must be rejected");
    assert!(matches!(err, RepositoryError::Conflict(_)), "got {err:?}");

    // Exactly one user stored, and it is the first one
    let stored = users
        .get_by_email(&email)
        .await
        .expect("lookup failed")
        .expect("first user must survive");
    assert_eq!(stored.first_name, "First");
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_slug_rolls_back_the_owner() {
    let pool = postgres_pool().await;
    let users = UserRepository::new(&pool);

    let slug = unique_slug();

    users
        .create_with_first_post(&new_user(unique_email()), &new_post(slug.clone()))
        .await
        .expect("first linked write failed");

    // Second attempt fails at step 2; step 1's user must roll back with it
    let email = unique_email();
    let err = users
        .create_with_first_post(&new_user(email.clone()), &new_post(slug))
        .await
        .expect_err("duplicate slug must be rejected");
    assert!(matches!(err, RepositoryError::Conflict(_)), "got {err:?}");

    let orphan = users.get_by_email(&email).await.expect("lookup failed");
    assert!(orphan.is_none(), "owner visible after aborted transaction");
}

#[tokio::test]
#[ignore = "requires database"]
async fn reverse_lookup_returns_exactly_the_authors_posts() {
    let pool = postgres_pool().await;
    let users = UserRepository::new(&pool);
    let posts = PostRepository::new(&pool);

    let (author, first_post) = users
        .create_with_first_post(&new_user(unique_email()), &new_post(unique_slug()))
        .await
        .expect("linked write failed");

    let second_slug = unique_slug();
    posts
        .create(author.id, &new_post(second_slug.clone()))
        .await
        .expect("second post failed");

    // Another author's post must not appear in the lookup
    users
        .create_with_first_post(&new_user(unique_email()), &new_post(unique_slug()))
        .await
        .expect("other author's linked write failed");

    let listed = posts
        .list_by_author(author.id)
        .await
        .expect("reverse lookup failed");

    assert_eq!(listed.len(), 2);
    assert_eq!(listed.first().unwrap().slug, first_post.slug);
    assert_eq!(listed.get(1).unwrap().slug, second_slug);
}

#[tokio::test]
#[ignore = "requires database"]
async fn comments_link_to_posts() {
    let pool = postgres_pool().await;
    let comments = CommentRepository::new(&pool);

    let (_, post) = UserRepository::new(&pool)
        .create_with_first_post(&new_user(unique_email()), &new_post(unique_slug()))
        .await
        .expect("linked write failed");

    let comment = comments
        .create(
            post.id,
            &NewComment {
                comment: "Great post!".to_owned(),
            },
        )
        .await
        .expect("comment create failed");
    assert_eq!(comment.post_id, post.id);

    let listed = comments
        .list_by_post(post.id)
        .await
        .expect("comment lookup failed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().unwrap().comment, "Great post!");
}

#[tokio::test]
#[ignore = "requires database"]
async fn comment_on_missing_post_is_reference_integrity_error() {
    let pool = postgres_pool().await;

    let err = CommentRepository::new(&pool)
        .create(
            quillpress_core::PostId::new(i32::MAX),
            &NewComment {
                comment: "orphan".to_owned(),
            },
        )
        .await
        .expect_err("comment against missing post must be rejected");

    assert!(
        matches!(err, RepositoryError::ReferenceIntegrity(_)),
        "got {err:?}"
    );
}

#[tokio::test]
#[ignore = "requires database"]
async fn readback_of_unknown_email_is_none_not_an_error() {
    let pool = postgres_pool().await;

    let missing = UserRepository::new(&pool)
        .get_with_posts(&unique_email())
        .await
        .expect("lookup must not fail");

    assert!(missing.is_none());
}
