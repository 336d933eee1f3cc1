//! Document backend: linked-entity writes and populate-style readback.
//!
//! Requires a MongoDB replica set (transactions do not work on a
//! standalone server):
//!
//! ```bash
//! MONGODB_DATABASE_URL=mongodb://localhost/quillpress_test \
//!     cargo test -p quillpress-integration-tests --test mongo_linked_writes -- --ignored
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bson::oid::ObjectId;

use quillpress_integration_tests::{mongo_store, unique_email, unique_slug};
use quillpress_mongo::db::{CommentRepository, PostRepository, UserRepository};
use quillpress_mongo::models::{NewComment, NewPost, NewUser, full_name};
use quillpress_mongo::{RepositoryError, password};

const TEST_PASSWORD: &str = "correct horse battery staple";

fn new_user(email: quillpress_core::Email) -> NewUser {
    NewUser {
        email,
        password_hash: password::hash_password(TEST_PASSWORD).expect("hashing failed"),
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
#[ignore = "requires replica set"]
async fn create_user_with_post_then_populate() {
    let store = mongo_store().await;
    let users = UserRepository::new(&store);

    let email = unique_email();
    let slug = unique_slug();

    let (user, post) = users
        .create_with_first_post(&new_user(email.clone()), &new_post(slug.clone()))
        .await
        .expect("linked write failed");
    assert_eq!(post.author.reference(), Some(&user.id));

    // Readback by natural key with post references resolved
    let fetched = users
        .find_by_email_with_posts(&email)
        .await
        .expect("readback failed")
        .expect("user not found after commit");

    assert_eq!(fetched.email, email);
    assert_eq!(fetched.posts.len(), 1);
    let resolved = fetched
        .posts
        .first()
        .unwrap()
        .resolved()
        .expect("post must be resolved, not a bare reference");
    assert_eq!(resolved.slug, slug);
    assert_eq!(resolved.title, "T");
    assert_eq!(resolved.body, "B");

    assert_eq!(full_name(&fetched), "A B");
    assert!(password::verify_password(TEST_PASSWORD, &fetched.password_hash).is_ok());

    // An unpopulated readback leaves references bare
    let bare = users
        .find_by_email(&email)
        .await
        .expect("readback failed")
        .expect("user not found");
    assert_eq!(bare.posts.first().unwrap().reference(), Some(&post.id));
}

#[tokio::test]
#[ignore = "requires replica set"]
async fn duplicate_email_conflicts_and_keeps_first_user() {
    let store = mongo_store().await;
    let users = UserRepository::new(&store);

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

    let stored = users
        .find_by_email(&email)
        .await
        .expect("lookup failed")
        .expect("first user must survive");
    assert_eq!(stored.first_name, "First");
}

#[tokio::test]
#[ignore = "requires replica set"]
async fn duplicate_slug_rolls_back_the_owner() {
    let store = mongo_store().await;
    let users = UserRepository::new(&store);

    let slug = unique_slug();

    users
        .create_with_first_post(&new_user(unique_email()), &new_post(slug.clone()))
        .await
        .expect("first linked write failed");

    // Second attempt fails at step 2; the step-1 user must roll back with it
    let email = unique_email();
    let err = users
        .create_with_first_post(&new_user(email.clone()), &new_post(slug))
        .await
        .expect_err("duplicate slug must be rejected");
    assert!(matches!(err, RepositoryError::Conflict(_)), "got {err:?}");

    let orphan = users.find_by_email(&email).await.expect("lookup failed");
    assert!(orphan.is_none(), "owner visible after aborted transaction");
}

#[tokio::test]
#[ignore = "requires replica set"]
async fn reverse_lookup_resolves_the_author() {
    let store = mongo_store().await;
    let users = UserRepository::new(&store);
    let posts = PostRepository::new(&store);

    let email = unique_email();
    let (user, post) = users
        .create_with_first_post(&new_user(email.clone()), &new_post(unique_slug()))
        .await
        .expect("linked write failed");

    // Another author's post must not appear in the lookup
    users
        .create_with_first_post(&new_user(unique_email()), &new_post(unique_slug()))
        .await
        .expect("other author's linked write failed");

    let listed = posts
        .list_by_author_with_author(user.id)
        .await
        .expect("reverse lookup failed");

    assert_eq!(listed.len(), 1);
    let entry = listed.first().unwrap();
    assert_eq!(entry.id, post.id);
    assert_eq!(entry.title, "T");
    let author = entry
        .author
        .resolved()
        .expect("author must be resolved, not a bare reference");
    assert_eq!(author.email, email);
}

#[tokio::test]
#[ignore = "requires replica set"]
async fn comments_link_to_posts() {
    let store = mongo_store().await;
    let comments = CommentRepository::new(&store);

    let (_, post) = UserRepository::new(&store)
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
    assert_eq!(comment.post.reference(), Some(&post.id));

    let listed = comments
        .list_by_post(post.id)
        .await
        .expect("comment lookup failed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().unwrap().comment, "Great post!");
}

#[tokio::test]
#[ignore = "requires replica set"]
async fn comment_on_missing_post_leaves_no_orphan() {
    let store = mongo_store().await;
    let comments = CommentRepository::new(&store);

    let missing_post = ObjectId::new();

    let err = comments
        .create(
            missing_post,
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

    // The aborted transaction must not leave the inserted comment behind
    let listed = comments
        .list_by_post(missing_post)
        .await
        .expect("comment lookup failed");
    assert!(listed.is_empty(), "orphaned comment visible after abort");
}

#[tokio::test]
#[ignore = "requires replica set"]
async fn readback_of_unknown_email_is_none_not_an_error() {
    let store = mongo_store().await;

    let missing = UserRepository::new(&store)
        .find_by_email_with_posts(&unique_email())
        .await
        .expect("lookup must not fail");

    assert!(missing.is_none());
}
