//! User repository for document operations.
//!
//! Users are the owner side of the linked-entity write. The back-reference
//! to their posts is the `posts` id array, maintained procedurally inside
//! the same session transaction that creates a post.

use std::collections::HashMap;

use bson::doc;
use bson::oid::ObjectId;
use futures::TryStreamExt;
use mongodb::ClientSession;

use quillpress_core::{Email, Ref};

use super::{RepositoryError, Store, is_duplicate_key};
use crate::models::post::{NewPost, Post, PostDocument};
use crate::models::user::{NewUser, User, UserDocument};

/// Repository for user document operations.
pub struct UserRepository<'a> {
    store: &'a Store,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Get a user by their email address. Post references come back
    /// unresolved; use [`Self::find_by_email_with_posts`] for the populated
    /// form.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored user is invalid.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let doc = self
            .store
            .users()
            .find_one(doc! { "email": email.as_str() })
            .await?;

        doc.map(User::try_from).transpose()
    }

    /// Get a user by their id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored user is invalid.
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, RepositoryError> {
        let doc = self.store.users().find_one(doc! { "_id": id }).await?;

        doc.map(User::try_from).transpose()
    }

    /// Get a user by email with their post references resolved.
    ///
    /// The populate-style readback: fetches the referenced posts in one
    /// `$in` query and replaces each `Ref::Reference` with `Ref::Resolved`,
    /// preserving the back-reference array's order. A reference whose target
    /// is missing is corruption - the linked write never commits one without
    /// the other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored document is
    /// invalid or a referenced post does not exist.
    pub async fn find_by_email_with_posts(
        &self,
        email: &Email,
    ) -> Result<Option<User>, RepositoryError> {
        let Some(doc) = self
            .store
            .users()
            .find_one(doc! { "email": email.as_str() })
            .await?
        else {
            return Ok(None);
        };

        let post_ids = doc.posts.clone();
        let mut user = User::try_from(doc)?;

        if post_ids.is_empty() {
            return Ok(Some(user));
        }

        let fetched: Vec<PostDocument> = self
            .store
            .posts()
            .find(doc! { "_id": { "$in": post_ids.clone() } })
            .await?
            .try_collect()
            .await?;

        let mut by_id: HashMap<ObjectId, Post> = HashMap::with_capacity(fetched.len());
        for post_doc in fetched {
            let post = Post::try_from(post_doc)?;
            by_id.insert(post.id, post);
        }

        user.posts = post_ids
            .iter()
            .map(|id| {
                by_id.remove(id).map(Ref::Resolved).ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "post {id} referenced but not stored"
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Some(user))
    }

    /// Create a new user with no posts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let user_doc = UserDocument {
            id: None,
            email: new_user.email.as_str().to_owned(),
            password_hash: new_user.password_hash.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            address: new_user.address.clone(),
            posts: Vec::new(),
        };

        let inserted = self.store.users().insert_one(&user_doc).await.map_err(|e| {
            if is_duplicate_key(&e) {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let user_id = inserted.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::DataCorruption("inserted user _id is not an ObjectId".to_owned())
        })?;

        User::try_from(UserDocument {
            id: Some(user_id),
            ..user_doc
        })
    }

    /// Create a user and their first post in one session transaction.
    ///
    /// The linked-entity write, three mutations in strict sequence:
    ///
    /// 1. insert the owner, obtaining its generated id;
    /// 2. insert the dependent carrying that id as `author`;
    /// 3. append the dependent's id to the owner's `posts` array - an
    ///    explicit update, since step 1 could not have known it.
    ///
    /// All three become visible atomically at commit. Any failure aborts the
    /// transaction before the original error is surfaced, and the session is
    /// released when it goes out of scope on every path.
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
        let mut session = self.store.client().start_session().await?;
        session.start_transaction().await?;

        match self.linked_insert(&mut session, new_user, new_post).await {
            Ok(created) => {
                session.commit_transaction().await?;
                Ok(created)
            }
            Err(err) => {
                // An abort failure is secondary to the original error
                let _ = session.abort_transaction().await;
                Err(err)
            }
        }
    }

    async fn linked_insert(
        &self,
        session: &mut ClientSession,
        new_user: &NewUser,
        new_post: &NewPost,
    ) -> Result<(User, Post), RepositoryError> {
        // Step 1: persist the owner, obtaining its generated id
        let user_doc = UserDocument {
            id: None,
            email: new_user.email.as_str().to_owned(),
            password_hash: new_user.password_hash.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            address: new_user.address.clone(),
            posts: Vec::new(),
        };

        let inserted = self
            .store
            .users()
            .insert_one(&user_doc)
            .session(&mut *session)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    return RepositoryError::Conflict("email already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        let user_id = inserted.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::DataCorruption("inserted user _id is not an ObjectId".to_owned())
        })?;

        // Step 2: persist the dependent carrying the owner id
        let post_doc = PostDocument {
            id: None,
            slug: new_post.slug.as_str().to_owned(),
            title: new_post.title.clone(),
            body: new_post.body.clone(),
            author: user_id,
            comments: Vec::new(),
        };

        let inserted = self
            .store
            .posts()
            .insert_one(&post_doc)
            .session(&mut *session)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    return RepositoryError::Conflict("slug already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        let post_id = inserted.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::DataCorruption("inserted post _id is not an ObjectId".to_owned())
        })?;

        // Step 3: append the dependent to the owner's back-reference array
        self.store
            .users()
            .update_one(
                doc! { "_id": user_id },
                doc! { "$push": { "posts": post_id } },
            )
            .session(session)
            .await?;

        let user = User::try_from(UserDocument {
            id: Some(user_id),
            posts: vec![post_id],
            ..user_doc
        })?;
        let post = Post::try_from(PostDocument {
            id: Some(post_id),
            ..post_doc
        })?;

        Ok((user, post))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    // Integration test for the abort path.
    // Run with: MONGODB_DATABASE_URL=... cargo test -p quillpress-mongo -- --ignored

    #[tokio::test]
    #[ignore = "requires replica set"]
    async fn abort_discards_all_three_writes() {
        let url = std::env::var("MONGODB_DATABASE_URL").expect("MONGODB_DATABASE_URL required");
        let store = Store::connect(&url).await.expect("connect failed");
        store.sync_indexes().await.expect("index sync failed");

        let mut session = store
            .client()
            .start_session()
            .await
            .expect("session failed");
        session.start_transaction().await.expect("start failed");

        let user_doc = UserDocument {
            id: None,
            email: format!("user-{}@example.com", ObjectId::new().to_hex()),
            password_hash: "$argon2id$stub".to_owned(),
            first_name: "A".to_owned(),
            last_name: "B".to_owned(),
            address: None,
            posts: Vec::new(),
        };
        let user_id = store
            .users()
            .insert_one(&user_doc)
            .session(&mut session)
            .await
            .expect("user insert failed")
            .inserted_id
            .as_object_id()
            .expect("user _id is not an ObjectId");

        let post_doc = PostDocument {
            id: None,
            slug: format!("post-{}", ObjectId::new().to_hex()),
            title: "T".to_owned(),
            body: "B".to_owned(),
            author: user_id,
            comments: Vec::new(),
        };
        let post_id = store
            .posts()
            .insert_one(&post_doc)
            .session(&mut session)
            .await
            .expect("post insert failed")
            .inserted_id
            .as_object_id()
            .expect("post _id is not an ObjectId");

        store
            .users()
            .update_one(
                doc! { "_id": user_id },
                doc! { "$push": { "posts": post_id } },
            )
            .session(&mut session)
            .await
            .expect("back-reference update failed");

        session.abort_transaction().await.expect("abort failed");

        // None of the writes may be visible after the abort
        let user = store
            .users()
            .find_one(doc! { "_id": user_id })
            .await
            .expect("user lookup failed");
        assert!(user.is_none(), "owner visible after abort");

        let post = store
            .posts()
            .find_one(doc! { "_id": post_id })
            .await
            .expect("post lookup failed");
        assert!(post.is_none(), "dependent visible after abort");
    }
}
