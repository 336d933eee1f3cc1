//! Comment repository for document operations.
//!
//! Comment creation is the same linked-entity write as posts, with the post
//! as the owner: insert the comment, then append its id to the post's
//! `comments` array inside one session transaction.

use bson::doc;
use bson::oid::ObjectId;
use futures::TryStreamExt;
use mongodb::ClientSession;

use super::{RepositoryError, Store};
use crate::models::comment::{Comment, CommentDocument, NewComment};

/// Repository for comment document operations.
pub struct CommentRepository<'a> {
    store: &'a Store,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// List a post's comments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored comment is invalid.
    pub async fn list_by_post(&self, post: ObjectId) -> Result<Vec<Comment>, RepositoryError> {
        let docs: Vec<CommentDocument> = self
            .store
            .comments()
            .find(doc! { "post": post })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;

        docs.into_iter().map(Comment::try_from).collect()
    }

    /// Create a comment on an existing post, in one session transaction.
    ///
    /// The comment insert and the append to the post's back-reference array
    /// become visible atomically; a comment against a nonexistent post
    /// aborts, leaving no orphaned comment behind.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ReferenceIntegrity` if the post does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        post: ObjectId,
        new_comment: &NewComment,
    ) -> Result<Comment, RepositoryError> {
        let mut session = self.store.client().start_session().await?;
        session.start_transaction().await?;

        match self.linked_insert(&mut session, post, new_comment).await {
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
        post: ObjectId,
        new_comment: &NewComment,
    ) -> Result<Comment, RepositoryError> {
        // Persist the dependent carrying the owner id
        let comment_doc = CommentDocument {
            id: None,
            comment: new_comment.comment.clone(),
            post,
        };

        let inserted = self
            .store
            .comments()
            .insert_one(&comment_doc)
            .session(&mut *session)
            .await?;

        let comment_id = inserted.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::DataCorruption("inserted comment _id is not an ObjectId".to_owned())
        })?;

        // Append to the owner's back-reference array; zero matches means
        // the owner never existed
        let updated = self
            .store
            .posts()
            .update_one(
                doc! { "_id": post },
                doc! { "$push": { "comments": comment_id } },
            )
            .session(session)
            .await?;

        if updated.matched_count == 0 {
            return Err(RepositoryError::ReferenceIntegrity(format!(
                "post {post} does not exist"
            )));
        }

        Comment::try_from(CommentDocument {
            id: Some(comment_id),
            ..comment_doc
        })
    }
}
