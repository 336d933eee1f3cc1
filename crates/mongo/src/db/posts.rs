//! Post repository for document operations.

use bson::doc;
use bson::oid::ObjectId;
use futures::TryStreamExt;

use quillpress_core::{Ref, Slug};

use super::{RepositoryError, Store};
use crate::models::post::{Post, PostDocument};
use crate::models::user::User;

/// Repository for post document operations.
pub struct PostRepository<'a> {
    store: &'a Store,
}

impl<'a> PostRepository<'a> {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Get a post by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored post is invalid.
    pub async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Post>, RepositoryError> {
        let doc = self
            .store
            .posts()
            .find_one(doc! { "slug": slug.as_str() })
            .await?;

        doc.map(Post::try_from).transpose()
    }

    /// List a user's posts, oldest first.
    ///
    /// The reverse lookup of the linked-entity write: returns exactly the
    /// posts created against the given author id. The author comes back
    /// unresolved; use [`Self::list_by_author_with_author`] for the
    /// populated form.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored post is invalid.
    pub async fn list_by_author(&self, author: ObjectId) -> Result<Vec<Post>, RepositoryError> {
        let docs: Vec<PostDocument> = self
            .store
            .posts()
            .find(doc! { "author": author })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;

        docs.into_iter().map(Post::try_from).collect()
    }

    /// List a user's posts with the author resolved in place of the bare
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored document is
    /// invalid or the posts reference an author that does not exist.
    pub async fn list_by_author_with_author(
        &self,
        author: ObjectId,
    ) -> Result<Vec<Post>, RepositoryError> {
        let mut posts = self.list_by_author(author).await?;

        if posts.is_empty() {
            return Ok(posts);
        }

        let author_doc = self
            .store
            .users()
            .find_one(doc! { "_id": author })
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "author {author} referenced but not stored"
                ))
            })?;
        let author_user = User::try_from(author_doc)?;

        for post in &mut posts {
            post.author = Ref::Resolved(author_user.clone());
        }

        Ok(posts)
    }
}
