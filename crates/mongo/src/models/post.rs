//! Post document and domain types.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use quillpress_core::{Ref, Slug};

use super::comment::Comment;
use super::user::User;
use crate::db::RepositoryError;

/// Stored shape of a post document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDocument {
    /// Generated id; `None` until inserted.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// URL slug (unique index).
    pub slug: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Id of the authoring user.
    pub author: ObjectId,
    /// Back-reference array: ids of this post's comments, in insertion order.
    pub comments: Vec<ObjectId>,
}

/// A post with reference fields typed (domain type).
#[derive(Debug, Clone)]
pub struct Post {
    /// Unique post id.
    pub id: ObjectId,
    /// URL slug (unique natural key).
    pub slug: Slug,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// The authoring user. `Reference` as stored, `Resolved` after a
    /// populate-style readback.
    pub author: Ref<ObjectId, User>,
    /// The post's comments, in insertion order.
    pub comments: Vec<Ref<ObjectId, Comment>>,
}

impl TryFrom<PostDocument> for Post {
    type Error = RepositoryError;

    fn try_from(doc: PostDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| RepositoryError::DataCorruption("post document without _id".to_owned()))?;

        let slug = Slug::parse(&doc.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid slug in database: {e}"))
        })?;

        Ok(Self {
            id,
            slug,
            title: doc.title,
            body: doc.body,
            author: Ref::Reference(doc.author),
            comments: doc.comments.into_iter().map(Ref::Reference).collect(),
        })
    }
}

/// Attributes for creating a post.
///
/// The author is supplied separately - it is not known until the owner side
/// of the linked write has been persisted.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// URL slug (must be unused).
    pub slug: Slug,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_document_into_domain() {
        let author = ObjectId::new();
        let doc = PostDocument {
            id: Some(ObjectId::new()),
            slug: "my-first-post".to_owned(),
            title: "My First Post".to_owned(),
            body: "This is the body of my first post.".to_owned(),
            author,
            comments: vec![],
        };

        let post = Post::try_from(doc).unwrap();
        assert_eq!(post.slug.as_str(), "my-first-post");
        assert_eq!(post.author.reference(), Some(&author));
        assert!(post.comments.is_empty());
    }

    #[test]
    fn test_document_with_bad_slug_rejected() {
        let doc = PostDocument {
            id: Some(ObjectId::new()),
            slug: "Not A Slug".to_owned(),
            title: "T".to_owned(),
            body: "B".to_owned(),
            author: ObjectId::new(),
            comments: vec![],
        };

        assert!(matches!(
            Post::try_from(doc),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
