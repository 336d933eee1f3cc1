//! Comment document and domain types.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use quillpress_core::Ref;

use super::post::Post;
use crate::db::RepositoryError;

/// Stored shape of a comment document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDocument {
    /// Generated id; `None` until inserted.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Comment text.
    pub comment: String,
    /// Id of the parent post.
    pub post: ObjectId,
}

/// A comment with reference fields typed (domain type).
#[derive(Debug, Clone)]
pub struct Comment {
    /// Unique comment id.
    pub id: ObjectId,
    /// Comment text.
    pub comment: String,
    /// The parent post.
    pub post: Ref<ObjectId, Post>,
}

impl TryFrom<CommentDocument> for Comment {
    type Error = RepositoryError;

    fn try_from(doc: CommentDocument) -> Result<Self, Self::Error> {
        let id = doc.id.ok_or_else(|| {
            RepositoryError::DataCorruption("comment document without _id".to_owned())
        })?;

        Ok(Self {
            id,
            comment: doc.comment,
            post: Ref::Reference(doc.post),
        })
    }
}

/// Attributes for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Comment text.
    pub comment: String,
}
