//! User document and domain types.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use quillpress_core::{Address, Email, Ref};

use super::post::Post;
use crate::db::RepositoryError;

/// Stored shape of a user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    /// Generated id; `None` until inserted.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Email address (unique index).
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional embedded address sub-document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Back-reference array: ids of this user's posts, in insertion order.
    pub posts: Vec<ObjectId>,
}

/// A user with reference fields typed (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user id.
    pub id: ObjectId,
    /// Email address (unique natural key).
    pub email: Email,
    /// Argon2 password hash; compare with [`crate::password::verify_password`].
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional embedded address.
    pub address: Option<Address>,
    /// The user's posts, in insertion order. `Reference` as stored,
    /// `Resolved` after a populate-style readback.
    pub posts: Vec<Ref<ObjectId, Post>>,
}

impl TryFrom<UserDocument> for User {
    type Error = RepositoryError;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| RepositoryError::DataCorruption("user document without _id".to_owned()))?;

        let email = Email::parse(&doc.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id,
            email,
            password_hash: doc.password_hash,
            first_name: doc.first_name,
            last_name: doc.last_name,
            address: doc.address,
            posts: doc.posts.into_iter().map(Ref::Reference).collect(),
        })
    }
}

/// Attributes for creating a user.
///
/// Carries an already-hashed password; callers hash with
/// [`crate::password::hash_password`].
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address (must be unused).
    pub email: Email,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional embedded address.
    pub address: Option<Address>,
}

/// A user's display name, e.g. `"Jane Doe"`.
#[must_use]
pub fn full_name(user: &User) -> String {
    format!("{} {}", user.first_name, user.last_name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stored_user() -> UserDocument {
        UserDocument {
            id: Some(ObjectId::new()),
            email: "jane.doe@example.com".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            address: None,
            posts: vec![ObjectId::new()],
        }
    }

    #[test]
    fn test_document_into_domain() {
        let doc = stored_user();
        let post_id = doc.posts.first().copied().unwrap();

        let user = User::try_from(doc).unwrap();
        assert_eq!(user.email.as_str(), "jane.doe@example.com");
        assert_eq!(user.posts.len(), 1);
        assert_eq!(user.posts.first().unwrap().reference(), Some(&post_id));
    }

    #[test]
    fn test_document_without_id_rejected() {
        let mut doc = stored_user();
        doc.id = None;

        assert!(matches!(
            User::try_from(doc),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_document_with_bad_email_rejected() {
        let mut doc = stored_user();
        doc.email = "not-an-email".to_owned();

        assert!(matches!(
            User::try_from(doc),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_full_name() {
        let user = User::try_from(stored_user()).unwrap();
        assert_eq!(full_name(&user), "Jane Doe");
    }

    #[test]
    fn test_unsaved_document_serializes_without_id() {
        let mut doc = stored_user();
        doc.id = None;

        let bson_doc = bson::to_document(&doc).unwrap();
        assert!(!bson_doc.contains_key("_id"));
        assert!(bson_doc.contains_key("email"));
    }
}
