//! Reference/resolved sum type.

use serde::Serialize;

/// A reference field that is either a bare identity or a fetched entity.
///
/// Document stores hand back reference arrays as bare ids; a populate-style
/// readback replaces them with the full target entity. Collapsing both forms
/// into one runtime type leaves the distinction to caller discipline, so the
/// two forms are separate variants and every access site must say which one
/// it expects.
///
/// Serializes untagged: a `Reference` renders as the id alone, a `Resolved`
/// as the embedded entity.
///
/// ## Example
///
/// ```
/// use quillpress_core::Ref;
///
/// let bare: Ref<i32, String> = Ref::Reference(7);
/// assert_eq!(bare.reference(), Some(&7));
/// assert!(bare.resolved().is_none());
///
/// let full: Ref<i32, String> = Ref::Resolved("hello".to_owned());
/// assert_eq!(full.resolved().map(String::as_str), Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Ref<Id, T> {
    /// Bare identity, as stored.
    Reference(Id),
    /// Fetched target embedded in place of the identity.
    Resolved(T),
}

impl<Id, T> Ref<Id, T> {
    /// Returns `true` if the target has been fetched.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The bare identity, if this is an unresolved reference.
    #[must_use]
    pub const fn reference(&self) -> Option<&Id> {
        match self {
            Self::Reference(id) => Some(id),
            Self::Resolved(_) => None,
        }
    }

    /// The fetched entity, if this reference has been resolved.
    #[must_use]
    pub const fn resolved(&self) -> Option<&T> {
        match self {
            Self::Reference(_) => None,
            Self::Resolved(entity) => Some(entity),
        }
    }

    /// Consumes the reference and returns the fetched entity, if resolved.
    #[must_use]
    pub fn into_resolved(self) -> Option<T> {
        match self {
            Self::Reference(_) => None,
            Self::Resolved(entity) => Some(entity),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let bare: Ref<i32, &str> = Ref::Reference(1);
        assert!(!bare.is_resolved());
        assert_eq!(bare.reference(), Some(&1));
        assert_eq!(bare.resolved(), None);

        let full: Ref<i32, &str> = Ref::Resolved("post");
        assert!(full.is_resolved());
        assert_eq!(full.reference(), None);
        assert_eq!(full.resolved(), Some(&"post"));
        assert_eq!(full.into_resolved(), Some("post"));
    }

    #[test]
    fn test_serialize_untagged() {
        let bare: Ref<i32, String> = Ref::Reference(7);
        assert_eq!(serde_json::to_string(&bare).unwrap(), "7");

        let full: Ref<i32, String> = Ref::Resolved("hello".to_owned());
        assert_eq!(serde_json::to_string(&full).unwrap(), "\"hello\"");
    }
}
