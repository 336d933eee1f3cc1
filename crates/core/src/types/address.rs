//! Embedded postal address.

use serde::{Deserialize, Serialize};

/// A postal address embedded in a user.
///
/// All four fields are required together; a user either has a complete
/// address or none at all. The relational backend enforces this with a
/// CHECK constraint and validates again on decode, the document backend
/// stores the whole struct as one optional sub-document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line, e.g. "123 Main St".
    pub street: String,
    /// City name.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub zip: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let address = Address {
            street: "123 Main St".to_owned(),
            city: "Anytown".to_owned(),
            state: "Anystate".to_owned(),
            zip: "12345".to_owned(),
        };

        let json = serde_json::to_string(&address).unwrap();
        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn test_missing_field_rejected() {
        let partial = r#"{"street": "123 Main St", "city": "Anytown", "state": "Anystate"}"#;
        assert!(serde_json::from_str::<Address>(partial).is_err());
    }
}
