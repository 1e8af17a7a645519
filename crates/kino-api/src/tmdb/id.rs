//! Identifier decoding shared by the TMDB response types.
//!
//! TMDB sends identifiers as JSON numbers; the domain keys everything by
//! string. Both forms are accepted here and normalized to `String`.

use serde::{Deserialize, Deserializer};

/// An identifier as it appears on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    /// Numeric id (the usual TMDB form).
    Number(u64),
    /// Already-stringified id.
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Deserializes an optional id, keeping `null`/missing as `None`.
///
/// Use together with `#[serde(default)]` so an absent field is accepted.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(String::from))
}

/// Deserializes an optional list of ids.
pub fn optional_id_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawId>>::deserialize(deserializer)?;
    Ok(raw.map(|ids| ids.into_iter().map(String::from).collect()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "optional_id")]
        id: Option<String>,
        #[serde(default, deserialize_with = "optional_id_list")]
        ids: Option<Vec<String>>,
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        // Arrange & Act
        let holder: Holder = serde_json::from_str(r#"{"id": 436969}"#).unwrap();

        // Assert
        assert_eq!(holder.id.as_deref(), Some("436969"));
    }

    #[test]
    fn test_string_id_is_kept() {
        // Arrange & Act
        let holder: Holder = serde_json::from_str(r#"{"id": "28"}"#).unwrap();

        // Assert
        assert_eq!(holder.id.as_deref(), Some("28"));
    }

    #[test]
    fn test_missing_and_null_ids_are_none() {
        // Arrange & Act
        let missing: Holder = serde_json::from_str("{}").unwrap();
        let null: Holder = serde_json::from_str(r#"{"id": null, "ids": null}"#).unwrap();

        // Assert
        assert!(missing.id.is_none());
        assert!(missing.ids.is_none());
        assert!(null.id.is_none());
        assert!(null.ids.is_none());
    }

    #[test]
    fn test_mixed_id_list() {
        // Arrange & Act
        let holder: Holder = serde_json::from_str(r#"{"ids": [28, "12", 35]}"#).unwrap();

        // Assert
        assert_eq!(
            holder.ids.unwrap(),
            vec![String::from("28"), String::from("12"), String::from("35")]
        );
    }
}
