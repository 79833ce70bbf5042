//! Keys and values of an in-progress form.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Prefix that turns a field id into its value key.
pub const FIELD_KEY_PREFIX: &str = "field_";

/// Identifies one value slot: the respondent's e-mail or one field.
///
/// Ordering puts `Email` before every field key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Email,
    Field(String),
}

impl FieldKey {
    /// The key for a field id.
    pub fn field(id: impl Into<String>) -> Self {
        Self::Field(id.into())
    }

    /// The field id, or `None` for the e-mail key.
    pub fn field_id(&self) -> Option<&str> {
        match self {
            Self::Email => None,
            Self::Field(id) => Some(id),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Field(id) => write!(f, "{FIELD_KEY_PREFIX}{id}"),
        }
    }
}

/// Error for a string that is neither `email` nor `field_<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFieldKey(pub String);

impl fmt::Display for InvalidFieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid field key '{}'", self.0)
    }
}

impl std::error::Error for InvalidFieldKey {}

impl FromStr for FieldKey {
    type Err = InvalidFieldKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "email" {
            return Ok(Self::Email);
        }
        match s.strip_prefix(FIELD_KEY_PREFIX) {
            Some(id) if !id.is_empty() => Ok(Self::Field(id.to_string())),
            _ => Err(InvalidFieldKey(s.to_string())),
        }
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single answer: free text or a list of selected options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// An empty text value.
    pub const fn empty_text() -> Self {
        Self::Text(String::new())
    }

    /// An empty list value.
    pub const fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    /// Returns `true` for non-empty text or a non-empty list.
    pub fn is_filled(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }

    /// Flattens the value for storage; lists are joined with `", "`.
    pub fn to_stored(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(", "),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Current values of a form, keyed by [`FieldKey`].
pub type FormValues = BTreeMap<FieldKey, FieldValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display_and_parse() {
        assert_eq!(FieldKey::Email.to_string(), "email");
        assert_eq!(FieldKey::field("abc").to_string(), "field_abc");
        assert_eq!("field_abc".parse::<FieldKey>().unwrap(), FieldKey::field("abc"));
        assert_eq!("email".parse::<FieldKey>().unwrap(), FieldKey::Email);
        assert!("field_".parse::<FieldKey>().is_err());
        assert!("name".parse::<FieldKey>().is_err());
    }

    #[test]
    fn test_email_sorts_first() {
        let mut keys = vec![FieldKey::field("a"), FieldKey::Email, FieldKey::field("0")];
        keys.sort();
        assert_eq!(keys[0], FieldKey::Email);
    }

    #[test]
    fn test_value_serde_untagged() {
        let text: FieldValue = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(text, FieldValue::from("hi"));
        let list: FieldValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(list.to_stored(), "a, b");
    }

    #[test]
    fn test_is_filled() {
        assert!(!FieldValue::empty_text().is_filled());
        assert!(!FieldValue::empty_list().is_filled());
        assert!(FieldValue::from(" ").is_filled());
        assert!(FieldValue::from(vec!["x".to_string()]).is_filled());
    }

    #[test]
    fn test_values_map_serializes_with_string_keys() {
        let mut values = FormValues::new();
        values.insert(FieldKey::Email, "a@b.co".into());
        values.insert(FieldKey::field("1"), vec!["x".to_string()].into());
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json["email"], "a@b.co");
        assert_eq!(json["field_1"][0], "x");
    }
}
