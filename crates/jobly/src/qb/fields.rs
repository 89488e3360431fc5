//! Ordered column → value maps for write statements.

use crate::error::{JoblyError, JoblyResult};
use crate::qb::param::FieldValue;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;

/// Keys starting with this character carry request metadata (e.g. `_token`)
/// and are never written to the store.
pub const RESERVED_PREFIX: char = '_';

/// Returns `true` if `key` is request metadata rather than a column.
pub fn is_reserved(key: &str) -> bool {
    key.starts_with(RESERVED_PREFIX)
}

/// An insertion-ordered map of column name to new value.
///
/// Iteration order is the order keys were first inserted, which is also the
/// order placeholders are assigned in generated statements. Deserializing
/// from JSON keeps the document's key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. Re-inserting a key replaces its value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Chainable form of [`FieldMap::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, including reserved metadata keys.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries that may become columns: reserved-prefixed keys are skipped.
    pub fn updatable(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.iter().filter(|(k, _)| !is_reserved(k))
    }

    /// Restrict the updatable entries to `allowed` columns.
    ///
    /// Reserved keys are dropped silently; any other key outside `allowed`
    /// fails with [`JoblyError::UnknownColumn`].
    pub fn permit(&self, table: &str, allowed: &[&str]) -> JoblyResult<FieldMap> {
        self.updatable()
            .map(|(k, v)| {
                if allowed.contains(&k) {
                    Ok((k.to_string(), v.clone()))
                } else {
                    Err(JoblyError::UnknownColumn {
                        table: table.to_string(),
                        column: k.to_string(),
                    })
                }
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Keeps the object's key order (`serde_json` is built with `preserve_order`).
impl TryFrom<serde_json::Value> for FieldMap {
    type Error = JoblyError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let serde_json::Value::Object(object) = value else {
            return Err(JoblyError::validation("expected a JSON object of fields"));
        };
        object
            .into_iter()
            .map(|(k, v)| FieldValue::try_from(v).map(|v| (k, v)))
            .collect()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column names to scalar values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = FieldMap::new();
                while let Some((key, value)) = access.next_entry::<String, FieldValue>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_insertion_order() {
        let mut map = FieldMap::new();
        map.insert("name", "a").insert("email", "b").insert("name", "c");

        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "email"]);
        assert_eq!(map.get("name"), Some(&FieldValue::Text("c".into())));
    }

    #[test]
    fn updatable_skips_reserved_keys_anywhere() {
        let map = FieldMap::new()
            .with("_token", "t")
            .with("name", "Acme")
            .with("_meta", 1i64)
            .with("description", "widgets");

        let keys: Vec<_> = map.updatable().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "description"]);
    }

    #[test]
    fn permit_rejects_columns_outside_allow_list() {
        let map = FieldMap::new().with("first_name", "Ada").with("is_admin", true);
        let err = map
            .permit("users", &["first_name", "last_name"])
            .unwrap_err();
        assert!(matches!(
            err,
            JoblyError::UnknownColumn { ref column, .. } if column == "is_admin"
        ));
    }

    #[test]
    fn permit_drops_reserved_keys_silently() {
        let map = FieldMap::new().with("_token", "t").with("first_name", "Ada");
        let permitted = map.permit("users", &["first_name"]).unwrap();
        assert_eq!(permitted.len(), 1);
        assert!(permitted.get("_token").is_none());
    }

    #[test]
    fn deserialize_preserves_document_order() {
        let map: FieldMap =
            serde_json::from_str(r#"{"num_employees": 10, "_token": "x", "description": "d"}"#)
                .unwrap();
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["num_employees", "_token", "description"]);
    }

    #[test]
    fn try_from_json_keeps_key_order() {
        let map = FieldMap::try_from(serde_json::json!({
            "name": "Acme",
            "description": "d",
            "_token": "x",
            "logo_url": null,
        }))
        .unwrap();
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "description", "_token", "logo_url"]);

        let stmt = crate::qb::build_update("companies", &map, "handle", "acme", None).unwrap();
        assert_eq!(
            stmt.text,
            "UPDATE companies SET name=$1, description=$2, logo_url=$3 WHERE handle=$4 RETURNING *"
        );
    }

    #[test]
    fn try_from_json_requires_object() {
        assert!(FieldMap::try_from(serde_json::json!(["a"])).is_err());
        assert!(FieldMap::try_from(serde_json::json!({"a": {"b": 1}})).is_err());
        let map = FieldMap::try_from(serde_json::json!({"a": 1})).unwrap();
        assert_eq!(map.get("a"), Some(&FieldValue::Int(1)));
    }
}
