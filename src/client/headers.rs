//! Default headers sent with every request

use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Insertion-ordered header map with unique keys
///
/// Keys are compared exactly. Inserting an existing key replaces its value in place,
/// so iteration order is the order in which each key was first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultHeaders {
    entries: Vec<(String, String)>,
}

impl DefaultHeaders {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up a header value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a header is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a header, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no headers are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over headers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Header names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DefaultHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = DefaultHeaders::new();
        for (key, value) in iter {
            headers.insert(key, value);
        }
        headers
    }
}

impl IntoIterator for DefaultHeaders {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for DefaultHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DefaultHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = DefaultHeaders;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to header values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut headers = DefaultHeaders::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    headers.insert(key, value);
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut headers = DefaultHeaders::new();
        assert_eq!(headers.insert("A", "1"), None);
        assert_eq!(headers.insert("B", "2"), None);
        assert_eq!(headers.insert("A", "3"), Some("1".to_string()));

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(headers.get("A"), Some("3"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let headers: DefaultHeaders = [("X-Foo", "1"), ("x-foo", "2")].into_iter().collect();

        assert_eq!(headers.len(), 2);
        assert!(!headers.contains_key("X-FOO"));
    }

    #[test]
    fn test_remove() {
        let mut headers: DefaultHeaders = [("A", "1"), ("B", "2")].into_iter().collect();

        assert_eq!(headers.remove("A"), Some("1".to_string()));
        assert_eq!(headers.remove("A"), None);
        assert_eq!(headers.keys().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn test_serde_preserves_order() {
        let headers: DefaultHeaders = [("Z-Last", "1"), ("A-First", "2")].into_iter().collect();

        let json = serde_json::to_string(&headers).unwrap();
        assert_eq!(json, r#"{"Z-Last":"1","A-First":"2"}"#);

        let parsed: DefaultHeaders = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, headers);
    }
}
