//! pbxproj value representation.

use std::collections::HashMap;
use std::fmt;

/// A pbxproj value.
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    /// Quoted or bare string, quoting removed.
    String(String),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// Keyed mapping.
    Mapping(Mapping),
}

impl Value {
    /// Name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an `Array`.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns a mutable reference to the array if this is an `Array`.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns a reference to the mapping if this is a `Mapping`.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns a mutable reference to the mapping if this is a `Mapping`.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` if this is a `Mapping`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(arr) => f.debug_list().entries(arr).finish(),
            Value::Mapping(map) => fmt::Debug::fmt(map, f),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

/// String-keyed mapping that remembers insertion order.
///
/// Overwriting a key keeps its original position, so a document read and
/// written back lists its entries in source order.
#[derive(Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set `key` to `value`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Remove `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let i = self.index.remove(key)?;
        let (_, value) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// Equality ignores entry order.
impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| v == ov))
    }
}

impl Eq for Mapping {}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut map = Mapping::new();
        assert_eq!(map.insert("a", "1".into()), None);
        assert_eq!(map.insert("b", "2".into()), None);
        assert_eq!(map.insert("a", "3".into()), Some(Value::from("1")));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a").and_then(Value::as_str), Some("3"));
        assert_eq!(
            map.values().filter_map(Value::as_str).collect::<Vec<_>>(),
            vec!["3", "2"]
        );
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut map: Mapping = [("a", Value::from("1")), ("b", "2".into()), ("c", "3".into())]
            .into_iter()
            .collect();
        assert_eq!(map.remove("b"), Some(Value::from("2")));
        assert_eq!(map.remove("b"), None);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(map.get("c"), Some(&Value::from("3")));
        map.insert("d", "4".into());
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_mapping_equality_ignores_order() {
        let a: Mapping = [("x", Value::from("1")), ("y", "2".into())]
            .into_iter()
            .collect();
        let b: Mapping = [("y", Value::from("2")), ("x", "1".into())]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_accessors() {
        let mut value = Value::Mapping(
            [("files", Value::Array(vec!["a.swift".into()]))]
                .into_iter()
                .collect(),
        );
        assert_eq!(value.kind(), "mapping");
        assert!(value.as_str().is_none());
        value
            .as_mapping_mut()
            .and_then(|m| m.get_mut("files"))
            .and_then(Value::as_array_mut)
            .unwrap()
            .push("b.swift".into());
        assert_eq!(value.get("files").and_then(Value::as_array).unwrap().len(), 2);
    }

    #[test]
    fn test_debug() {
        let value = Value::Array(vec![
            "a".into(),
            Value::Mapping([("k", Value::from("v"))].into_iter().collect()),
        ]);
        assert_eq!(format!("{:?}", value), r#"["a", {"k": "v"}]"#);
    }
}
