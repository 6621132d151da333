//! A string-keyed, type-erased mapping.

use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;

use serde_core::ser::SerializeMap;
use serde_core::{Serialize, Serializer};

use crate::value::{Value, ValueKind};

// -----------------------------------------------------------------------------
// PatchMap

/// A mapping from string keys to arbitrary [`Value`]s.
///
/// `PatchMap` is both the *output* of the filtering engine and its generic
/// *input* mapping ("string to anything"). Keys are unique, insertion order
/// is not preserved, and entries own their values — filtering never aliases
/// caller data.
///
/// A `PatchMap` serializes as a plain map through any serde serializer, with
/// each entry going through its value's own serialization. [`Null`] entries
/// come out as the format's null marker, which is how "explicitly cleared"
/// survives the trip while untouched fields are simply absent.
///
/// # Examples
///
/// ## Building and reading entries
///
/// ```
/// use patchmap::PatchMap;
///
/// let mut map = PatchMap::new();
/// map.insert("name", "Ada".to_string());
/// map.insert("age", 36_i64);
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get_as::<String>("name"), Some(&"Ada".to_string()));
/// assert_eq!(map.get_as::<i64>("age"), Some(&36));
/// assert!(map.get("missing").is_none());
/// ```
///
/// ## Serializing
///
/// ```
/// use patchmap::{Null, PatchMap};
///
/// let mut map = PatchMap::new();
/// map.insert("a", 1_i64);
/// map.insert("b", Null);
///
/// assert_eq!(
///     serde_json::to_value(&map).unwrap(),
///     serde_json::json!({ "a": 1, "b": null }),
/// );
/// ```
///
/// [`Null`]: crate::Null
#[derive(Default)]
pub struct PatchMap {
    entries: HashMap<String, Box<dyn Value>>,
}

impl PatchMap {
    /// Creates an empty `PatchMap`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Creates an empty `PatchMap` with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts a value under `key`, replacing and returning any previous
    /// value stored there.
    #[inline]
    pub fn insert<V: Value>(&mut self, key: impl Into<String>, value: V) -> Option<Box<dyn Value>> {
        self.insert_boxed(key, Box::new(value))
    }

    /// Inserts an already-boxed value under `key`, replacing and returning
    /// any previous value stored there.
    #[inline]
    pub fn insert_boxed(
        &mut self,
        key: impl Into<String>,
        value: Box<dyn Value>,
    ) -> Option<Box<dyn Value>> {
        self.entries.insert(key.into(), value)
    }

    /// Inserts a boxed value under `key` only when the key is absent.
    ///
    /// Returns `true` if the value was inserted. This is the first-writer-wins
    /// primitive behind embedded field promotion.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: Box<dyn Value>) -> bool {
        match self.entries.entry(key.into()) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Returns a reference to the value stored under `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&dyn Value> {
        self.entries.get(key).map(|value| &**value)
    }

    /// Returns a typed reference to the value stored under `key`.
    ///
    /// Returns `None` if the key is absent or the value is not a `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use patchmap::PatchMap;
    /// let mut map = PatchMap::new();
    /// map.insert("count", 3_i64);
    ///
    /// assert_eq!(map.get_as::<i64>("count"), Some(&3));
    /// assert_eq!(map.get_as::<String>("count"), None); // wrong type
    /// ```
    #[inline]
    pub fn get_as<T: Value>(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(<dyn Value>::downcast_ref)
    }

    /// Returns `true` if the map contains `key`.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key` from the map, returning its value if it was present.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Value>> {
        self.entries.remove(key)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Value)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), &**value))
    }

    /// Returns an iterator over the keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Clone for PatchMap {
    fn clone(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), value.clone_value()))
                .collect(),
        }
    }
}

impl fmt::Debug for PatchMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Serialize for PatchMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            state.serialize_entry(key, value)?;
        }
        state.end()
    }
}

impl Value for PatchMap {
    #[inline]
    fn kind(&self) -> ValueKind {
        ValueKind::Map
    }

    #[inline]
    fn as_patch_map(&self) -> Option<&PatchMap> {
        Some(self)
    }

    #[inline]
    fn clone_value(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }
}

impl<K: Into<String>, V: Value> FromIterator<(K, V)> for PatchMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(items: I) -> Self {
        let mut map = PatchMap::new();
        for (key, value) in items {
            map.insert(key, value);
        }
        map
    }
}

impl<K: Into<String>> FromIterator<(K, Box<dyn Value>)> for PatchMap {
    fn from_iter<I: IntoIterator<Item = (K, Box<dyn Value>)>>(items: I) -> Self {
        let mut map = PatchMap::new();
        for (key, value) in items {
            map.insert_boxed(key, value);
        }
        map
    }
}

impl IntoIterator for PatchMap {
    type Item = (String, Box<dyn Value>);
    type IntoIter = hash_map::IntoIter<String, Box<dyn Value>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a PatchMap {
    type Item = (&'a str, &'a dyn Value);
    type IntoIter = std::iter::Map<
        hash_map::Iter<'a, String, Box<dyn Value>>,
        fn((&'a String, &'a Box<dyn Value>)) -> (&'a str, &'a dyn Value),
    >;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), &**value))
    }
}

// -----------------------------------------------------------------------------
// Tests
