//! Ordered change sets.
//!
//! A [`ChangeSet`] is a list of `(property, Option<value>)` pairs consumed by
//! [`crate::assign`]. `None` is the absent marker and deletes the property.
//! Insertion order is kept; it decides when the clone happens but never the
//! final result for distinct properties.

use serde_json::{Map, Value};

use crate::error::{UpdateError, json_kind};

/// Property changes for one batch update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet<V = Value> {
    entries: Vec<(String, Option<V>)>,
}

impl<V> ChangeSet<V> {
    /// Create an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder: set `property` to `value`.
    #[must_use]
    pub fn set(mut self, property: impl Into<String>, value: V) -> Self {
        self.push(property, Some(value));
        self
    }

    /// Builder: delete `property`.
    #[must_use]
    pub fn delete(mut self, property: impl Into<String>) -> Self {
        self.push(property, None);
        self
    }

    /// Append a raw pair; `None` deletes.
    pub fn push(&mut self, property: impl Into<String>, value: Option<V>) {
        self.entries.push((property.into(), value));
    }

    /// Number of pairs, including repeats of the same property.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&V>)> {
        self.entries
            .iter()
            .map(|(property, value)| (property.as_str(), value.as_ref()))
    }
}

impl ChangeSet<Value> {
    /// Build a change set from a JSON object.
    ///
    /// With `null_deletes`, a JSON `null` is the absent marker and deletes
    /// the property; otherwise `null` is stored as a value.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::InvalidChangeSet`] if `value` is not an object.
    pub fn from_json(value: Value, null_deletes: bool) -> Result<Self, UpdateError> {
        match value {
            Value::Object(map) => Ok(Self::from_object(map, null_deletes)),
            other => Err(UpdateError::InvalidChangeSet {
                found: json_kind(&other),
            }),
        }
    }

    /// Build a change set from a JSON object's entries.
    #[must_use]
    pub fn from_object(map: Map<String, Value>, null_deletes: bool) -> Self {
        map.into_iter()
            .map(|(property, value)| {
                let value = if null_deletes && value.is_null() {
                    None
                } else {
                    Some(value)
                };
                (property, value)
            })
            .collect()
    }
}

impl<V> Default for ChangeSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, K: Into<String>> FromIterator<(K, Option<V>)> for ChangeSet<V> {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(property, value)| (property.into(), value))
                .collect(),
        }
    }
}

impl<V> IntoIterator for ChangeSet<V> {
    type Item = (String, Option<V>);
    type IntoIter = std::vec::IntoIter<(String, Option<V>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V: Clone> IntoIterator for &'a ChangeSet<V> {
    type Item = (&'a str, Option<V>);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, Option<V>)>,
        fn(&'a (String, Option<V>)) -> (&'a str, Option<V>),
    >;

    fn into_iter(self) -> Self::IntoIter {
        fn borrow_pair<T: Clone>(pair: &(String, Option<T>)) -> (&str, Option<T>) {
            (pair.0.as_str(), pair.1.clone())
        }
        self.entries
            .iter()
            .map(borrow_pair::<V> as fn(&'a (String, Option<V>)) -> (&'a str, Option<V>))
    }
}
