//! Items the engine can search
//!
//! Anything that can hand out a string value for an attribute name is
//! searchable. Maps of strings work out of the box; [`Record`] is a small
//! owned type for ad hoc data, and [`crate::SearchEngine::search_by`] takes
//! an accessor closure for types that can't implement the trait.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Exposes named string attributes for matching.
///
/// Returning `None` means the item has no such attribute; the engine skips it
/// and scores the item with the attributes it does have.
pub trait Searchable {
    fn attribute(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> Searchable for HashMap<String, String, S> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl Searchable for BTreeMap<String, String> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn attribute(&self, key: &str) -> Option<&str> {
        (**self).attribute(key)
    }
}

/// A searchable record with named string fields.
///
/// # Example
///
/// ```rust
/// use fuzzyrank::search::record::{Record, Searchable};
///
/// let record = Record::new()
///     .with_field("fname", "John")
///     .with_field("lname", "Doe");
/// assert_eq!(record.attribute("fname"), Some("John"));
/// assert_eq!(record.attribute("job"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Field name -> value mapping
    pub fields: AHashMap<String, String>,

    /// Optional user data (e.g., database ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<u64>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record carrying user data
    pub fn with_data(data: u64) -> Self {
        Self {
            fields: AHashMap::new(),
            data: Some(data),
        }
    }

    /// Builder-style [`Record::set_field`]
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn remove_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl Searchable for Record {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get_field(key)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.set_field(name, value);
        }
        record
    }
}
