//! Insertion-ordered object storage.
//!
//! One structure serves both array and map semantics: sequential integer
//! keys starting at zero give array behavior, string keys give map
//! behavior, and both kinds coexist. Entry order is insertion order - the
//! object string form and `for` iteration depend on it.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::Value;

/// Property key: integer index or string name.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum PropKey {
    Index(u64),
    Name(String),
}

impl PropKey {
    /// Normalize a string key: text that spells a plain non-negative
    /// integer (no sign, no leading zeros) acts as that index.
    pub fn normalize(name: &str) -> PropKey {
        let canonical = name == "0" || (!name.starts_with('0') && !name.starts_with('+'));
        match name.parse::<u64>() {
            Ok(index) if canonical => PropKey::Index(index),
            _ => PropKey::Name(name.to_string()),
        }
    }

    /// String form of the key, as bound to `for` key variables.
    pub fn to_text(&self) -> String {
        match self {
            PropKey::Index(index) => index.to_string(),
            PropKey::Name(name) => name.clone(),
        }
    }
}

/// Ordered key-value storage behind `Value::Object`.
#[derive(Clone, Debug, Default)]
pub struct ObjectValue {
    entries: IndexMap<PropKey, Value, FxBuildHasher>,
    next_index: u64,
}

impl ObjectValue {
    pub fn new() -> Self {
        ObjectValue::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a value under the next auto index.
    pub fn push(&mut self, value: Value) {
        let key = PropKey::Index(self.next_index);
        self.next_index += 1;
        self.entries.insert(key, value);
    }

    /// Insert under an explicit key; integer keys advance the auto index
    /// past themselves so later appends never collide.
    pub fn set(&mut self, key: PropKey, value: Value) {
        if let PropKey::Index(index) = key {
            self.next_index = self.next_index.max(index.saturating_add(1));
        }
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &PropKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&PropKey, &Value)> {
        self.entries.iter()
    }

    /// Array semantics hold when the greatest integer index plus one equals
    /// the entry count.
    pub fn is_array(&self) -> bool {
        let max_index = self
            .entries
            .keys()
            .filter_map(|key| match key {
                PropKey::Index(index) => Some(*index),
                PropKey::Name(_) => None,
            })
            .max();
        match max_index {
            Some(max_index) => max_index + 1 == self.entries.len() as u64,
            None => self.entries.is_empty(),
        }
    }

    /// Merge for the `add` operator: left entries first, then right entries,
    /// re-indexing the right side's integer keys through the auto counter.
    pub fn merge(&self, other: &ObjectValue) -> ObjectValue {
        let mut merged = self.clone();
        for (key, value) in other.entries() {
            match key {
                PropKey::Index(_) => merged.push(value.clone()),
                PropKey::Name(name) => merged.set(PropKey::Name(name.clone()), value.clone()),
            }
        }
        merged
    }
}

/// Order-sensitive equality: same entries in the same insertion order.
impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a == b)
    }
}

impl FromIterator<Value> for ObjectValue {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut object = ObjectValue::new();
        for value in iter {
            object.push(value);
        }
        object
    }
}
