use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;

/// Set that remembers first-insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSet<T: Hash + Eq> {
    items: IndexSet<T>,
}

impl<T: Hash + Eq> OrderedSet<T> {
    pub fn new() -> Self {
        Self {
            items: IndexSet::new(),
        }
    }

    /// Returns false when the value was already present; its position is kept
    pub fn add(&mut self, value: T) -> bool {
        self.items.insert(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    pub fn remove(&mut self, value: &T) -> bool {
        self.items.shift_remove(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_ordered_list(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }
}

impl<T: Hash + Eq> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Hash + Eq> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T: Hash + Eq> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = indexmap::set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Identities keyed by the provider's lookup key (numeric ID, or the
/// username itself when the provider has no IDs), each carrying its username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySet<K: Hash + Eq> {
    members: IndexMap<K, String>,
}

impl<K: Hash + Eq> IdentitySet<K> {
    pub fn new() -> Self {
        Self {
            members: IndexMap::new(),
        }
    }

    /// Later additions of a known key refresh the username but keep the position
    pub fn add(&mut self, key: K, username: impl Into<String>) {
        self.members.insert(key, username.into());
    }

    pub fn contains(&self, key: &K) -> bool {
        self.members.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<String> {
        self.members.shift_remove(key)
    }

    /// Union, keeping the order of `self` first
    pub fn merge(&mut self, other: IdentitySet<K>) {
        self.members.extend(other.members);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn to_ordered_list(&self) -> Vec<(K, String)>
    where
        K: Clone,
    {
        self.members
            .iter()
            .map(|(key, name)| (key.clone(), name.clone()))
            .collect()
    }
}

impl<K: Hash + Eq> Default for IdentitySet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq> FromIterator<(K, String)> for IdentitySet<K> {
    fn from_iter<I: IntoIterator<Item = (K, String)>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}
