//! Insertion-ordered storage of model entities keyed by identifier

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Entities stored in registration order with keyed lookup
#[derive(Debug, Clone)]
pub struct Registry<K, V> {
    entries: Vec<V>,
    keys: Vec<K>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            keys: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Registry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.entries == other.entries
    }
}

impl<K: Eq + Hash + Clone, V> Registry<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value. Returns the value back if the key is already taken.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), V> {
        if self.index.contains_key(&key) {
            return Err(value);
        }
        self.index.insert(key.clone(), self.entries.len());
        self.keys.push(key);
        self.entries.push(value);
        Ok(())
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Registration position of a key
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    /// Entry at a registration position
    pub fn get_index(&self, position: usize) -> Option<(&K, &V)> {
        Some((self.keys.get(position)?, self.entries.get(position)?))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    /// Values in registration order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter()
    }

    /// Key/value pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys.iter().zip(self.entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = Registry::new();
        registry.insert(30, "c").unwrap();
        registry.insert(10, "a").unwrap();
        registry.insert(20, "b").unwrap();

        let keys: Vec<i64> = registry.keys().copied().collect();
        assert_eq!(keys, vec![30, 10, 20]);
        assert_eq!(registry.position(&10), Some(1));
        assert_eq!(registry.get_index(2), Some((&20, &"b")));
        assert_eq!(registry.get_index(3), None);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut registry: Registry<String, f64> = Registry::new();
        registry.insert("steel".to_string(), 1.0).unwrap();
        assert_eq!(registry.insert("steel".to_string(), 2.0), Err(2.0));
        assert_eq!(registry.get("steel"), Some(&1.0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_distinguishes_missing() {
        let registry: Registry<String, f64> = Registry::new();
        assert!(registry.get("missing").is_none());
        assert!(registry.is_empty());
    }
}
