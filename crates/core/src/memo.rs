use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoError {
    #[error("memo key {key} already holds a different value")]
    Conflict { key: String },
}

/// Per-run memo table. Each key is written at most once; a second write
/// with a different value is a logic error.
#[derive(Debug, Clone)]
pub struct WriteOnceCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for WriteOnceCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, V> WriteOnceCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: PartialEq + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: K, value: V) -> Result<&V, MemoError> {
        if let Some(existing) = self.entries.get(&key) {
            if *existing != value {
                return Err(MemoError::Conflict {
                    key: format!("{key:?}"),
                });
            }
        } else {
            self.entries.insert(key.clone(), value);
        }
        Ok(&self.entries[&key])
    }

    pub fn get_or_insert_with<F>(&mut self, key: K, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        self.entries.entry(key).or_insert_with(compute)
    }

    /// Explicit invalidation; only called between runs.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_value_rewrite_is_accepted() {
        let mut cache = WriteOnceCache::new();
        cache.insert("weight", 4.4).unwrap();
        assert_eq!(cache.insert("weight", 4.4), Ok(&4.4));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn conflicting_rewrite_is_rejected() {
        let mut cache = WriteOnceCache::new();
        cache.insert("weight", 4.4).unwrap();
        assert!(matches!(
            cache.insert("weight", 5.0),
            Err(MemoError::Conflict { .. })
        ));
        assert_eq!(cache.get(&"weight"), Some(&4.4));
    }

    #[test]
    fn compute_runs_once_per_key() {
        let mut cache = WriteOnceCache::new();
        let mut calls = 0;
        cache.get_or_insert_with(1u8, || {
            calls += 1;
            10
        });
        cache.get_or_insert_with(1u8, || {
            calls += 1;
            20
        });
        assert_eq!(calls, 1);
        assert_eq!(cache.get(&1), Some(&10));
        cache.reset();
        assert!(cache.is_empty());
    }
}
