//! Memoizing caches for SRID lookups.

use core::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::HashMap;

/// A get-or-compute cache for SRID lookups.
///
/// Values are `Option<String>` so that "no such SRID" answers are remembered
/// too. Failed computations are never stored.
pub trait SridCache<K> {
    /// Returns the cached answer, if the key has been looked up before.
    fn get(&self, key: &K) -> Option<Option<String>>;

    /// Stores an answer, replacing any previous one.
    fn insert(&self, key: K, value: Option<String>);

    /// Returns the cached answer or computes and stores it.
    ///
    /// Two threads missing on the same key both compute; the later insert wins.
    ///
    /// # Errors
    ///
    /// Propagates the error of `compute`, in which case nothing is cached.
    fn get_or_try_insert_with<E, F>(&self, key: K, compute: F) -> Result<Option<String>, E>
    where
        F: FnOnce(&K) -> Result<Option<String>, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute(&key)?;
        self.insert(key, value.clone());
        Ok(value)
    }
}

impl<K, C: SridCache<K> + ?Sized> SridCache<K> for &C {
    fn get(&self, key: &K) -> Option<Option<String>> {
        (**self).get(key)
    }

    fn insert(&self, key: K, value: Option<String>) {
        (**self).insert(key, value);
    }
}

impl<K, C: SridCache<K> + ?Sized> SridCache<K> for Arc<C> {
    fn get(&self, key: &K) -> Option<Option<String>> {
        (**self).get(key)
    }

    fn insert(&self, key: K, value: Option<String>) {
        (**self).insert(key, value);
    }
}

/// Process-local cache behind a single `RwLock`.
#[derive(Debug)]
pub struct InMemorySridCache<K> {
    entries: RwLock<HashMap<K, Option<String>>>,
}

impl<K> Default for InMemorySridCache<K> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K> InMemorySridCache<K> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every cached answer.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<K: Eq + Hash> SridCache<K> for InMemorySridCache<K> {
    fn get(&self, key: &K) -> Option<Option<String>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn insert(&self, key: K, value: Option<String>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_try_insert_with_caches_answers() {
        let cache = InMemorySridCache::<u32>::new();
        let mut calls = 0;
        let first: Result<_, ()> = cache.get_or_try_insert_with(4326, |_| {
            calls += 1;
            Ok(Some("8307".to_owned()))
        });
        assert_eq!(first, Ok(Some("8307".to_owned())));
        let second: Result<_, ()> = cache.get_or_try_insert_with(4326, |_| {
            calls += 1;
            Ok(None)
        });
        assert_eq!(second, Ok(Some("8307".to_owned())));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_missing_answers_are_cached() {
        let cache = InMemorySridCache::<u32>::new();
        let _: Result<_, ()> = cache.get_or_try_insert_with(1, |_| Ok(None));
        assert_eq!(cache.get(&1), Some(None));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = InMemorySridCache::<String>::new();
        let result = cache.get_or_try_insert_with("8307".to_owned(), |_| Err("offline"));
        assert_eq!(result, Err("offline"));
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"8307".to_owned()), None);
    }

    #[test]
    fn test_last_write_wins_and_clear() {
        let cache = InMemorySridCache::<u32>::new();
        cache.insert(1, Some("a".into()));
        cache.insert(1, Some("b".into()));
        assert_eq!(cache.get(&1), Some(Some("b".into())));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_through_arc() {
        let cache = Arc::new(InMemorySridCache::<u32>::new());
        let clone = Arc::clone(&cache);
        clone.insert(3857, Some("3785".into()));
        assert_eq!(SridCache::get(&cache, &3857), Some(Some("3785".into())));
    }
}
