// src/cache.rs
//! In-memory cache of unwrapped per-user keys
//!
//! Constructed once and handed to the [`KeyManager`](crate::manager::KeyManager);
//! never a global. Entries live until invalidated or the process exits.

use dashmap::DashMap;

use crate::crypto::SymmetricKey;

#[derive(Default)]
pub struct KeyCache {
    entries: DashMap<String, SymmetricKey>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<SymmetricKey> {
        self.entries.get(user_id).map(|entry| entry.value().clone())
    }

    /// Insert unless an entry exists; returns whichever key is now cached
    ///
    /// Two loaders racing on the same user, or a loader racing a rotation,
    /// both end up with the first key that landed.
    pub fn get_or_insert(&self, user_id: &str, key: SymmetricKey) -> SymmetricKey {
        self.entries
            .entry(user_id.to_owned())
            .or_insert(key)
            .value()
            .clone()
    }

    /// Unconditional overwrite, used after a committed rotation
    pub fn replace(&self, user_id: &str, key: SymmetricKey) {
        self.entries.insert(user_id.to_owned(), key);
    }

    pub fn invalidate(&self, user_id: &str) {
        self.entries.remove(user_id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::generate_key;
    use std::sync::Arc;

    #[test]
    fn cache_hit_and_miss() {
        let cache = KeyCache::new();
        assert!(cache.get("alice").is_none());

        let key = generate_key();
        cache.replace("alice", key.clone());
        let hit = cache.get("alice").expect("cache hit");
        assert!(hit.same_material(&key));
        assert!(cache.get("bob").is_none());
    }

    #[test]
    fn get_or_insert_keeps_first_writer() {
        let cache = KeyCache::new();
        let first = generate_key();
        let second = generate_key();

        let won = cache.get_or_insert("alice", first.clone());
        assert!(won.same_material(&first));

        let won = cache.get_or_insert("alice", second);
        assert!(won.same_material(&first));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_one_and_clear_all() {
        let cache = KeyCache::new();
        cache.replace("alice", generate_key());
        cache.replace("bob", generate_key());

        cache.invalidate("alice");
        assert!(cache.get("alice").is_none());
        assert!(cache.get("bob").is_some());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_get_or_insert_converges() {
        let cache = Arc::new(KeyCache::new());

        let winners: Vec<SymmetricKey> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    let cache = Arc::clone(&cache);
                    s.spawn(move || cache.get_or_insert("alice", generate_key()))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let cached = cache.get("alice").unwrap();
        assert!(winners.iter().all(|k| k.same_material(&cached)));
    }
}
