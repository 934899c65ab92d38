//! Bounded in-memory map with time-to-live expiry
//!
//! Used for per-session state that must not outlive its usefulness: entries
//! expire `ttl` after their last access, and once `capacity` is reached the
//! least recently used entry is evicted.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    last_access: Instant,
}

pub struct ExpiringMap<K, V> {
    ttl: Duration,
    capacity: usize,
    entries: HashMap<K, Entry<V>>,
}

impl<K: Eq + Hash + Clone, V> ExpiringMap<K, V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_at(key, value, Instant::now())
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.get_mut_at(key, Instant::now()).map(|v| &*v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.get_mut_at(key, Instant::now())
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    pub(crate) fn insert_at(&mut self, key: K, value: V, now: Instant) -> Option<V> {
        self.purge_expired(now);

        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                let Some(oldest) = self
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_access)
                    .map(|(k, _)| k.clone())
                else {
                    break;
                };
                self.entries.remove(&oldest);
                log::debug!("Evicted least recently used entry");
            }
        }

        self.entries
            .insert(
                key,
                Entry {
                    value,
                    last_access: now,
                },
            )
            .map(|e| e.value)
    }

    pub(crate) fn get_mut_at(&mut self, key: &K, now: Instant) -> Option<&mut V> {
        let expired = self
            .entries
            .get(key)
            .map_or(false, |e| now.duration_since(e.last_access) >= self.ttl);
        if expired {
            self.entries.remove(key);
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.last_access = now;
        Some(&mut entry.value)
    }

    /// Drop every entry idle for at least `ttl`
    pub(crate) fn purge_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.duration_since(e.last_access) < ttl);
        let purged = before - self.entries.len();
        if purged > 0 {
            log::debug!("Purged {} expired entries", purged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_expire_after_ttl() {
        let mut map = ExpiringMap::new(Duration::from_secs(60), 10);
        let start = Instant::now();

        map.insert_at("a", 1, start);
        assert_eq!(map.get_mut_at(&"a", start + Duration::from_secs(30)), Some(&mut 1));

        // Access refreshed the entry, so it survives past the original deadline
        assert!(map.get_mut_at(&"a", start + Duration::from_secs(80)).is_some());
        assert!(map.get_mut_at(&"a", start + Duration::from_secs(200)).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let mut map = ExpiringMap::new(Duration::from_secs(600), 2);
        let start = Instant::now();

        map.insert_at("a", 1, start);
        map.insert_at("b", 2, start + Duration::from_secs(1));
        map.get_mut_at(&"a", start + Duration::from_secs(2));
        map.insert_at("c", 3, start + Duration::from_secs(3));

        assert_eq!(map.len(), 2);
        assert!(map.get_mut_at(&"b", start + Duration::from_secs(4)).is_none());
        assert!(map.get_mut_at(&"a", start + Duration::from_secs(4)).is_some());
        assert!(map.get_mut_at(&"c", start + Duration::from_secs(4)).is_some());
    }

    #[test]
    fn test_replace_existing_key_does_not_evict() {
        let mut map = ExpiringMap::new(Duration::from_secs(600), 2);
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 10), Some(1));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"a"), Some(&10));
        assert_eq!(map.remove(&"b"), Some(2));
    }

    #[test]
    fn test_insert_purges_expired() {
        let mut map = ExpiringMap::new(Duration::from_secs(10), 10);
        let start = Instant::now();
        map.insert_at("a", 1, start);
        map.insert_at("b", 2, start + Duration::from_secs(20));
        assert_eq!(map.len(), 1);
    }
}
