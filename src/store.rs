use parking_lot::Mutex;
use std::collections::HashMap;

/// Values which stop being meaningful after a point in time
pub trait Expiring {
    /// EPOCH timestamp in seconds after which the value is stale
    fn expires_at(&self) -> u64;
}

/// Key value store for short lived entries like otp records and sessions.
///
/// The process local [`MemoryStore`] is the only implementation shipped, a shared
/// cache with TTL support can implement the same trait for multi instance deployments.
pub trait EphemeralStore<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;

    /// Insert or overwrite the entry for `key`
    fn set(&self, key: &str, value: V);

    fn delete(&self, key: &str) -> Option<V>;

    /// Run `f` on the entry for `key` while holding the store lock.
    /// The entry is removed when `f` returns `false`.
    /// Returns `false` when there was no entry for `key`.
    fn update(&self, key: &str, f: &mut dyn FnMut(&mut V) -> bool) -> bool;

    /// Remove every entry with `expires_at < now`, returns the number removed
    fn sweep_expired(&self, now: u64) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct MemoryStore<V> {
    entries: Mutex<HashMap<String, V>>,
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> EphemeralStore<V> for MemoryStore<V>
where
    V: Expiring + Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: V) {
        self.entries.lock().insert(key.to_owned(), value);
    }

    fn delete(&self, key: &str) -> Option<V> {
        self.entries.lock().remove(key)
    }

    fn update(&self, key: &str, f: &mut dyn FnMut(&mut V) -> bool) -> bool {
        let mut entries = self.entries.lock();
        let Some(value) = entries.get_mut(key) else {
            return false;
        };
        if !f(value) {
            entries.remove(key);
        }
        true
    }

    fn sweep_expired(&self, now: u64) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, value| value.expires_at() >= now);
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        val: u32,
        exp: u64,
    }

    impl Expiring for Entry {
        fn expires_at(&self) -> u64 {
            self.exp
        }
    }

    #[test]
    fn test_set_get_delete() {
        let store: MemoryStore<Entry> = MemoryStore::new();
        assert_eq!(store.get("a"), None);
        store.set("a", Entry { val: 1, exp: 10 });
        store.set("a", Entry { val: 2, exp: 10 });
        assert_eq!(store.get("a"), Some(Entry { val: 2, exp: 10 }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.delete("a"), Some(Entry { val: 2, exp: 10 }));
        assert_eq!(store.delete("a"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_keeps_or_removes_entry() {
        let store: MemoryStore<Entry> = MemoryStore::new();
        assert_eq!(store.update("missing", &mut |_: &mut Entry| true), false);
        store.set("a", Entry { val: 1, exp: 10 });
        let found = store.update("a", &mut |entry| {
            entry.val += 1;
            true
        });
        assert!(found);
        assert_eq!(store.get("a").map(|entry| entry.val), Some(2));
        let found = store.update("a", &mut |_| false);
        assert!(found);
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_sweep_expired() {
        let store: MemoryStore<Entry> = MemoryStore::new();
        store.set("old", Entry { val: 1, exp: 99 });
        store.set("edge", Entry { val: 2, exp: 100 });
        store.set("new", Entry { val: 3, exp: 200 });
        assert_eq!(store.sweep_expired(100), 1);
        assert_eq!(store.get("old"), None);
        assert!(store.get("edge").is_some());
        assert!(store.get("new").is_some());
        assert_eq!(store.sweep_expired(100), 0);
    }
}
