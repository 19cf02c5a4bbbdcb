use parking_lot::{Mutex, MutexGuard};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

/// A map sharded over a fixed number of independently locked submaps, so
/// that concurrent writers touching different shards never contend.
///
/// Used by the scorer to accumulate per-document relevance from worker
/// threads; each `access` locks exactly one shard for the lifetime of the
/// returned guard.
pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<HashMap<K, V>>>,
}

/// Exclusive access to one value, holding its shard's lock. The lock is
/// released when the guard drops, including on unwind.
pub struct ValueGuard<'a, K: Eq + Hash, V> {
    shard: MutexGuard<'a, HashMap<K, V>>,
    key: K,
}

impl<K: Eq + Hash, V> Deref for ValueGuard<'_, K, V> {
    type Target = V;

    fn deref(&self) -> &V {
        self.shard
            .get(&self.key)
            .expect("value is inserted when the guard is created")
    }
}

impl<K: Eq + Hash, V> DerefMut for ValueGuard<'_, K, V> {
    fn deref_mut(&mut self) -> &mut V {
        self.shard
            .get_mut(&self.key)
            .expect("value is inserted when the guard is created")
    }
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Eq + Hash + Ord + Clone,
    V: Default,
{
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "shard count must be positive");
        Self {
            shards: (0..shard_count).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    fn shard_index(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    /// Lock the key's shard and return exclusive access to its value,
    /// default-constructing the value if the key is absent.
    pub fn access(&self, key: K) -> ValueGuard<'_, K, V> {
        let mut shard = self.shards[self.shard_index(&key)].lock();
        shard.entry(key.clone()).or_default();
        ValueGuard { shard, key }
    }

    /// Remove the key from its owning shard. Returns whether it was present.
    pub fn erase(&self, key: &K) -> bool {
        self.shards[self.shard_index(key)].lock().remove(key).is_some()
    }

    /// Merge every shard into one key-ordered map. Shards are locked one at
    /// a time, so this is safe while other threads mutate other shards.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut merged = BTreeMap::new();
        for shard in &self.shards {
            let shard = shard.lock();
            merged.extend(shard.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_default_constructs_missing_values() {
        let map: ConcurrentMap<i32, f64> = ConcurrentMap::new(4);
        assert_eq!(*map.access(1), 0.0);
        *map.access(1) += 2.5;
        assert_eq!(*map.access(1), 2.5);
    }

    #[test]
    fn erase_removes_entry() {
        let map: ConcurrentMap<i32, i32> = ConcurrentMap::new(4);
        *map.access(7) = 42;
        assert!(map.erase(&7));
        assert!(!map.erase(&7));
        assert!(map.build_ordinary_map().is_empty());
    }

    #[test]
    fn merged_map_is_key_ordered() {
        let map: ConcurrentMap<i32, i32> = ConcurrentMap::new(3);
        for key in [5, 1, 9, 3, 7] {
            *map.access(key) = key * 10;
        }
        let merged = map.build_ordinary_map();
        let keys: Vec<i32> = merged.keys().copied().collect();
        assert_eq!(keys, [1, 3, 5, 7, 9]);
        assert_eq!(merged[&9], 90);
    }

    #[test]
    fn concurrent_increments_lose_no_updates() {
        const THREADS: usize = 8;
        const INCREMENTS: usize = 1000;

        let map: ConcurrentMap<i32, usize> = ConcurrentMap::new(4);
        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for _ in 0..INCREMENTS {
                        *map.access(1) += 1;
                    }
                });
            }
        });
        assert_eq!(map.build_ordinary_map()[&1], THREADS * INCREMENTS);
    }

    #[test]
    fn concurrent_writers_on_distinct_keys() {
        const THREADS: i32 = 8;
        const INCREMENTS: usize = 500;

        let map: ConcurrentMap<i32, usize> = ConcurrentMap::new(4);
        let map = &map;
        std::thread::scope(|scope| {
            for key in 0..THREADS {
                scope.spawn(move || {
                    for _ in 0..INCREMENTS {
                        *map.access(key) += 1;
                    }
                });
            }
        });
        let merged = map.build_ordinary_map();
        assert_eq!(merged.len(), THREADS as usize);
        assert!(merged.values().all(|&count| count == INCREMENTS));
    }
}
