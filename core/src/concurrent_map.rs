//! Lock-striped map keyed by integers.
//!
//! Keys are spread over a fixed number of shards by `key mod shard_count`, each
//! shard behind its own [`parking_lot::Mutex`]. Writers on keys from different
//! shards never wait on each other; writers on the same shard serialize. Every
//! operation holds at most one shard lock, except [`ConcurrentMap::consistent_snapshot`],
//! which takes all of them in ascending shard order.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// Integer keys that can be routed to a shard.
///
/// Keys are expected to be non-negative; a negative key still lands on a valid
/// shard through euclidean remainder.
pub trait ShardKey: Copy + Ord {
    fn shard_index(self, shard_count: usize) -> usize;
}

macro_rules! impl_shard_key {
    ($($ty:ty),*) => {
        $(
            impl ShardKey for $ty {
                #[inline]
                fn shard_index(self, shard_count: usize) -> usize {
                    (self as i128).rem_euclid(shard_count as i128) as usize
                }
            }
        )*
    };
}

impl_shard_key!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// Exclusive handle to one value. The shard stays locked until it is dropped.
pub struct Access<'a, V> {
    guard: MappedMutexGuard<'a, V>,
}

impl<V> Deref for Access<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.guard
    }
}

impl<V> DerefMut for Access<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut self.guard
    }
}

pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: ShardKey, V> ConcurrentMap<K, V> {
    /// # Panics
    /// Panics if `shard_count` is zero.
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "ConcurrentMap needs at least one shard");
        let shards = (0..shard_count).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    fn shard(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        &self.shards[key.shard_index(self.shards.len())]
    }

    /// Lock the key's shard and return its value, inserting `V::default()` first
    /// if the key is new.
    pub fn access(&self, key: K) -> Access<'_, V>
    where
        V: Default,
    {
        let guard = MutexGuard::map(self.shard(key).lock(), |shard| shard.entry(key).or_default());
        Access { guard }
    }

    pub fn erase(&self, key: K) -> Option<V> {
        self.shard(key).lock().remove(&key)
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.shard(key).lock().contains_key(&key)
    }

    /// Total number of keys. Shards are visited one at a time, so concurrent
    /// writers may make this stale.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Merge all shards into one ordered map, locking each shard in turn.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut result = BTreeMap::new();
        for shard in &self.shards {
            let shard = shard.lock();
            result.extend(shard.iter().map(|(key, value)| (*key, value.clone())));
        }
        result
    }

    /// Point-in-time copy: every shard is locked, in ascending order, before
    /// anything is read.
    pub fn consistent_snapshot(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let guards: Vec<_> = self.shards.iter().map(|shard| shard.lock()).collect();
        let snapshot = guards
            .iter()
            .flat_map(|shard| shard.iter().map(|(key, value)| (*key, value.clone())))
            .collect();
        snapshot
    }

    /// Consume the map without taking any lock.
    pub fn into_ordinary_map(self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for shard in self.shards {
            result.extend(shard.into_inner());
        }
        result
    }
}
