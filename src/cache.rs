//! Explicit memoization for the expensive read stages
//!
//! The full-table fetch and the per-MSA projected read are each computed
//! once per key for the lifetime of the process (or until an explicit
//! invalidation). The cache is an injectable value owned by the caller, not
//! hidden module-level state.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use crate::error::Result;

pub struct MemoCache<K, V> {
    entries: Mutex<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone, V> MemoCache<K, V> {
    /// Seed an entry directly, replacing any cached value for the key.
    pub fn insert(&self, key: K, value: V) {
        self.entries.lock().unwrap().insert(key, Arc::new(value));
    }

    /// Return the cached value for `key`, computing and storing it on a
    /// miss. The compute runs outside the lock: two callers racing on the
    /// same key may both compute, and the first insert wins — safe because
    /// every cached computation here is pure.
    pub fn get_or_compute<F>(&self, key: &K, compute: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(hit) = self.entries.lock().unwrap().get(key) {
            return Ok(Arc::clone(hit));
        }

        let value = Arc::new(compute()?);
        let mut entries = self.entries.lock().unwrap();
        Ok(Arc::clone(entries.entry(key.clone()).or_insert(value)))
    }

    /// Drop every entry. Process restart is the other eviction policy.
    pub fn invalidate(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
