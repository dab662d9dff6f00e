//! Keyed Cache Store
//!
//! One entry per query key. An entry is stale when it has no data or was
//! invalidated since its last successful fetch.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{abortable, AbortHandle, Aborted};

/// Change callback, invoked with the key that changed
pub type Listener<K> = Arc<dyn Fn(&K) + Send + Sync>;

/// Outcome of a completed [`QueryCache::fetch`]
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<V> {
    /// The request finished and its value is now cached
    Fresh(V),
    /// The request was cancelled or superseded before it finished
    Cancelled,
}

impl<V> Fetched<V> {
    pub fn into_option(self) -> Option<V> {
        match self {
            Fetched::Fresh(value) => Some(value),
            Fetched::Cancelled => None,
        }
    }
}

struct Entry<V> {
    data: Option<V>,
    stale: bool,
    /// Bumped on every invalidation
    generation: u64,
    in_flight: Option<(u64, AbortHandle)>,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            data: None,
            stale: true,
            generation: 0,
            in_flight: None,
        }
    }
}

struct Inner<K, V> {
    entries: HashMap<K, Entry<V>>,
    listeners: Vec<Listener<K>>,
    next_fetch_id: u64,
}

/// Shared keyed cache. Clones share the same storage.
pub struct QueryCache<K, V> {
    inner: Arc<Mutex<Inner<K, V>>>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                listeners: Vec::new(),
                next_fetch_id: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Call every listener for each key. Must not be called with the lock held.
    fn notify(&self, keys: &[K]) {
        let listeners = self.lock().listeners.clone();
        for key in keys {
            for listener in &listeners {
                listener(key);
            }
        }
    }

    /// Register a callback fired whenever an entry's data or staleness changes
    pub fn subscribe(&self, listener: impl Fn(&K) + Send + Sync + 'static) {
        self.lock().listeners.push(Arc::new(listener));
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().entries.get(key).and_then(|entry| entry.data.clone())
    }

    pub fn keys(&self) -> Vec<K> {
        self.lock().entries.keys().cloned().collect()
    }

    /// Publish a value for `key` and mark it fresh
    pub fn set(&self, key: K, value: V) {
        {
            let mut inner = self.lock();
            let entry = inner.entries.entry(key.clone()).or_default();
            entry.data = Some(value);
            entry.stale = false;
        }
        self.notify(&[key]);
    }

    /// Put back a previously captured value. `None` drops the entry entirely.
    pub fn restore(&self, key: K, value: Option<V>) {
        match value {
            Some(value) => self.set(key, value),
            None => {
                if let Some(entry) = self.lock().entries.remove(&key) {
                    if let Some((_, handle)) = entry.in_flight {
                        handle.abort();
                    }
                }
                self.notify(&[key]);
            }
        }
    }

    /// Missing entries count as stale
    pub fn is_stale(&self, key: &K) -> bool {
        self.lock()
            .entries
            .get(key)
            .map_or(true, |entry| entry.stale || entry.data.is_none())
    }

    pub fn is_fetching(&self, key: &K) -> bool {
        self.lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

    /// Stale and nobody is already fetching it
    pub fn needs_fetch(&self, key: &K) -> bool {
        self.is_stale(key) && !self.is_fetching(key)
    }

    pub fn invalidate(&self, key: &K) {
        let changed = {
            let mut inner = self.lock();
            match inner.entries.get_mut(key) {
                Some(entry) => {
                    entry.stale = true;
                    entry.generation += 1;
                    true
                }
                None => false,
            }
        };
        if changed {
            self.notify(std::slice::from_ref(key));
        }
    }

    /// Mark every entry stale
    pub fn invalidate_all(&self) {
        let keys = {
            let mut inner = self.lock();
            for entry in inner.entries.values_mut() {
                entry.stale = true;
                entry.generation += 1;
            }
            inner.entries.keys().cloned().collect::<Vec<_>>()
        };
        self.notify(&keys);
    }

    /// Abort the in-flight fetch for `key`, if any
    pub fn cancel(&self, key: &K) {
        if let Some(entry) = self.lock().entries.get_mut(key) {
            if let Some((_, handle)) = entry.in_flight.take() {
                handle.abort();
            }
        }
    }

    pub fn cancel_all(&self) {
        let mut inner = self.lock();
        for entry in inner.entries.values_mut() {
            if let Some((_, handle)) = entry.in_flight.take() {
                handle.abort();
            }
        }
    }

    /// Drop every entry, aborting in-flight fetches
    pub fn clear(&self) {
        let keys = {
            let mut inner = self.lock();
            for entry in inner.entries.values_mut() {
                if let Some((_, handle)) = entry.in_flight.take() {
                    handle.abort();
                }
            }
            inner.entries.drain().map(|(key, _)| key).collect::<Vec<_>>()
        };
        self.notify(&keys);
    }

    /// Run `request` as the in-flight fetch for `key` and cache its value.
    ///
    /// A previous in-flight fetch for the same key is aborted. If the key is
    /// invalidated while the request runs, the value is stored but stays
    /// stale. Errors leave the cached data untouched.
    pub async fn fetch<E, F>(&self, key: K, request: F) -> Result<Fetched<V>, E>
    where
        F: Future<Output = Result<V, E>>,
    {
        let (request, handle) = abortable(request);
        let (fetch_id, generation) = {
            let mut inner = self.lock();
            inner.next_fetch_id += 1;
            let fetch_id = inner.next_fetch_id;
            let entry = inner.entries.entry(key.clone()).or_default();
            if let Some((_, previous)) = entry.in_flight.replace((fetch_id, handle)) {
                previous.abort();
            }
            (fetch_id, entry.generation)
        };

        let outcome = match request.await {
            Ok(outcome) => outcome,
            Err(Aborted) => {
                log::debug!("query fetch #{} aborted", fetch_id);
                return Ok(Fetched::Cancelled);
            }
        };

        let current = {
            let mut inner = self.lock();
            match inner.entries.get_mut(&key) {
                Some(entry) if entry.in_flight.as_ref().map(|(id, _)| *id) == Some(fetch_id) => {
                    entry.in_flight = None;
                    if let Ok(value) = &outcome {
                        entry.data = Some(value.clone());
                        entry.stale = entry.generation != generation;
                    }
                    true
                }
                _ => false,
            }
        };
        if !current {
            log::debug!("query fetch #{} superseded, dropping result", fetch_id);
            return Ok(Fetched::Cancelled);
        }

        let value = outcome?;
        self.notify(std::slice::from_ref(&key));
        Ok(Fetched::Fresh(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::future::join;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Cache = QueryCache<&'static str, Vec<u32>>;

    async fn ok(value: Vec<u32>) -> Result<Vec<u32>, String> {
        Ok(value)
    }

    #[tokio::test]
    async fn test_fetch_stores_fresh_value() {
        let cache = Cache::new();
        assert!(cache.needs_fetch(&"tasks"));

        let fetched = cache.fetch("tasks", ok(vec![1, 2])).await.unwrap();

        assert_eq!(fetched, Fetched::Fresh(vec![1, 2]));
        assert_eq!(cache.get(&"tasks"), Some(vec![1, 2]));
        assert!(!cache.is_stale(&"tasks"));
        assert!(!cache.is_fetching(&"tasks"));
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_previous_data() {
        let cache = Cache::new();
        cache.set("tasks", vec![7]);
        cache.invalidate(&"tasks");

        let result = cache
            .fetch("tasks", async { Err::<Vec<u32>, _>("offline".to_string()) })
            .await;

        assert_eq!(result, Err("offline".to_string()));
        assert_eq!(cache.get(&"tasks"), Some(vec![7]));
        assert!(cache.is_stale(&"tasks"));
        assert!(!cache.is_fetching(&"tasks"));
    }

    #[test]
    fn test_invalidate_all_marks_every_key_stale() {
        let cache = Cache::new();
        cache.set("a", vec![1]);
        cache.set("b", vec![2]);

        cache.invalidate_all();

        assert!(cache.is_stale(&"a"));
        assert!(cache.is_stale(&"b"));
        // Data stays visible until the refetch lands
        assert_eq!(cache.get(&"a"), Some(vec![1]));
    }

    #[tokio::test]
    async fn test_invalidate_during_fetch_keeps_result_stale() {
        let cache = Cache::new();
        let (tx, rx) = oneshot::channel();

        let fetch = cache.fetch("tasks", async move { rx.await.map_err(|e| e.to_string()) });
        let interrupt = async {
            cache.set("tasks", vec![0]);
            cache.invalidate(&"tasks");
            tx.send(vec![1]).unwrap();
        };
        let (fetched, _) = join(fetch, interrupt).await;

        assert_eq!(fetched.unwrap(), Fetched::Fresh(vec![1]));
        assert_eq!(cache.get(&"tasks"), Some(vec![1]));
        assert!(cache.is_stale(&"tasks"));
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_fetch() {
        let cache = Cache::new();
        let (tx, rx) = oneshot::channel::<Vec<u32>>();

        let fetch = cache.fetch("tasks", async move { rx.await.map_err(|e| e.to_string()) });
        let interrupt = async {
            assert!(cache.is_fetching(&"tasks"));
            cache.cancel(&"tasks");
            let _ = tx.send(vec![9]);
        };
        let (fetched, _) = join(fetch, interrupt).await;

        assert_eq!(fetched.unwrap(), Fetched::Cancelled);
        assert_eq!(cache.get(&"tasks"), None);
        assert!(!cache.is_fetching(&"tasks"));
    }

    #[tokio::test]
    async fn test_second_fetch_supersedes_first() {
        let cache = Cache::new();
        let (tx, rx) = oneshot::channel::<Vec<u32>>();

        let first = cache.fetch("tasks", async move { rx.await.map_err(|e| e.to_string()) });
        let second = async {
            let fetched = cache.fetch("tasks", ok(vec![2])).await;
            let _ = tx.send(vec![1]);
            fetched
        };
        let (first, second) = join(first, second).await;

        assert_eq!(first.unwrap(), Fetched::Cancelled);
        assert_eq!(second.unwrap(), Fetched::Fresh(vec![2]));
        assert_eq!(cache.get(&"tasks"), Some(vec![2]));
    }

    #[test]
    fn test_listeners_run_outside_lock() {
        let cache = Cache::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let reader = cache.clone();
        let counter = Arc::clone(&seen);
        cache.subscribe(move |key| {
            // Reading back from the cache inside a listener must not deadlock
            let len = reader.get(key).map_or(0, |v| v.len());
            counter.fetch_add(len, Ordering::SeqCst);
        });

        cache.set("tasks", vec![1, 2, 3]);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_restore_none_drops_entry() {
        let cache = Cache::new();
        cache.set("tasks", vec![1]);

        cache.restore("tasks", None);

        assert_eq!(cache.get(&"tasks"), None);
        assert!(cache.keys().is_empty());
        assert!(cache.needs_fetch(&"tasks"));
    }

    #[test]
    fn test_clear_notifies_removed_keys() {
        let cache = Cache::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        cache.set("a", vec![1]);
        cache.set("b", vec![2]);
        cache.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cache.clear();

        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert!(cache.keys().is_empty());
    }
}
