//! Optimistic Updates
//!
//! Snapshot, speculatively apply, then confirm or restore.

use std::future::Future;
use std::hash::Hash;

use crate::cache::QueryCache;

/// An optimistic patch that has been published but not yet confirmed.
///
/// Each instance owns the snapshot taken when it was applied. Rolling back
/// restores that snapshot even if other mutations landed in between.
#[must_use = "an optimistic update must be confirmed or rolled back"]
pub struct Optimistic<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    cache: QueryCache<K, V>,
    key: K,
    snapshot: Option<V>,
    /// The snapshot was already out of date or being refetched
    reload: bool,
}

impl<K, V> Optimistic<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Cancel in-flight refetches, snapshot `key`, and publish `patch` of it.
    ///
    /// Nothing is published when the key holds no data yet.
    pub fn apply(cache: &QueryCache<K, V>, key: K, patch: impl FnOnce(&V) -> V) -> Self {
        let reload = cache.is_stale(&key) || cache.is_fetching(&key);
        cache.cancel_all();
        let snapshot = cache.get(&key);
        if let Some(current) = &snapshot {
            cache.set(key.clone(), patch(current));
        }
        Self {
            cache: cache.clone(),
            key,
            snapshot,
            reload,
        }
    }

    pub fn snapshot(&self) -> Option<&V> {
        self.snapshot.as_ref()
    }

    /// Server accepted the change: mark the whole collection stale
    pub fn confirm(self) {
        self.cache.invalidate_all();
    }

    /// Server rejected the change: put the snapshot back verbatim.
    ///
    /// A snapshot that was stale, or whose refetch `apply` cancelled, is
    /// marked stale again so the next read reloads it.
    pub fn rollback(self) {
        log::warn!("rolling back optimistic update");
        let reload = self.reload && self.snapshot.is_some();
        self.cache.restore(self.key.clone(), self.snapshot);
        if reload {
            self.cache.invalidate(&self.key);
        }
    }

    /// Await `request`, then confirm on success or roll back on failure
    pub async fn settle<T, E, F>(self, request: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        match request.await {
            Ok(value) => {
                self.confirm();
                Ok(value)
            }
            Err(err) => {
                self.rollback();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fetched;
    use futures::channel::oneshot;
    use futures::future::join;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        done: bool,
    }

    fn rows() -> Vec<Row> {
        vec![Row { id: 1, done: false }, Row { id: 2, done: false }]
    }

    fn mark_done(id: u32) -> impl FnOnce(&Vec<Row>) -> Vec<Row> {
        move |rows| {
            rows.iter()
                .map(|r| if r.id == id { Row { done: true, ..r.clone() } } else { r.clone() })
                .collect()
        }
    }

    #[test]
    fn test_apply_publishes_patch_immediately() {
        let cache = QueryCache::new();
        cache.set("visible", rows());

        let update = Optimistic::apply(&cache, "visible", mark_done(1));

        assert_eq!(update.snapshot(), Some(&rows()));
        assert!(cache.get(&"visible").unwrap()[0].done);
        update.confirm();
    }

    #[tokio::test]
    async fn test_failure_restores_snapshot_exactly() {
        let cache = QueryCache::new();
        cache.set("visible", rows());

        let update = Optimistic::apply(&cache, "visible", mark_done(2));
        let result: Result<(), &str> = update.settle(async { Err("500") }).await;

        assert_eq!(result, Err("500"));
        assert_eq!(cache.get(&"visible"), Some(rows()));
    }

    #[tokio::test]
    async fn test_success_marks_collection_stale() {
        let cache = QueryCache::new();
        cache.set("visible", rows());
        cache.set("other-filter", rows());

        let update = Optimistic::apply(&cache, "visible", mark_done(1));
        let result: Result<u32, ()> = update.settle(async { Ok(1) }).await;

        assert_eq!(result, Ok(1));
        assert!(cache.is_stale(&"visible"));
        assert!(cache.is_stale(&"other-filter"));
        // Optimistic value stays visible until the refetch replaces it
        assert!(cache.get(&"visible").unwrap()[0].done);
    }

    #[tokio::test]
    async fn test_apply_cancels_in_flight_refetch() {
        let cache = QueryCache::new();
        cache.set("visible", rows());
        cache.invalidate(&"visible");
        let (tx, rx) = oneshot::channel::<Vec<Row>>();

        let refetch = cache.fetch("visible", async move { rx.await.map_err(|_| ()) });
        let mutate = async {
            let update = Optimistic::apply(&cache, "visible", mark_done(1));
            // The old server state arrives after the patch and must not clobber it
            let _ = tx.send(rows());
            update
        };
        let (fetched, update) = join(refetch, mutate).await;

        assert_eq!(fetched, Ok(Fetched::Cancelled));
        assert!(cache.get(&"visible").unwrap()[0].done);
        update.confirm();
    }

    #[tokio::test]
    async fn test_rollback_reloads_cancelled_refetch() {
        let cache = QueryCache::new();
        cache.set("visible", rows());
        cache.invalidate(&"visible");
        let (tx, rx) = oneshot::channel::<Vec<Row>>();

        let refetch = cache.fetch("visible", async move { rx.await.map_err(|_| ()) });
        let mutate = async {
            let update = Optimistic::apply(&cache, "visible", mark_done(1));
            let result: Result<(), &str> = update.settle(async { Err("500") }).await;
            let _ = tx.send(vec![Row { id: 3, done: false }]);
            result
        };
        let (fetched, result) = join(refetch, mutate).await;

        assert_eq!(fetched, Ok(Fetched::Cancelled));
        assert_eq!(result, Err("500"));
        assert_eq!(cache.get(&"visible"), Some(rows()));
        assert!(cache.is_stale(&"visible"));
        assert!(cache.needs_fetch(&"visible"));
    }

    #[tokio::test]
    async fn test_rollback_of_fresh_snapshot_stays_fresh() {
        let cache = QueryCache::new();
        cache.set("visible", rows());

        let update = Optimistic::apply(&cache, "visible", mark_done(1));
        let _: Result<(), &str> = update.settle(async { Err("500") }).await;

        assert!(!cache.is_stale(&"visible"));
    }

    #[test]
    fn test_rollback_without_snapshot_leaves_no_entry() {
        let cache: QueryCache<&str, Vec<Row>> = QueryCache::new();

        let update = Optimistic::apply(&cache, "visible", mark_done(1));
        assert!(update.snapshot().is_none());
        update.rollback();

        assert_eq!(cache.get(&"visible"), None);
    }

    #[test]
    fn test_each_update_rolls_back_to_its_own_snapshot() {
        let cache = QueryCache::new();
        cache.set("visible", rows());

        let first = Optimistic::apply(&cache, "visible", mark_done(1));
        let second = Optimistic::apply(&cache, "visible", mark_done(2));
        assert_eq!(second.snapshot().unwrap()[0].done, true);

        // First succeeds, second fails: the second snapshot already held the
        // first patch, so it survives the rollback.
        first.confirm();
        second.rollback();

        let visible = cache.get(&"visible").unwrap();
        assert!(visible[0].done);
        assert!(!visible[1].done);
    }
}
