// ── Generic reactive entity collection ──
//
// Lock-free concurrent storage keyed by string, with push-based change
// notification via `watch` channels.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

/// A reactive collection for a single entity type.
///
/// `DashMap` gives O(1) concurrent lookups; every mutation bumps a
/// version counter and rebuilds the snapshot that subscribers receive.
/// Snapshots are sorted by key so the UI renders a stable order.
pub(crate) struct Collection<T: Clone + Send + Sync + 'static> {
    by_key: DashMap<String, Arc<T>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for cheap subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> Collection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_key: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Insert or update an entity. Returns `true` if the key was new.
    pub(crate) fn upsert(&self, key: String, entity: T) -> bool {
        let is_new = self.by_key.insert(key, Arc::new(entity)).is_none();
        self.rebuild_snapshot();
        self.bump_version();
        is_new
    }

    /// Replace the whole collection with a fresh authoritative listing:
    /// upsert everything present, then prune keys the listing no longer
    /// contains. One snapshot rebuild at the end.
    pub(crate) fn replace_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, T)>,
    {
        let mut seen = std::collections::HashSet::new();
        for (key, entity) in entries {
            self.by_key.insert(key.clone(), Arc::new(entity));
            seen.insert(key);
        }
        self.by_key.retain(|key, _| seen.contains(key));

        self.rebuild_snapshot();
        self.bump_version();
    }

    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Current snapshot (cheap `Arc` clone), sorted by key.
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn rebuild_snapshot(&self) {
        let mut entries: Vec<(String, Arc<T>)> = self
            .by_key
            .iter()
            .map(|r| (r.key().clone(), Arc::clone(r.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let values: Vec<Arc<T>> = entries.into_iter().map(|(_, v)| v).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upsert_returns_true_for_new_key() {
        let col: Collection<String> = Collection::new();
        assert!(col.upsert("key1".into(), "hello".into()));
        assert!(!col.upsert("key1".into(), "world".into()));
    }

    #[test]
    fn replace_all_prunes_missing_keys() {
        let col: Collection<u32> = Collection::new();
        col.upsert("a".into(), 1);
        col.upsert("b".into(), 2);

        col.replace_all(vec![("b".into(), 20), ("c".into(), 30)]);

        assert!(col.get("a").is_none());
        assert_eq!(*col.get("b").unwrap(), 20);
        assert_eq!(*col.get("c").unwrap(), 30);
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn snapshot_is_sorted_by_key() {
        let col: Collection<u32> = Collection::new();
        col.upsert("zeta".into(), 1);
        col.upsert("alpha".into(), 2);
        col.upsert("mid".into(), 3);

        let snap = col.snapshot();
        let values: Vec<u32> = snap.iter().map(|v| **v).collect();
        assert_eq!(values, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn subscribers_see_mutations() {
        let col: Collection<u32> = Collection::new();
        let mut rx = col.subscribe();

        col.upsert("a".into(), 7);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
