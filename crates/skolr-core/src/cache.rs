// ── TTL cache ──
//
// String-keyed value store with per-entry expiry. Expiry is enforced
// lazily on every read (an expired entry is never observable) and
// proactively by an optional background sweeper. Each key carries a
// `watch` channel so consumers can react to inserts, removals, and
// expiries without polling.
//
// The cache is unbounded: entries leave only by TTL, `remove`, or
// `clear`. Suitable for modest working sets of server-fetched data.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

// Suggested lifetimes for server-fetched data, by volatility.
/// Data that changes often (grades, dashboards).
pub const TTL_VOLATILE: Duration = Duration::from_secs(2 * 60);
/// The default for listings (students, classes).
pub const TTL_DEFAULT: Duration = Duration::from_secs(5 * 60);
/// Near-static reference data (subjects).
pub const TTL_STABLE: Duration = Duration::from_secs(15 * 60);

struct Entry<V> {
    value: V,
    // `None` means the entry never expires.
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Thread-safe cache with per-entry time-to-live and per-key
/// subscriptions.
///
/// Values must be `Clone`; reads hand out copies, never references into
/// the map.
pub struct TtlCache<V> {
    entries: DashMap<String, Entry<V>>,
    // Kept separate from `entries` so a subscription outlives the entry
    // it watches (and can exist before the first insert).
    channels: DashMap<String, watch::Sender<Option<V>>>,
    default_ttl: Duration,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            channels: DashMap::new(),
            default_ttl,
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Insert or replace `key` with the cache's default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Insert or replace `key` with an explicit TTL. A zero TTL means the
    /// entry never expires (it leaves only via `remove` or `clear`).
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        trace!(%key, ttl_secs = ttl.as_secs(), "cache set");
        let expires_at = (!ttl.is_zero()).then(|| Instant::now() + ttl);
        self.entries.insert(
            key.clone(),
            Entry {
                value: value.clone(),
                expires_at,
            },
        );
        self.notify(&key, Some(value));
    }

    /// Remove `key`. Subscribers observe `None`.
    pub fn remove(&self, key: &str) -> Option<V> {
        let removed = self.entries.remove(key).map(|(_, e)| e.value);
        if removed.is_some() {
            self.notify(key, None);
        }
        removed
    }

    /// Drop every entry. Subscribers on live keys observe `None`.
    pub fn clear(&self) {
        let keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        self.entries.clear();
        for key in keys {
            self.notify(&key, None);
        }
        debug!("cache cleared");
    }

    // ── Reads (lazy eviction) ────────────────────────────────────────

    /// The live value for `key`. An expired entry is evicted here and
    /// reads as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        if self.evict_if_expired(key) {
            return None;
        }
        self.entries.get(key).map(|e| e.value.clone())
    }

    /// Whether `key` holds a live value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All keys with live values.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|e| !e.value().is_expired(now))
            .map(|e| e.key().clone())
            .collect()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|e| !e.value().is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Subscribe to `key`. The receiver's current value is the live
    /// value at subscription time; every subsequent insert, removal, or
    /// expiry of the key is pushed as `Some(v)` / `None`.
    pub fn watch(&self, key: &str) -> watch::Receiver<Option<V>> {
        let current = self.get(key);
        self.channels
            .entry(key.to_owned())
            .or_insert_with(|| watch::channel(current).0)
            .subscribe()
    }

    fn notify(&self, key: &str, value: Option<V>) {
        if let Some(tx) = self.channels.get(key) {
            let _ = tx.send(value);
        }
    }

    // ── Sweeping ─────────────────────────────────────────────────────

    /// Evict every expired entry now, notifying subscribers. Returns the
    /// number evicted.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().is_expired(now))
            .map(|e| e.key().clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.notify(key, None);
        }
        // Channels nobody listens to and nothing backs can go too.
        self.channels
            .retain(|key, tx| tx.receiver_count() > 0 || self.entries.contains_key(key));

        if !expired.is_empty() {
            debug!(count = expired.len(), "cache sweep evicted entries");
        }
        expired.len()
    }

    fn evict_if_expired(&self, key: &str) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|e| e.is_expired(Instant::now()));
        if expired {
            trace!(%key, "evicting expired entry");
            self.entries.remove(key);
            self.notify(key, None);
        }
        expired
    }
}

/// Run [`TtlCache::sweep`] every `interval` until `cancel` fires.
pub fn spawn_sweeper<V: Clone + Send + Sync + 'static>(
    cache: Arc<TtlCache<V>>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; skip it.
        ticker.tick().await;
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("cache sweeper stopped");
                    return;
                }
                _ = ticker.tick() => {
                    cache.sweep();
                }
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_never_observable() {
        let cache: TtlCache<i32> = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1);
        assert_eq!(cache.get("a"), Some(1));
        assert!(cache.has("a"));

        tokio::time::advance(Duration::from_secs(61)).await;

        assert_eq!(cache.get("a"), None);
        assert!(!cache.has("a"));
        assert!(cache.keys().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn per_entry_ttl_overrides_the_default() {
        let cache: TtlCache<i32> = TtlCache::new(Duration::from_secs(60));
        cache.set_with_ttl("short", 1, Duration::from_secs(5));
        cache.set("long", 2);

        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.get("long"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_means_never_expires() {
        let cache: TtlCache<i32> = TtlCache::new(Duration::from_secs(10));
        cache.set_with_ttl("pinned", 7, Duration::ZERO);
        assert_eq!(cache.get("pinned"), Some(7));

        tokio::time::advance(Duration::from_secs(86_400)).await;

        assert_eq!(cache.get("pinned"), Some(7));
        assert_eq!(cache.sweep(), 0);
        assert_eq!(cache.remove("pinned"), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn set_replaces_and_restarts_the_clock() {
        let cache: TtlCache<i32> = TtlCache::new(Duration::from_secs(10));
        cache.set("a", 1);
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("a", 2);
        tokio::time::advance(Duration::from_secs(8)).await;

        // 16s after the first insert but only 8s after the replace.
        assert_eq!(cache.get("a"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn watch_sees_inserts_removals_and_expiry() {
        let cache: TtlCache<i32> = TtlCache::new(Duration::from_secs(10));
        let mut rx = cache.watch("a");
        assert_eq!(*rx.borrow(), None);

        cache.set("a", 1);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(1));

        cache.remove("a");
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), None);

        // Expiry via lazy eviction notifies too.
        cache.set("a", 2);
        rx.changed().await.unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(cache.get("a"), None);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_subscribed_before_first_insert_still_fires() {
        let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(10));
        let mut rx = cache.watch("students");
        cache.set("students", "list".to_owned());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_deref(), Some("list"));
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_and_counts() {
        let cache: TtlCache<i32> = TtlCache::new(Duration::from_secs(10));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set_with_ttl("c", 3, Duration::from_secs(60));

        tokio::time::advance(Duration::from_secs(11)).await;

        assert_eq!(cache.sweep(), 2);
        assert_eq!(cache.keys(), vec!["c".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_task_evicts_in_the_background_and_stops_on_cancel() {
        let cache = Arc::new(TtlCache::<i32>::new(Duration::from_secs(10)));
        cache.set("a", 1);
        let mut rx = cache.watch("a");
        rx.mark_unchanged();

        let cancel = CancellationToken::new();
        let handle = spawn_sweeper(Arc::clone(&cache), Duration::from_secs(30), cancel.clone());

        // Entry expires at t+10; the sweeper's first real tick lands at
        // t+30 and must push the removal without any read happening.
        tokio::time::advance(Duration::from_secs(31)).await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), None);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn clear_notifies_every_live_key() {
        let cache: TtlCache<i32> = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        let mut rx_a = cache.watch("a");
        let mut rx_b = cache.watch("b");
        rx_a.mark_unchanged();
        rx_b.mark_unchanged();

        cache.clear();

        rx_a.changed().await.unwrap();
        rx_b.changed().await.unwrap();
        assert_eq!(*rx_a.borrow(), None);
        assert_eq!(*rx_b.borrow(), None);
        assert!(cache.is_empty());
    }
}
