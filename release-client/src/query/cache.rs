//! Query results keyed by [`CacheKey`], plus the fetches currently running.

use crate::api::CacheKey;
use crate::error::TransportError;
use dashmap::DashMap;
use futures::future::{BoxFuture, Shared};
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A cached `Arc<Envelope<Res>>` with its type erased.
pub(crate) type Erased = Arc<dyn Any + Send + Sync>;
pub(crate) type FetchResult = Result<Erased, Arc<TransportError>>;
pub(crate) type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

#[derive(Default)]
struct Entry {
    data: Option<Erased>,
    /// Fetch that produced `data`.
    data_fetch: Option<u64>,
    updated_at: Option<Instant>,
    in_flight: Option<(u64, SharedFetch)>,
    invalidated: bool,
    /// Fetches numbered below this started before the last invalidation.
    invalidated_at: u64,
}

impl Entry {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated
            && self
                .updated_at
                .is_some_and(|at| at.elapsed() < stale_time)
    }
}

/// What a query finds when it looks itself up.
pub(crate) enum Lookup {
    Fresh(Erased),
    Joined(SharedFetch),
    Started(SharedFetch),
}

#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<CacheKey, Entry>,
    next_fetch: AtomicU64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh data, the fetch already running for `key`, or a new fetch.
    ///
    /// `start` runs while the entry is locked, so concurrent lookups of one
    /// key share a single fetch.
    pub(crate) fn lookup(
        &self,
        key: &CacheKey,
        stale_time: Duration,
        start: impl FnOnce(u64) -> SharedFetch,
    ) -> Lookup {
        let mut entry = self.entries.entry(key.clone()).or_default();

        if let Some((_, fetch)) = &entry.in_flight {
            return Lookup::Joined(fetch.clone());
        }
        if let Some(data) = entry.data.as_ref().filter(|_| entry.is_fresh(stale_time)) {
            return Lookup::Fresh(data.clone());
        }

        let id = self.next_fetch.fetch_add(1, Ordering::SeqCst);
        let fetch = start(id);
        entry.in_flight = Some((id, fetch.clone()));
        Lookup::Started(fetch)
    }

    /// Record the outcome of fetch `id`. Errors keep the previous data.
    ///
    /// A fetch that started before the last invalidation still delivers its
    /// data but leaves the entry stale.
    pub(crate) fn complete(&self, key: &CacheKey, id: u64, result: &FetchResult) {
        let mut entry = self.entries.entry(key.clone()).or_default();

        if entry.in_flight.as_ref().is_some_and(|(running, _)| *running == id) {
            entry.in_flight = None;
        }
        let Ok(data) = result else {
            return;
        };
        if entry.data_fetch.is_some_and(|newest| newest > id) {
            return;
        }

        entry.data = Some(data.clone());
        entry.data_fetch = Some(id);
        entry.updated_at = Some(Instant::now());
        entry.invalidated = id < entry.invalidated_at;
    }

    pub(crate) fn get(&self, key: &CacheKey) -> Option<Erased> {
        self.entries.get(key).and_then(|entry| entry.data.clone())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.data.is_some())
    }

    pub fn is_fetching(&self, key: &CacheKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

    /// Mark every entry under `prefix` stale and detach fetches already
    /// running for them, so the next lookup goes back to the network.
    /// Returns how many matched.
    pub fn invalidate(&self, prefix: &CacheKey) -> usize {
        let mut matched = 0;
        for mut entry in self.entries.iter_mut() {
            if entry.key().parts().starts_with(prefix.parts()) {
                entry.invalidated = true;
                entry.invalidated_at = self.next_fetch.load(Ordering::SeqCst);
                entry.in_flight = None;
                matched += 1;
            }
        }
        matched
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
    use crate::api::query_keys;
    use futures::FutureExt;
    use uuid::Uuid;

    fn ready(value: i32) -> SharedFetch {
        let erased: Erased = Arc::new(value);
        futures::future::ready(Ok(erased)).boxed().shared()
    }

    #[test]
    fn test_second_lookup_joins_running_fetch() {
        let cache = QueryCache::new();
        let key = query_keys::accounts_api_me();

        let first = cache.lookup(&key, Duration::ZERO, |_| ready(1));
        assert!(matches!(first, Lookup::Started(_)));

        let second = cache.lookup(&key, Duration::ZERO, |_| panic!("must not start twice"));
        assert!(matches!(second, Lookup::Joined(_)));
        assert!(cache.is_fetching(&key));
    }

    #[test]
    fn test_completed_data_is_fresh_until_invalidated() {
        let cache = QueryCache::new();
        let key = query_keys::releases_api_get_all_releases();
        let mut started = None;

        cache.lookup(&key, Duration::from_secs(60), |id| {
            started = Some(id);
            ready(1)
        });
        let data: Erased = Arc::new(41);
        cache.complete(&key, started.unwrap(), &Ok(data));
        assert!(!cache.is_fetching(&key));

        let hit = cache.lookup(&key, Duration::from_secs(60), |_| panic!("data is fresh"));
        match hit {
            Lookup::Fresh(data) => assert_eq!(data.downcast_ref::<i32>(), Some(&41)),
            _ => panic!("expected a cache hit"),
        }

        assert_eq!(cache.invalidate(&key), 1);
        let miss = cache.lookup(&key, Duration::from_secs(60), |_| ready(2));
        assert!(matches!(miss, Lookup::Started(_)));
    }

    #[test]
    fn test_zero_stale_time_always_refetches() {
        let cache = QueryCache::new();
        let key = query_keys::accounts_api_me();
        let data: Erased = Arc::new(1);
        cache.complete(&key, 0, &Ok(data));

        let lookup = cache.lookup(&key, Duration::ZERO, |_| ready(2));
        assert!(matches!(lookup, Lookup::Started(_)));
        assert!(cache.contains(&key));
    }

    #[test]
    fn test_fetch_started_before_invalidation_leaves_entry_stale() {
        let cache = QueryCache::new();
        let key = query_keys::releases_api_get_all_releases();
        let stale_time = Duration::from_secs(60);
        let mut started = None;

        cache.lookup(&key, stale_time, |id| {
            started = Some(id);
            ready(1)
        });
        cache.invalidate(&key);
        assert!(!cache.is_fetching(&key));

        let data: Erased = Arc::new(1);
        cache.complete(&key, started.unwrap(), &Ok(data));

        let next = cache.lookup(&key, stale_time, |_| ready(2));
        assert!(matches!(next, Lookup::Started(_)));
        assert_eq!(cache.get(&key).unwrap().downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn test_older_fetch_does_not_overwrite_newer_data() {
        let cache = QueryCache::new();
        let key = query_keys::accounts_api_me();
        let newer: Erased = Arc::new(2);
        let older: Erased = Arc::new(1);

        cache.complete(&key, 5, &Ok(newer));
        cache.complete(&key, 3, &Ok(older));

        assert_eq!(cache.get(&key).unwrap().downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn test_failed_fetch_releases_in_flight_slot() {
        let cache = QueryCache::new();
        let key = query_keys::accounts_api_me();
        let mut started = None;
        cache.lookup(&key, Duration::ZERO, |id| {
            started = Some(id);
            ready(1)
        });

        let error = Arc::new(TransportError::Aborted {
            operation: "accountsApiMe",
        });
        cache.complete(&key, started.unwrap(), &Err(error));

        assert!(!cache.is_fetching(&key));
        assert!(matches!(
            cache.lookup(&key, Duration::ZERO, |_| ready(2)),
            Lookup::Started(_)
        ));
    }

    #[test]
    fn test_invalidate_matches_by_prefix() {
        let cache = QueryCache::new();
        let first = query_keys::releases_api_get_release_with_uuid(Uuid::new_v4());
        let second = query_keys::releases_api_get_release_with_uuid(Uuid::new_v4());
        let other = query_keys::accounts_api_me();
        for key in [&first, &second, &other] {
            let data: Erased = Arc::new(0);
            cache.complete(key, 0, &Ok(data));
        }

        assert_eq!(cache.invalidate(&CacheKey::new("releasesApiGetReleaseWithUuid")), 2);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_data() {
        let cache = QueryCache::new();
        let key = query_keys::accounts_api_me();
        let data: Erased = Arc::new(5);
        cache.complete(&key, 0, &Ok(data));

        let error = Arc::new(TransportError::Timeout {
            operation: "accountsApiMe",
        });
        cache.complete(&key, 1, &Err(error));

        let kept = cache.get(&key).unwrap();
        assert_eq!(kept.downcast_ref::<i32>(), Some(&5));
    }
}
