//! Cached, coalesced reads.

use super::QueryClient;
use super::cache::{Erased, FetchResult, Lookup, QueryCache, SharedFetch};
use super::options::AppOptions;
use super::outcome;
use crate::api::{CacheKey, Endpoint, KeyParams};
use crate::error::TransportError;
use crate::models::Envelope;
use futures::FutureExt;
use release_core::retry::{RetryConfig, retry_call};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Interval, MissedTickBehavior};

pub type QueryResult<T> = Result<Arc<Envelope<T>>, Arc<TransportError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    /// First fetch, nothing to show yet.
    Loading,
    Success,
    Error,
    /// Background refresh while earlier data is shown.
    Refetching,
}

/// Events that make mounted queries refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefetchTrigger {
    /// The window regained focus.
    Focus,
    /// The network came back.
    Reconnect,
    /// Cached entries under this key were invalidated.
    Invalidated(CacheKey),
}

pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<Envelope<T>>>,
    pub error: Option<Arc<TransportError>>,
    /// Message for the last soft failure.
    pub failure_message: Option<String>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            failure_message: None,
        }
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            failure_message: self.failure_message.clone(),
        }
    }
}

/// A read bound to one endpoint and one set of parameters.
///
/// Clones share state; the cache entry is shared with every other query
/// on the same key.
pub struct Query<Req, Res> {
    client: QueryClient,
    endpoint: Endpoint<Req, Res>,
    params: Req,
    key: CacheKey,
    options: Arc<AppOptions<Res>>,
    state: Arc<RwLock<QueryState<Res>>>,
}

impl<Req: Clone, Res> Clone for Query<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: self.endpoint,
            params: self.params.clone(),
            key: self.key.clone(),
            options: self.options.clone(),
            state: self.state.clone(),
        }
    }
}

impl<Req, Res> Query<Req, Res>
where
    Req: Serialize + KeyParams + Clone + Send + Sync + 'static,
    Res: DeserializeOwned + Send + Sync + 'static,
{
    pub(crate) fn new(
        client: QueryClient,
        endpoint: Endpoint<Req, Res>,
        params: Req,
        options: AppOptions<Res>,
    ) -> Self {
        let key = endpoint.key(&params);
        Self {
            client,
            endpoint,
            params,
            key,
            options: Arc::new(options),
            state: Arc::new(RwLock::new(QueryState::default())),
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Fresh cached data, or the result of a (possibly shared) network call.
    pub async fn fetch(&self) -> QueryResult<Res> {
        self.fetch_within(self.options.stale_time()).await
    }

    /// Fetch regardless of staleness. Joins a call already running.
    pub async fn refetch(&self) -> QueryResult<Res> {
        self.fetch_within(Duration::ZERO).await
    }

    /// Show cached data right away and refresh it in the background when
    /// stale. Fetches in the foreground when nothing is cached.
    pub async fn load(&self) -> QueryResult<Res> {
        let Some(cached) = self.client.cached(&self.endpoint, &self.params) else {
            return self.fetch().await;
        };

        self.update(|state| {
            state.data = Some(cached.clone());
            if state.status == QueryStatus::Idle {
                state.status = QueryStatus::Success;
            }
        });

        let query = self.clone();
        tokio::spawn(async move {
            let _ = query.fetch().await;
        });
        Ok(cached)
    }

    /// React to a refetch trigger. Returns `None` when the trigger does not
    /// apply to this query.
    pub async fn handle_trigger(&self, trigger: &RefetchTrigger) -> Option<QueryResult<Res>> {
        match trigger {
            RefetchTrigger::Focus | RefetchTrigger::Reconnect if !self.options.auto_refetch => None,
            RefetchTrigger::Focus | RefetchTrigger::Reconnect => Some(self.fetch().await),
            RefetchTrigger::Invalidated(prefix) if self.key.parts().starts_with(prefix.parts()) => {
                Some(self.fetch().await)
            }
            RefetchTrigger::Invalidated(_) => None,
        }
    }

    /// Keep this query current while mounted: refetch on triggers and on the
    /// refetch interval. Abort the handle to unmount.
    pub fn watch(&self) -> JoinHandle<()> {
        let query = self.clone();
        let mut triggers = self.client.subscribe();
        let mut ticker = self.options.refetch_interval_active().map(|period| {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker
        });

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = triggers.recv() => match received {
                        Ok(trigger) => {
                            query.handle_trigger(&trigger).await;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(key = %query.key, skipped, "Refetch triggers dropped");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = tick(&mut ticker) => {
                        let _ = query.refetch().await;
                    }
                }
            }
        })
    }

    async fn fetch_within(&self, stale_time: Duration) -> QueryResult<Res> {
        let cache = self.client.cache();
        let fetch = match cache.lookup(&self.key, stale_time, |id| self.spawn_fetch(id)) {
            Lookup::Fresh(data) => {
                let envelope = self.downcast(data)?;
                self.update(|state| {
                    state.status = QueryStatus::Success;
                    state.data = Some(envelope.clone());
                });
                return Ok(envelope);
            }
            Lookup::Joined(fetch) | Lookup::Started(fetch) => fetch,
        };

        self.update(|state| {
            state.status = if state.data.is_some() {
                QueryStatus::Refetching
            } else {
                QueryStatus::Loading
            };
        });

        let result = fetch.await.and_then(|data| self.downcast(data));
        self.settle(&result);
        result
    }

    fn spawn_fetch(&self, id: u64) -> SharedFetch {
        let transport = self.client.transport().clone();
        let cache = self.client.cache().clone();
        let endpoint = self.endpoint;
        let params = self.params.clone();
        let key = self.key.clone();
        let retry = self.retry_config();
        let operation = endpoint.name;

        tracing::debug!(operation, key = %key, "Starting query fetch");

        // Spawned so that dropping every caller does not cancel the request.
        let task = {
            let cache = cache.clone();
            let key = key.clone();
            tokio::spawn(async move {
                let result: FetchResult = retry_call(&retry, operation, || transport.send(&endpoint, &params))
                    .await
                    .map(|envelope| Arc::new(envelope) as Erased)
                    .map_err(Arc::new);
                cache.complete(&key, id, &result);
                result
            })
        };

        async move { task_outcome(&cache, &key, id, operation, task.await) }
            .boxed()
            .shared()
    }

    fn retry_config(&self) -> RetryConfig {
        if self.options.auto_refetch {
            RetryConfig::default()
        } else {
            RetryConfig::no_retry()
        }
    }

    fn downcast(&self, data: Erased) -> QueryResult<Res> {
        data.downcast::<Envelope<Res>>().map_err(|_| {
            tracing::error!(key = %self.key, "Cached data has an unexpected type");
            Arc::new(TransportError::Aborted {
                operation: self.endpoint.name,
            })
        })
    }

    fn settle(&self, result: &QueryResult<Res>) {
        let message = outcome::settle(
            self.client.context(),
            self.client.defaults(),
            &self.options,
            self.endpoint.name,
            result
                .as_ref()
                .map(|envelope| &**envelope)
                .map_err(|error| &**error),
        );

        self.update(|state| match result {
            Ok(envelope) => {
                state.status = QueryStatus::Success;
                state.data = Some(envelope.clone());
                state.error = None;
                state.failure_message = message;
            }
            Err(error) => {
                state.status = QueryStatus::Error;
                state.error = Some(error.clone());
            }
        });
    }
}

impl<Req, Res> Query<Req, Res> {
    pub fn state(&self) -> QueryState<Res> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn status(&self) -> QueryStatus {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status
    }

    pub fn data(&self) -> Option<Arc<Envelope<Res>>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .data
            .clone()
    }

    /// The `ok:true` result, if the last data was one.
    pub fn result(&self) -> Option<Arc<Envelope<Res>>> {
        self.data().filter(|envelope| envelope.is_ok())
    }

    pub fn error(&self) -> Option<Arc<TransportError>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .error
            .clone()
    }

    pub fn failure_message(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .failure_message
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.status() == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status() == QueryStatus::Success
    }

    fn update(&self, f: impl FnOnce(&mut QueryState<Res>)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *state);
    }
}

/// Result of a fetch task. A task that panicked or was cancelled never
/// reached the cache, so its in-flight slot is released here.
fn task_outcome(
    cache: &QueryCache,
    key: &CacheKey,
    id: u64,
    operation: &'static str,
    joined: Result<FetchResult, JoinError>,
) -> FetchResult {
    joined.unwrap_or_else(|e| {
        tracing::error!(operation, key = %key, error = %e, "Query fetch task failed");
        let result: FetchResult = Err(Arc::new(TransportError::Aborted { operation }));
        cache.complete(key, id, &result);
        result
    })
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
