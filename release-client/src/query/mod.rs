//! Binds endpoints to cached queries and mutations.

pub mod cache;
pub mod mutation;
pub mod options;
pub mod outcome;
#[allow(clippy::module_inception)]
pub mod query;

pub use cache::QueryCache;
pub use mutation::Mutation;
pub use options::{AppOptions, DefaultObservers, Magic, Observers, OutcomeEvent, Settled};
pub use query::{Query, QueryResult, QueryState, QueryStatus, RefetchTrigger};

use crate::api::{CacheKey, Endpoint, KeyParams};
use crate::context::AppContext;
use crate::models::Envelope;
use crate::services::transport::Transport;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::broadcast;

const TRIGGER_CAPACITY: usize = 64;

/// Entry point for all backend calls made by pages.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

struct Inner {
    context: Arc<AppContext>,
    transport: Arc<Transport>,
    cache: Arc<QueryCache>,
    defaults: DefaultObservers,
    triggers: broadcast::Sender<RefetchTrigger>,
}

impl QueryClient {
    /// A client with a transport built from the context's settings.
    pub fn new(context: Arc<AppContext>) -> Result<Self, reqwest::Error> {
        Self::builder(context).build()
    }

    pub fn builder(context: Arc<AppContext>) -> QueryClientBuilder {
        QueryClientBuilder {
            context,
            http: None,
            defaults: DefaultObservers::default(),
        }
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.inner.context
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.inner.transport
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.inner.cache
    }

    pub(crate) fn defaults(&self) -> &DefaultObservers {
        &self.inner.defaults
    }

    pub fn query<Req, Res>(
        &self,
        endpoint: Endpoint<Req, Res>,
        params: Req,
        options: AppOptions<Res>,
    ) -> Query<Req, Res>
    where
        Req: Serialize + KeyParams + Clone + Send + Sync + 'static,
        Res: DeserializeOwned + Send + Sync + 'static,
    {
        Query::new(self.clone(), endpoint, params, options)
    }

    pub fn mutation<Req, Res>(&self, endpoint: Endpoint<Req, Res>, options: AppOptions<Res>) -> Mutation<Req, Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        Mutation::new(self.clone(), endpoint, options)
    }

    /// Cached envelope for a query, whatever its age.
    pub fn cached<Req, Res>(&self, endpoint: &Endpoint<Req, Res>, params: &Req) -> Option<Arc<Envelope<Res>>>
    where
        Req: KeyParams,
        Res: Send + Sync + 'static,
    {
        self.inner
            .cache
            .get(&endpoint.key(params))
            .and_then(|data| data.downcast::<Envelope<Res>>().ok())
    }

    /// Mark cached queries under `prefix` stale and tell mounted ones to
    /// refetch.
    pub fn invalidate(&self, prefix: &CacheKey) -> usize {
        let matched = self.inner.cache.invalidate(prefix);
        tracing::debug!(key = %prefix, matched, "Invalidated queries");
        self.emit(RefetchTrigger::Invalidated(prefix.clone()));
        matched
    }

    pub fn focus(&self) {
        self.emit(RefetchTrigger::Focus);
    }

    pub fn reconnect(&self) {
        self.emit(RefetchTrigger::Reconnect);
    }

    /// Broadcast `trigger` to watching queries. Returns how many received it.
    pub fn emit(&self, trigger: RefetchTrigger) -> usize {
        self.inner.triggers.send(trigger).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefetchTrigger> {
        self.inner.triggers.subscribe()
    }
}

pub struct QueryClientBuilder {
    context: Arc<AppContext>,
    http: Option<reqwest::Client>,
    defaults: DefaultObservers,
}

impl QueryClientBuilder {
    /// Use a preconfigured HTTP client instead of one built from settings.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    pub fn defaults(mut self, defaults: DefaultObservers) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn build(self) -> Result<QueryClient, reqwest::Error> {
        let transport = match self.http {
            Some(client) => Transport::with_client(client, self.context.clone()),
            None => Transport::new(self.context.clone())?,
        };
        let (triggers, _) = broadcast::channel(TRIGGER_CAPACITY);

        Ok(QueryClient {
            inner: Arc::new(Inner {
                context: self.context,
                transport: Arc::new(transport),
                cache: Arc::new(QueryCache::new()),
                defaults: self.defaults,
                triggers,
            }),
        })
    }
}
