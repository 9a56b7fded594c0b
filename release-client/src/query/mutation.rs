//! Writes. Never cached, never coalesced, never retried.

use super::QueryClient;
use super::options::AppOptions;
use super::outcome;
use crate::api::Endpoint;
use crate::error::TransportError;
use crate::models::Envelope;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub struct Mutation<Req, Res> {
    client: QueryClient,
    endpoint: Endpoint<Req, Res>,
    options: Arc<AppOptions<Res>>,
    running: Arc<AtomicUsize>,
    failure_message: Arc<RwLock<Option<String>>>,
}

impl<Req, Res> Clone for Mutation<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: self.endpoint,
            options: self.options.clone(),
            running: self.running.clone(),
            failure_message: self.failure_message.clone(),
        }
    }
}

struct Running<'a>(&'a AtomicUsize);

impl<'a> Running<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<Req, Res> Mutation<Req, Res>
where
    Req: Serialize,
    Res: DeserializeOwned,
{
    pub(crate) fn new(client: QueryClient, endpoint: Endpoint<Req, Res>, options: AppOptions<Res>) -> Self {
        Self {
            client,
            endpoint,
            options: Arc::new(options),
            running: Arc::new(AtomicUsize::new(0)),
            failure_message: Arc::new(RwLock::new(None)),
        }
    }

    /// Send `input` and run the outcome handling. `ok:false` envelopes come
    /// back as `Ok`.
    pub async fn mutate(&self, input: &Req) -> Result<Envelope<Res>, TransportError> {
        let result = {
            let _running = Running::start(&self.running);
            self.client.transport().send(&self.endpoint, input).await
        };

        let message = outcome::settle(
            self.client.context(),
            self.client.defaults(),
            &self.options,
            self.endpoint.name,
            result.as_ref(),
        );
        *self
            .failure_message
            .write()
            .unwrap_or_else(PoisonError::into_inner) = message;

        if matches!(result, Ok(Envelope::Ok(_))) {
            for key in &self.options.invalidates {
                self.client.invalidate(key);
            }
        }

        result
    }

    pub fn is_loading(&self) -> bool {
        self.running.load(Ordering::SeqCst) > 0
    }

    pub fn failure_message(&self) -> Option<String> {
        self.failure_message
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
