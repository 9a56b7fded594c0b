//! HTTP transport to the RelEase backend.

use crate::api::{Endpoint, ParamStyle};
use crate::context::AppContext;
use crate::error::TransportError;
use crate::models::{Envelope, ResponseBody};
use crate::services::metrics;
use release_core::observability::TracedClientExt;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

pub struct Transport {
    client: Client,
    base_url: String,
    context: Arc<AppContext>,
}

impl Transport {
    pub fn new(context: Arc<AppContext>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(context.settings.api.timeout())
            .build()?;

        Ok(Self::with_client(client, context))
    }

    pub fn with_client(client: Client, context: Arc<AppContext>) -> Self {
        Self {
            client,
            base_url: context
                .settings
                .api
                .base_url
                .trim_end_matches('/')
                .to_string(),
            context,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    /// Token to sign requests with: only on `User` pages, only with a session.
    fn bearer_token(&self) -> Option<Secret<String>> {
        if !self.context.access.is_user() {
            return None;
        }
        self.context
            .session
            .current()
            .map(|session| session.token.clone())
    }

    /// Call `endpoint`.
    ///
    /// `ok:false` envelopes are returned as `Ok`; only failures to obtain a
    /// well-formed envelope are errors.
    pub async fn send<Req, Res>(
        &self,
        endpoint: &Endpoint<Req, Res>,
        params: &Req,
    ) -> Result<Envelope<Res>, TransportError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let started = Instant::now();
        let result = self.dispatch(endpoint, params).await;

        let outcome = match &result {
            Ok(Envelope::Ok(_)) => "ok",
            Ok(Envelope::NotOk(_)) => "not_ok",
            Err(e) => e.kind(),
        };
        metrics::record_request(endpoint.name, outcome, started.elapsed());

        result
    }

    async fn dispatch<Req, Res>(
        &self,
        endpoint: &Endpoint<Req, Res>,
        params: &Req,
    ) -> Result<Envelope<Res>, TransportError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let operation = endpoint.name;
        let url = format!("{}{}", self.base_url, endpoint.path);

        let mut request = self.client.traced(endpoint.method.as_reqwest(), &url);
        request = match endpoint.params {
            ParamStyle::None => request,
            ParamStyle::Json => request.json(params),
            ParamStyle::Query => request.query(params),
        };
        if let Some(token) = self.bearer_token() {
            request = request.bearer_auth(token.expose_secret());
        }

        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(operation, request_id = %request_id, method = ?endpoint.method, url = %url, "Sending API request");

        let response = request
            .send_with_request_id(&request_id)
            .await
            .map_err(|e| classify(operation, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify(operation, e))?;

        if !status.is_success() {
            tracing::warn!(operation, request_id = %request_id, status = %status, "API request failed");
            return Err(TransportError::Status {
                operation,
                status,
                body: serde_json::from_slice::<ResponseBody>(&bytes).ok(),
            });
        }

        let envelope = Envelope::from_slice(&bytes).map_err(|source| {
            tracing::error!(operation, error = %source, "Malformed response envelope");
            TransportError::Envelope { operation, source }
        })?;

        if let Envelope::NotOk(failure) = &envelope {
            tracing::debug!(operation, reason = %failure.error.reason, "API returned a soft failure");
        }

        Ok(envelope)
    }
}

fn classify(operation: &'static str, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout { operation }
    } else if error.is_builder() {
        TransportError::Request {
            operation,
            source: error,
        }
    } else {
        tracing::error!(operation, error = %error, "HTTP request failed");
        TransportError::Network {
            operation,
            source: error,
        }
    }
}
