//! Typed descriptors of the RelEase REST operations.

pub mod endpoints;
pub mod query_keys;

use crate::error::TransportError;
use crate::models::Envelope;
use crate::services::transport::Transport;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;

pub use query_keys::{CacheKey, KeyParams, KeyPart};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// How the request parameters travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    None,
    Json,
    Query,
}

/// One backend operation, typed by its parameters and its result.
pub struct Endpoint<Req, Res> {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub params: ParamStyle,
    shape: PhantomData<fn(&Req) -> Res>,
}

impl<Req, Res> Endpoint<Req, Res> {
    pub const fn new(
        name: &'static str,
        method: HttpMethod,
        path: &'static str,
        params: ParamStyle,
    ) -> Self {
        Self {
            name,
            method,
            path,
            params,
            shape: PhantomData,
        }
    }

    pub const fn get(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Get, path, ParamStyle::None)
    }

    pub const fn get_query(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Get, path, ParamStyle::Query)
    }

    pub const fn post(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Post, path, ParamStyle::None)
    }

    pub const fn post_json(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Post, path, ParamStyle::Json)
    }

    pub const fn post_query(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Post, path, ParamStyle::Query)
    }
}

impl<Req, Res> Endpoint<Req, Res>
where
    Req: Serialize,
    Res: DeserializeOwned,
{
    /// Invoke the operation directly, bypassing the query cache.
    pub async fn call(&self, transport: &Transport, params: &Req) -> Result<Envelope<Res>, TransportError> {
        transport.send(self, params).await
    }
}

impl<Req: KeyParams, Res> Endpoint<Req, Res> {
    /// Cache key of a query on this endpoint.
    pub fn key(&self, params: &Req) -> CacheKey {
        CacheKey::for_operation(self.name, params)
    }
}

impl CacheKey {
    pub fn for_endpoint<Req: KeyParams, Res>(endpoint: &Endpoint<Req, Res>, params: &Req) -> Self {
        endpoint.key(params)
    }
}

// Manual impls: derives would needlessly require `Req: Clone` and friends.
impl<Req, Res> Clone for Endpoint<Req, Res> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Req, Res> Copy for Endpoint<Req, Res> {}

impl<Req, Res> fmt::Debug for Endpoint<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .finish()
    }
}
