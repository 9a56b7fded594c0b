pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod models;
pub mod query;
pub mod services;
pub mod session;
pub mod utils;

pub use api::{endpoints, query_keys, CacheKey, Endpoint};
pub use context::{AppContext, Navigator, Notifier};
pub use error::{StorageError, TransportError};
pub use guard::{Access, AuthGuard, Guardage};
pub use models::Envelope;
pub use query::{AppOptions, Mutation, Query, QueryClient, QueryStatus, RefetchTrigger};
pub use utils::failures::Messages;
