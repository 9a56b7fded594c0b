//! release-core: Shared infrastructure for the RelEase client crates.
pub mod config;
pub mod observability;
pub mod retry;

pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
