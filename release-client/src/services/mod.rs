pub mod metrics;
pub mod transport;
