pub mod accounts;
pub mod chat;
pub mod envelope;
pub mod general;
pub mod releases;
pub mod tickets;

pub use envelope::{Envelope, EnvelopeError, Failure, RawFailure, ResponseBody, SoftFailure};
