pub mod failures;
pub mod routes;
