// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod api;
pub mod config;
pub mod derive;
pub mod error;
pub mod fetch;
pub mod models;
pub mod mutation;
pub mod query;
pub mod session;
pub mod transport;
