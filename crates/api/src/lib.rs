//! devflow HTTP server library.
//!
//! Exposes config, state, error handling, the router and handlers so both the
//! binary entrypoint and the integration tests build the same application.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
