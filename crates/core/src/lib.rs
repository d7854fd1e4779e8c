//! Domain logic for the devflow question-and-answer service.
//!
//! Everything in this crate is pure: no database, no network. The `db` crate
//! executes what these modules plan, and the `api` crate validates inbound
//! requests with them.

pub mod error;
pub mod filters;
pub mod pagination;
pub mod search;
pub mod tags;
pub mod types;
pub mod validation;
pub mod vote;
