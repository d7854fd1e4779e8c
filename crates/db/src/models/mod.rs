//! Row structs and DTOs.
//!
//! Each submodule holds the `FromRow` + `Serialize` structs its repository
//! returns and the DTOs it accepts. Listing rows embed small JSON documents
//! (author, tag refs) built in SQL so a page is one query.

pub mod answer;
pub mod interaction;
pub mod question;
pub mod tag;
pub mod user;
