//! devflow event bus, revalidation relay and identity sync.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ForumEvent`]: the envelope every successful mutation publishes.
//! - [`RevalidationRelay`]: background task forwarding revalidation paths
//!   to a [`CacheInvalidator`].
//! - [`IdentitySync`]: applies identity-provider lifecycle events to users.

pub mod bus;
pub mod identity;
pub mod revalidation;

pub use bus::{event_types, EventBus, ForumEvent};
pub use identity::{IdentityEvent, IdentityOutcome, IdentitySync};
pub use revalidation::{CacheInvalidator, LogInvalidator, RevalidationRelay};
