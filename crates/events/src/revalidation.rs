//! Forwarding of revalidation hints to the presentation layer.
//!
//! Every mutation may carry a path naming the view that should be refreshed
//! after the write. [`RevalidationRelay`] subscribes to the
//! [`EventBus`](crate::bus::EventBus) and hands each non-empty path to a
//! [`CacheInvalidator`]. The path is never interpreted here.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::bus::ForumEvent;

/// The presentation layer's cache-invalidation hook.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, path: &str);
}

/// Invalidator that only logs the path. Installed by the server binary when
/// no presentation layer is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInvalidator;

impl CacheInvalidator for LogInvalidator {
    fn invalidate(&self, path: &str) {
        tracing::info!(path, "Revalidate path");
    }
}

/// Background task relaying revalidation paths.
pub struct RevalidationRelay;

impl RevalidationRelay {
    /// Run until the bus is dropped.
    pub async fn run(
        invalidator: Arc<dyn CacheInvalidator>,
        mut receiver: broadcast::Receiver<ForumEvent>,
    ) {
        loop {
            match receiver.recv().await {
                Ok(event) => Self::forward(invalidator.as_ref(), &event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Revalidation relay lagged, some paths were not refreshed"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, revalidation relay shutting down");
                    break;
                }
            }
        }
    }

    /// Hand one event's path, if any, to the invalidator.
    pub fn forward(invalidator: &dyn CacheInvalidator, event: &ForumEvent) {
        if let Some(path) = event.revalidate_path.as_deref() {
            tracing::debug!(event_type = %event.event_type, path, "Forwarding revalidation");
            invalidator.invalidate(path);
        }
    }
}
