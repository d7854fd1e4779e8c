pub mod answers;
pub mod identity;
pub mod questions;
pub mod tags;
pub mod users;

use devflow_events::ForumEvent;

use crate::state::AppState;

/// Publish `event` on the application bus.
///
/// Called only after the write it describes has succeeded.
pub(crate) fn announce(state: &AppState, event: ForumEvent) {
    tracing::debug!(
        event_type = %event.event_type,
        path = ?event.revalidate_path,
        "Publishing event",
    );
    state.event_bus.publish(event);
}
