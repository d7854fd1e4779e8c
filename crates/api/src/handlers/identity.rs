//! Handler for identity-provider lifecycle events.
//!
//! Payloads are expected to be verified upstream; this endpoint only parses
//! and applies them.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use devflow_events::{IdentityEvent, IdentityOutcome, IdentitySync};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/identity/events
///
/// Creates, updates or deletes the matching user. Event types other than
/// `user.*` are acknowledged and ignored.
pub async fn receive_event(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let event = IdentityEvent::parse(raw)?;
    let sync = IdentitySync::new(state.pool.clone(), Arc::clone(&state.event_bus));

    let data = match sync.handle(event).await? {
        IdentityOutcome::Created(user) => json!({ "outcome": "created", "user": user }),
        IdentityOutcome::Updated(user) => json!({ "outcome": "updated", "user": user }),
        IdentityOutcome::Deleted(user) => json!({ "outcome": "deleted", "user": user }),
        IdentityOutcome::Ignored(kind) => json!({ "outcome": "ignored", "event_type": kind }),
    };

    Ok(Json(DataResponse { data }))
}
