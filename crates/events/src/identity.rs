//! Identity-provider lifecycle events.
//!
//! The provider posts `{"type": "...", "data": {...}}` envelopes. The three
//! user lifecycle types map onto [`UserRepo`]; every other type is
//! acknowledged and ignored. Signature verification happens before events
//! reach this module.

use std::sync::Arc;

use devflow_core::error::CoreError;
use devflow_core::types::ExternalId;
use devflow_core::validation::ProfileUpdate;
use devflow_db::models::user::{CreateUser, User};
use devflow_db::repositories::UserRepo;
use devflow_db::{DbPool, DbResult};
use serde::Deserialize;

use crate::bus::{event_types, EventBus, ForumEvent};

/// One address on the provider's user record.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

/// The provider's user record, as sent with created and updated events.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    pub image_url: Option<String>,
}

impl IdentityUser {
    /// `first_name`, followed by ` last_name` when present.
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default().trim();
        let last = self.last_name.as_deref().map(str::trim);
        match last.filter(|l| !l.is_empty()) {
            Some(last) if first.is_empty() => last.to_string(),
            Some(last) => format!("{first} {last}"),
            None => first.to_string(),
        }
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses.first().map(|e| e.email_address.as_str())
    }

    fn external_id(&self) -> Result<ExternalId, CoreError> {
        ExternalId::new(self.id.as_str())
    }

    fn to_create(&self) -> Result<CreateUser, CoreError> {
        let username = self
            .username
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| CoreError::Validation("identity user has no username".to_string()))?;
        let email = self
            .primary_email()
            .ok_or_else(|| {
                CoreError::Validation("identity user has no email address".to_string())
            })?;

        Ok(CreateUser {
            external_id: self.external_id()?,
            name: self.display_name(),
            username,
            email: email.to_string(),
            picture: self.image_url.clone().unwrap_or_default(),
        })
    }

    fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            name: Some(self.display_name()),
            username: self
                .username
                .clone()
                .filter(|u| !u.trim().is_empty()),
            email: self.primary_email().map(str::to_string),
            picture: self.image_url.clone(),
            ..ProfileUpdate::default()
        }
    }
}

/// Payload of a `user.deleted` event.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedIdentity {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// A parsed identity-provider event.
#[derive(Debug, Clone)]
pub enum IdentityEvent {
    Created(IdentityUser),
    Updated(IdentityUser),
    Deleted(DeletedIdentity),
    /// Any other event type, by name.
    Other(String),
}

impl IdentityEvent {
    /// Parse a raw provider envelope.
    pub fn parse(raw: serde_json::Value) -> Result<Self, CoreError> {
        let envelope: Envelope = serde_json::from_value(raw)
            .map_err(|e| CoreError::Validation(format!("Malformed identity event: {e}")))?;

        let data = |kind: &str| {
            let kind = kind.to_string();
            move |e: serde_json::Error| {
                CoreError::Validation(format!("Malformed {kind} payload: {e}"))
            }
        };

        Ok(match envelope.event_type.as_str() {
            event_types::USER_CREATED => {
                Self::Created(serde_json::from_value(envelope.data).map_err(data("user.created"))?)
            }
            event_types::USER_UPDATED => {
                Self::Updated(serde_json::from_value(envelope.data).map_err(data("user.updated"))?)
            }
            event_types::USER_DELETED => {
                Self::Deleted(serde_json::from_value(envelope.data).map_err(data("user.deleted"))?)
            }
            _ => Self::Other(envelope.event_type),
        })
    }
}

/// What [`IdentitySync::handle`] did.
#[derive(Debug, Clone)]
pub enum IdentityOutcome {
    Created(User),
    Updated(User),
    Deleted(User),
    Ignored(String),
}

/// Applies identity events to the user store and announces the change.
pub struct IdentitySync {
    pool: DbPool,
    bus: Arc<EventBus>,
}

impl IdentitySync {
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self { pool, bus }
    }

    pub async fn handle(&self, event: IdentityEvent) -> DbResult<IdentityOutcome> {
        match event {
            IdentityEvent::Created(identity) => {
                let user = UserRepo::create(&self.pool, &identity.to_create()?).await?;
                self.announce(event_types::USER_CREATED, &user, None);
                Ok(IdentityOutcome::Created(user))
            }
            IdentityEvent::Updated(identity) => {
                let external_id = identity.external_id()?;
                let user =
                    UserRepo::update_by_external_id(&self.pool, &external_id, &identity.to_update())
                        .await?;
                let path = format!("/profile/{external_id}");
                self.announce(event_types::USER_UPDATED, &user, Some(path));
                Ok(IdentityOutcome::Updated(user))
            }
            IdentityEvent::Deleted(deleted) => {
                let external_id = ExternalId::new(deleted.id.unwrap_or_default())?;
                let user = UserRepo::delete_cascade(&self.pool, &external_id).await?;
                self.announce(event_types::USER_DELETED, &user, Some("/".to_string()));
                Ok(IdentityOutcome::Deleted(user))
            }
            IdentityEvent::Other(kind) => {
                tracing::debug!(event_type = %kind, "Ignoring identity event");
                Ok(IdentityOutcome::Ignored(kind))
            }
        }
    }

    fn announce(&self, event_type: &str, user: &User, path: Option<String>) {
        self.bus.publish(
            ForumEvent::new(event_type)
                .with_source("user", user.id)
                .with_revalidate_path(path)
                .with_payload(serde_json::json!({ "external_id": user.external_id })),
        );
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn created() -> serde_json::Value {
        json!({
            "type": "user.created",
            "data": {
                "id": "user_2abc",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "username": "ada",
                "email_addresses": [
                    {"email_address": "ada@example.com"},
                    {"email_address": "ada@work.example"}
                ],
                "image_url": "https://img.example/ada.png"
            }
        })
    }

    #[test]
    fn created_event_maps_to_new_user() {
        let event = IdentityEvent::parse(created()).unwrap();
        let identity = assert_matches!(event, IdentityEvent::Created(u) => u);

        let create = identity.to_create().unwrap();
        assert_eq!(create.external_id.as_str(), "user_2abc");
        assert_eq!(create.name, "Ada Lovelace");
        assert_eq!(create.username, "ada");
        assert_eq!(create.email, "ada@example.com");
        assert_eq!(create.picture, "https://img.example/ada.png");
    }

    #[test]
    fn display_name_omits_missing_last_name() {
        let mut raw = created();
        raw["data"]["last_name"] = serde_json::Value::Null;
        let event = IdentityEvent::parse(raw).unwrap();
        let identity = assert_matches!(event, IdentityEvent::Created(u) => u);
        assert_eq!(identity.display_name(), "Ada");
    }

    #[test]
    fn created_without_email_is_rejected() {
        let mut raw = created();
        raw["data"]["email_addresses"] = json!([]);
        let event = IdentityEvent::parse(raw).unwrap();
        let identity = assert_matches!(event, IdentityEvent::Created(u) => u);
        assert_matches!(identity.to_create(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn updated_event_only_sets_provider_fields() {
        let mut raw = created();
        raw["type"] = json!("user.updated");
        let event = IdentityEvent::parse(raw).unwrap();
        let identity = assert_matches!(event, IdentityEvent::Updated(u) => u);

        let update = identity.to_update();
        assert_eq!(update.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(update.email.as_deref(), Some("ada@example.com"));
        assert!(update.bio.is_none());
        assert!(update.location.is_none());
    }

    #[test]
    fn deleted_event_carries_the_id() {
        let event = IdentityEvent::parse(json!({
            "type": "user.deleted",
            "data": {"id": "user_2abc", "deleted": true}
        }))
        .unwrap();
        let deleted = assert_matches!(event, IdentityEvent::Deleted(d) => d);
        assert_eq!(deleted.id.as_deref(), Some("user_2abc"));
    }

    #[test]
    fn unrelated_types_are_passed_through() {
        let event = IdentityEvent::parse(json!({"type": "session.created", "data": {}})).unwrap();
        assert_matches!(event, IdentityEvent::Other(kind) if kind == "session.created");
    }

    #[test]
    fn malformed_envelopes_are_validation_errors() {
        assert_matches!(
            IdentityEvent::parse(json!({"data": {}})),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            IdentityEvent::parse(json!({"type": "user.created", "data": {"first_name": "x"}})),
            Err(CoreError::Validation(_))
        );
    }
}
