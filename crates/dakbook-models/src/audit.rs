//! Append-only audit trail types.
//!
//! Rows in `audit_logs` are written once by the audit recorder and never
//! updated or deleted by the application.

use crate::ids::{AuditLogId, TeamId, UserId};
use dakbook_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// What kind of event an audit row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Crash,
    Access,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Login => "login",
            AuditAction::Crash => "crash",
            AuditAction::Access => "access",
        }
    }
}

/// A persisted audit row.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub table_name: String,
    pub record_id: Option<String>,
    /// One of the [`AuditAction`] storage forms.
    pub action: String,
    pub user_id: Option<UserId>,
    pub team_id: Option<TeamId>,
    #[schema(value_type = Object)]
    pub before: Option<serde_json::Value>,
    #[schema(value_type = Object)]
    pub after: Option<serde_json::Value>,
    pub ip_address: String,
    pub user_agent: String,
    pub details: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// An event handed to the audit recorder.
///
/// The actor is normally filled in from the current session; `actor` is the
/// override used when no session exists yet (login attempts) or the acting
/// identity is not the session (system-initiated actions).
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub table: String,
    pub record_id: Option<String>,
    pub action: AuditAction,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub details: Option<String>,
    pub actor: Option<(Option<UserId>, Option<TeamId>)>,
}

impl AuditEvent {
    fn new(table: impl Into<String>, action: AuditAction) -> Self {
        Self {
            table: table.into(),
            record_id: None,
            action,
            before: None,
            after: None,
            details: None,
            actor: None,
        }
    }

    /// Create event: `after` snapshot only.
    pub fn create(
        table: impl Into<String>,
        record_id: impl ToString,
        after: serde_json::Value,
    ) -> Self {
        let mut ev = Self::new(table, AuditAction::Create);
        ev.record_id = Some(record_id.to_string());
        ev.after = Some(after);
        ev
    }

    /// Update event: `before` and `after` snapshots.
    pub fn update(
        table: impl Into<String>,
        record_id: impl ToString,
        before: serde_json::Value,
        after: serde_json::Value,
    ) -> Self {
        let mut ev = Self::new(table, AuditAction::Update);
        ev.record_id = Some(record_id.to_string());
        ev.before = Some(before);
        ev.after = Some(after);
        ev
    }

    /// Delete event: `before` snapshot only.
    pub fn delete(
        table: impl Into<String>,
        record_id: impl ToString,
        before: serde_json::Value,
    ) -> Self {
        let mut ev = Self::new(table, AuditAction::Delete);
        ev.record_id = Some(record_id.to_string());
        ev.before = Some(before);
        ev
    }

    /// Bulk delete event: one aggregate record for the whole operation,
    /// carrying the affected row count in `details`. Never one event per
    /// deleted row.
    pub fn bulk_delete(table: impl Into<String>, count: u64) -> Self {
        Self::new(table, AuditAction::Delete)
            .with_record_id("bulk")
            .with_details(format!("Bulk delete: {count} records"))
    }

    /// Crash event carrying the failed operation's error message.
    pub fn crash(table: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(table, AuditAction::Crash).with_details(details)
    }

    /// Login-attempt event. No session exists yet, so the caller supplies
    /// the target account via [`AuditEvent::with_actor`] when it is known.
    pub fn login(details: impl Into<String>) -> Self {
        Self::new("users", AuditAction::Login).with_details(details)
    }

    /// Access event (logout, sensitive reads).
    pub fn access(table: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(table, AuditAction::Access).with_details(details)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_record_id(mut self, record_id: impl ToString) -> Self {
        self.record_id = Some(record_id.to_string());
        self
    }

    /// Overrides the actor fields instead of taking them from the session.
    pub fn with_actor(mut self, user_id: Option<UserId>, team_id: Option<TeamId>) -> Self {
        self.actor = Some((user_id, team_id));
        self
    }
}

/// Filters for the audit log list endpoint.
#[derive(Deserialize, Debug, Clone, Default, ToSchema, utoipa::IntoParams)]
pub struct AuditLogFilterParams {
    #[serde(flatten)]
    pub pagination: dakbook_core::PaginationParams,
    /// Restrict to one table.
    pub table: Option<String>,
    /// Restrict to one action.
    pub action: Option<String>,
    /// Super admins may focus a single team; ignored for everyone else.
    #[serde(default, deserialize_with = "crate::ids::deserialize_optional_id")]
    pub team_id: Option<TeamId>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct PaginatedAuditLogsResponse {
    pub data: Vec<AuditLog>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_shapes_follow_action() {
        let ev = AuditEvent::create("mails", 9, json!({"subject": "tender"}));
        assert!(ev.before.is_none());
        assert!(ev.after.is_some());
        assert_eq!(ev.record_id.as_deref(), Some("9"));

        let ev = AuditEvent::update("mails", 9, json!({"a": 1}), json!({"a": 2}));
        assert!(ev.before.is_some() && ev.after.is_some());

        let ev = AuditEvent::delete("mails", 9, json!({"a": 1}));
        assert!(ev.before.is_some());
        assert!(ev.after.is_none());
    }

    #[test]
    fn test_bulk_delete_is_one_aggregate_event() {
        let ev = AuditEvent::bulk_delete("mails", 12);
        assert_eq!(ev.action, AuditAction::Delete);
        assert_eq!(ev.record_id.as_deref(), Some("bulk"));
        assert_eq!(ev.details.as_deref(), Some("Bulk delete: 12 records"));
        assert!(ev.before.is_none() && ev.after.is_none());
    }

    #[test]
    fn test_repeated_events_are_independent() {
        // Events carry no identity or dedup key: auditing the same action
        // twice hands the recorder two separate events, each of which
        // becomes its own row.
        let first = AuditEvent::delete("mails", 9, json!({"subject": "tender"}));
        let second = AuditEvent::delete("mails", 9, json!({"subject": "tender"}));
        assert_eq!(first.table, second.table);
        assert_eq!(first.record_id, second.record_id);
        assert_eq!(first.before, second.before);

        let first = AuditEvent::bulk_delete("mails", 3);
        let second = AuditEvent::bulk_delete("mails", 3);
        assert_eq!(first.details, second.details);
    }

    #[test]
    fn test_crash_carries_details() {
        let ev = AuditEvent::crash("mails", "duplicate reference number");
        assert_eq!(ev.action, AuditAction::Crash);
        assert_eq!(ev.details.as_deref(), Some("duplicate reference number"));
    }

    #[test]
    fn test_actor_override() {
        let ev = AuditEvent::login("bad credentials").with_actor(Some(UserId::from(4)), None);
        assert_eq!(ev.actor, Some((Some(UserId::from(4)), None)));
    }

    #[test]
    fn test_action_storage_forms() {
        assert_eq!(AuditAction::Create.as_str(), "create");
        assert_eq!(AuditAction::Crash.as_str(), "crash");
        assert_eq!(AuditAction::Access.as_str(), "access");
    }
}
