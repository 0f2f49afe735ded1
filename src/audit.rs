//! The audit recorder: best-effort, append-only trail of every attempted
//! mutation and security-relevant action.
//!
//! [`record`] never fails from the caller's point of view. Audit logging is
//! a diagnostic side channel; a storage outage here must not take down the
//! primary business operation, so every persistence error is caught, logged
//! operationally, and collapsed into `None`. One attempt per event, no
//! retries.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use sqlx::PgPool;
use tracing::error;

use dakbook_auth::session::Session;
use dakbook_models::audit::{AuditEvent, AuditLog};

/// Best-effort request metadata attached to every audit row.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub ip_address: String,
    pub user_agent: String,
}

const UNKNOWN: &str = "unknown";

impl RequestMeta {
    pub fn unknown() -> Self {
        Self {
            ip_address: UNKNOWN.to_string(),
            user_agent: UNKNOWN.to_string(),
        }
    }

    /// Source address from the forwarded-for header (first hop) and the
    /// client agent string, each falling back to `"unknown"`.
    pub fn from_parts_headers(headers: &axum::http::HeaderMap) -> Self {
        let ip_address = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let user_agent = headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            ip_address,
            user_agent,
        }
    }
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestMeta::from_parts_headers(&parts.headers))
    }
}

/// Serializes an entity into the JSON snapshot stored in `before`/`after`.
/// Serialization failure degrades to JSON null rather than aborting the
/// caller's operation.
pub fn snapshot<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

/// Persists one audit row for `event`, enriched with the current session's
/// actor fields (unless the event overrides them) and the request metadata.
///
/// Returns the stored row, or `None` if persistence failed for any reason.
/// Callers must not branch on the result for business logic.
pub async fn record(
    db: &PgPool,
    session: Option<&Session>,
    meta: &RequestMeta,
    event: AuditEvent,
) -> Option<AuditLog> {
    match insert_event(db, session, meta, &event).await {
        Ok(log) => Some(log),
        Err(e) => {
            error!(
                table = %event.table,
                action = %event.action.as_str(),
                error = %e,
                "Audit write failed; continuing without a record"
            );
            None
        }
    }
}

async fn insert_event(
    db: &PgPool,
    session: Option<&Session>,
    meta: &RequestMeta,
    event: &AuditEvent,
) -> Result<AuditLog, sqlx::Error> {
    let (user_id, team_id) = match event.actor {
        Some((user_id, team_id)) => (user_id, team_id),
        None => (
            session.map(|s| s.user_id),
            session.and_then(|s| s.team_id),
        ),
    };

    sqlx::query_as::<_, AuditLog>(
        r#"
        INSERT INTO audit_logs
            (table_name, record_id, action, user_id, team_id,
             before, after, ip_address, user_agent, details)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, table_name, record_id, action, user_id, team_id,
                  before, after, ip_address, user_agent, details, created_at
        "#,
    )
    .bind(&event.table)
    .bind(&event.record_id)
    .bind(event.action.as_str())
    .bind(user_id)
    .bind(team_id)
    .bind(&event.before)
    .bind(&event.after)
    .bind(&meta.ip_address)
    .bind(&meta.user_agent)
    .bind(&event.details)
    .fetch_one(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    #[test]
    fn test_meta_defaults_to_unknown() {
        let meta = RequestMeta::from_parts_headers(&HeaderMap::new());
        assert_eq!(meta.ip_address, "unknown");
        assert_eq!(meta.user_agent, "unknown");
    }

    #[test]
    fn test_meta_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("10.1.2.3, 172.16.0.1"),
        );
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));

        let meta = RequestMeta::from_parts_headers(&headers);
        assert_eq!(meta.ip_address, "10.1.2.3");
        assert_eq!(meta.user_agent, "curl/8.0");
    }

    #[test]
    fn test_meta_empty_header_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        let meta = RequestMeta::from_parts_headers(&headers);
        assert_eq!(meta.ip_address, "unknown");
    }
}
