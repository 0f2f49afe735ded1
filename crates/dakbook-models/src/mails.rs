//! Inward/outward mail records, the transactional heart of the registry.

use crate::ids::{MailId, MasterId, TeamId, UserId};
use dakbook_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Direction of a correspondence record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MailDirection {
    Inward,
    Outward,
}

impl MailDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MailDirection::Inward => "inward",
            MailDirection::Outward => "outward",
        }
    }

    pub fn parse(raw: &str) -> Option<MailDirection> {
        match raw.to_lowercase().as_str() {
            "inward" => Some(MailDirection::Inward),
            "outward" => Some(MailDirection::Outward),
            _ => None,
        }
    }
}

/// A logged piece of correspondence.
///
/// `team_id` and `created_by` together carry the scoping information: every
/// read goes through a `ScopeFilter` over these two columns.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Mail {
    pub id: MailId,
    /// "inward" or "outward"; stored as text.
    pub direction: String,
    pub reference_no: String,
    pub subject: String,
    pub correspondent: String,
    pub office_id: Option<MasterId>,
    pub mode_id: Option<MasterId>,
    pub courier_id: Option<MasterId>,
    pub mail_date: chrono::NaiveDate,
    pub remarks: Option<String>,
    pub team_id: Option<TeamId>,
    pub created_by: UserId,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for registering a new mail record.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateMailDto {
    pub direction: MailDirection,
    #[validate(length(min = 1, max = 64))]
    pub reference_no: String,
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    #[validate(length(min = 1, max = 255))]
    pub correspondent: String,
    pub office_id: Option<MasterId>,
    pub mode_id: Option<MasterId>,
    pub courier_id: Option<MasterId>,
    pub mail_date: chrono::NaiveDate,
    pub remarks: Option<String>,
}

/// DTO for updating a mail record. All fields optional.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateMailDto {
    #[validate(length(min = 1, max = 64))]
    pub reference_no: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub correspondent: Option<String>,
    pub office_id: Option<MasterId>,
    pub mode_id: Option<MasterId>,
    pub courier_id: Option<MasterId>,
    pub mail_date: Option<chrono::NaiveDate>,
    pub remarks: Option<String>,
}

/// Filters for the mail list endpoint.
#[derive(Deserialize, Debug, Clone, Default, ToSchema, IntoParams)]
pub struct MailFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    /// "inward" or "outward"
    pub direction: Option<String>,
    /// Substring match on subject or correspondent
    pub q: Option<String>,
    /// Super admins may focus a single team; ignored for everyone else.
    #[serde(default, deserialize_with = "crate::ids::deserialize_optional_id")]
    pub team_id: Option<TeamId>,
}

/// DTO for the bulk delete endpoint.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct BulkDeleteMailsDto {
    #[validate(length(min = 1))]
    pub ids: Vec<MailId>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct PaginatedMailsResponse {
    pub data: Vec<Mail>,
    pub meta: PaginationMeta,
}

/// One row of the dashboard direction summary.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct MailDirectionCount {
    pub direction: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_params_accept_string_values() {
        // Query-string values always arrive as strings.
        let params: MailFilterParams = serde_json::from_value(serde_json::json!({
            "direction": "inward",
            "team_id": "5",
            "page": "2",
            "limit": "10",
        }))
        .unwrap();
        assert_eq!(params.direction.as_deref(), Some("inward"));
        assert_eq!(params.team_id, Some(TeamId::from(5)));
        assert_eq!(params.pagination.page(), 2);
        assert_eq!(params.pagination.limit(), 10);
    }

    #[test]
    fn test_filter_params_empty_team_id_means_absent() {
        let params: MailFilterParams =
            serde_json::from_value(serde_json::json!({ "team_id": "" })).unwrap();
        assert_eq!(params.team_id, None);
    }
}
