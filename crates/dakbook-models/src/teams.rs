//! Team (tenant) entity and DTOs.
//!
//! A team is the unit of data isolation: every tenant-scoped row carries a
//! nullable `team_id`, and Admin/Clerk users see only their own team's rows.

use crate::ids::TeamId;
use dakbook_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A team in the system.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a team. Super admins only.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateTeamDto {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// DTO for updating a team.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateTeamDto {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub active: Option<bool>,
}

/// Filters for the team list endpoint.
#[derive(Deserialize, Debug, Clone, Default, ToSchema, utoipa::IntoParams)]
pub struct TeamFilterParams {
    #[serde(flatten)]
    pub pagination: dakbook_core::PaginationParams,
    /// Substring match on name
    pub q: Option<String>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct PaginatedTeamsResponse {
    pub data: Vec<Team>,
    pub meta: PaginationMeta,
}
