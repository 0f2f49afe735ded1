//! User entity and DTOs.
//!
//! The `role` column is stored as text and may contain legacy casings; it is
//! never compared raw. Use [`crate::roles::Role::parse`] before any check.

use crate::ids::{TeamId, UserId};
use dakbook_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A user account. The password hash is never selected into this struct.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Raw role string as stored; normalize with `Role::parse` before use.
    pub role: String,
    pub team_id: Option<TeamId>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a user.
///
/// Non-super-admin actors have the `team_id` forced to their own team by the
/// service layer regardless of what is submitted here.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// Role name; accepted in any casing and normalized before storage.
    pub role: String,
    pub team_id: Option<TeamId>,
}

/// DTO for updating a user. All fields optional.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub role: Option<String>,
    pub team_id: Option<TeamId>,
    pub active: Option<bool>,
}

/// Filters for the user list endpoint.
#[derive(Deserialize, Debug, Clone, Default, ToSchema, utoipa::IntoParams)]
pub struct UserFilterParams {
    #[serde(flatten)]
    pub pagination: dakbook_core::PaginationParams,
    /// Substring match on username or email
    pub q: Option<String>,
    /// Super admins may focus a single team; ignored for everyone else.
    #[serde(default, deserialize_with = "crate::ids::deserialize_optional_id")]
    pub team_id: Option<TeamId>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}
