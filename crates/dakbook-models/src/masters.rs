//! Master (reference) data: offices, delivery modes, couriers, and
//! correspondents.
//!
//! The four tables are structurally identical, so one module serves all of
//! them behind [`MasterKind`], which doubles as the whitelist of table names
//! that may be interpolated into SQL.

use crate::ids::{MasterId, TeamId, UserId};
use dakbook_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Which master table a request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MasterKind {
    Offices,
    Modes,
    Couriers,
    Correspondents,
}

impl MasterKind {
    /// Parses the path segment; anything outside the whitelist is rejected.
    pub fn parse(raw: &str) -> Option<MasterKind> {
        match raw.to_lowercase().as_str() {
            "offices" => Some(MasterKind::Offices),
            "modes" => Some(MasterKind::Modes),
            "couriers" => Some(MasterKind::Couriers),
            "correspondents" => Some(MasterKind::Correspondents),
            _ => None,
        }
    }

    /// Table name; safe to interpolate because the variants are closed.
    pub fn table(&self) -> &'static str {
        match self {
            MasterKind::Offices => "offices",
            MasterKind::Modes => "modes",
            MasterKind::Couriers => "couriers",
            MasterKind::Correspondents => "correspondents",
        }
    }
}

impl std::fmt::Display for MasterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// A master-data row. All four tables share this shape.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct MasterRecord {
    pub id: MasterId,
    pub name: String,
    pub team_id: Option<TeamId>,
    pub created_by: Option<UserId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a master record. Clerks may not create master data.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateMasterDto {
    #[validate(length(min = 1, max = 160))]
    pub name: String,
}

/// DTO for renaming a master record.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateMasterDto {
    #[validate(length(min = 1, max = 160))]
    pub name: String,
}

/// Filters for the master-data list endpoints.
#[derive(Deserialize, Debug, Clone, Default, ToSchema, utoipa::IntoParams)]
pub struct MasterFilterParams {
    #[serde(flatten)]
    pub pagination: dakbook_core::PaginationParams,
    /// Substring match on name
    pub q: Option<String>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct PaginatedMastersResponse {
    pub data: Vec<MasterRecord>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_whitelist() {
        assert_eq!(MasterKind::parse("offices"), Some(MasterKind::Offices));
        assert_eq!(MasterKind::parse("Modes"), Some(MasterKind::Modes));
        assert_eq!(MasterKind::parse("couriers"), Some(MasterKind::Couriers));
        assert_eq!(
            MasterKind::parse("correspondents"),
            Some(MasterKind::Correspondents)
        );
        assert_eq!(MasterKind::parse("users"), None);
        assert_eq!(MasterKind::parse("offices; drop table users"), None);
    }

    #[test]
    fn test_kind_table_round_trip() {
        for kind in [
            MasterKind::Offices,
            MasterKind::Modes,
            MasterKind::Couriers,
            MasterKind::Correspondents,
        ] {
            assert_eq!(MasterKind::parse(kind.table()), Some(kind));
        }
    }
}
