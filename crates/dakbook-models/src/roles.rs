//! The three-tier role hierarchy and its normalization rules.
//!
//! Role strings arrive from two places that evolved independently: the
//! `users.role` column and the `role` claim in previously-issued tokens.
//! Casing and spacing vary across both ("Super Admin", "SUPERADMIN",
//! "super_admin"), so every comparison goes through [`Role::parse`] first.
//! Comparing raw role strings anywhere else is a bug.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalized role tag, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Clerk,
}

impl Role {
    /// Parses a raw role string, ignoring case and any space, underscore,
    /// or hyphen separators. Returns `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Role> {
        let normalized: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "superadmin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "clerk" => Some(Role::Clerk),
            _ => None,
        }
    }

    /// Canonical storage form written to the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Clerk => "clerk",
        }
    }

    /// Hierarchy level; higher means more privilege.
    pub fn level(&self) -> u8 {
        match self {
            Role::SuperAdmin => 2,
            Role::Admin => 1,
            Role::Clerk => 0,
        }
    }

    /// Whether this role meets or exceeds `minimum`.
    pub fn at_least(&self, minimum: Role) -> bool {
        self.level() >= minimum.level()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_forms() {
        assert_eq!(Role::parse("super_admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("clerk"), Some(Role::Clerk));
    }

    #[test]
    fn test_parse_tolerates_casing_and_spacing() {
        assert_eq!(Role::parse("Super Admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("SUPERADMIN"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("super-admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse(" Clerk "), Some(Role::Clerk));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Role::parse("manager"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("superadmin2"), None);
    }

    #[test]
    fn test_hierarchy() {
        assert!(Role::SuperAdmin.at_least(Role::Admin));
        assert!(Role::Admin.at_least(Role::Admin));
        assert!(!Role::Clerk.at_least(Role::Admin));
        assert!(Role::SuperAdmin.level() > Role::Admin.level());
        assert!(Role::Admin.level() > Role::Clerk.level());
    }

    #[test]
    fn test_storage_form_round_trips() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Clerk] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }
}
