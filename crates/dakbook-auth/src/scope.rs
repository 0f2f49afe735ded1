//! Scope filters: the data-access predicate derived from a session.
//!
//! Every query against a tenant-scoped table (mails, master data, users,
//! audit logs) must AND one of these filters into its WHERE clause.
//! Executing such a query without a filter is a defect.
//!
//! The filter is an exhaustive enum rather than a query fragment so that a
//! new role or tenant combination that is not explicitly handled fails to
//! compile instead of silently widening access.

use sqlx::{Postgres, QueryBuilder};

use dakbook_models::ids::{TeamId, UserId};
use dakbook_models::roles::Role;

use crate::session::Session;

/// The data-access predicate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
    /// No restriction. Only ever produced for super admins.
    Unrestricted,
    /// Rows tagged with this team.
    ByTenant(TeamId),
    /// Rows created by this user.
    ByOwner(UserId),
}

impl ScopeFilter {
    /// A filter that matches no possible row. `created_by` is a positive
    /// serial, so owner id -1 can never match.
    pub const fn deny_all() -> ScopeFilter {
        ScopeFilter::ByOwner(UserId::from_i64(-1))
    }

    /// Whether this filter can never match a row.
    pub fn is_deny_all(&self) -> bool {
        matches!(self, ScopeFilter::ByOwner(id) if id.into_inner() < 0)
    }

    /// Appends ` AND <col> = <id>` for the restricted variants. Callers pass
    /// the table's tenant and owner column names; `Unrestricted` appends
    /// nothing.
    pub fn push_sql(
        &self,
        qb: &mut QueryBuilder<'_, Postgres>,
        tenant_col: &str,
        owner_col: &str,
    ) {
        match self {
            ScopeFilter::Unrestricted => {}
            ScopeFilter::ByTenant(team_id) => {
                qb.push(" AND ");
                qb.push(tenant_col);
                qb.push(" = ");
                qb.push_bind(team_id.into_inner());
            }
            ScopeFilter::ByOwner(user_id) => {
                qb.push(" AND ");
                qb.push(owner_col);
                qb.push(" = ");
                qb.push_bind(user_id.into_inner());
            }
        }
    }
}

/// Filter for ownership views ("my records").
///
/// Super admins see everything; scoped roles see their team's rows, or fall
/// back to rows they created themselves when they have no team.
pub fn base_filter(session: Option<&Session>) -> ScopeFilter {
    let Some(session) = session else {
        return ScopeFilter::deny_all();
    };

    match (session.role, session.team_id) {
        (Role::SuperAdmin, _) => ScopeFilter::Unrestricted,
        (Role::Admin | Role::Clerk, Some(team_id)) => ScopeFilter::ByTenant(team_id),
        (Role::Admin | Role::Clerk, None) => ScopeFilter::ByOwner(session.user_id),
    }
}

/// Filter for tenant-scoped transactional data (mail records).
///
/// A super admin may pass `requested` to focus one team's data and defaults
/// to unrestricted otherwise. Scoped roles ignore `requested` entirely: a
/// request parameter can never widen or redirect their scope.
pub fn team_filter(session: Option<&Session>, requested: Option<TeamId>) -> ScopeFilter {
    let Some(session) = session else {
        return ScopeFilter::deny_all();
    };

    match (session.role, session.team_id) {
        (Role::SuperAdmin, _) => match requested {
            Some(team_id) => ScopeFilter::ByTenant(team_id),
            None => ScopeFilter::Unrestricted,
        },
        (Role::Admin | Role::Clerk, Some(team_id)) => ScopeFilter::ByTenant(team_id),
        (Role::Admin | Role::Clerk, None) => ScopeFilter::ByOwner(session.user_id),
    }
}

/// Filter for reference/master data (offices, modes, couriers,
/// correspondents).
///
/// Same tenant logic as [`base_filter`], except a team-less scoped user gets
/// the deny-all filter instead of owner scope: they see zero master rows
/// rather than the global set. This asymmetry with `base_filter` is
/// long-standing upstream behavior and is preserved exactly.
pub fn master_filter(session: Option<&Session>) -> ScopeFilter {
    let Some(session) = session else {
        return ScopeFilter::deny_all();
    };

    match (session.role, session.team_id) {
        (Role::SuperAdmin, _) => ScopeFilter::Unrestricted,
        (Role::Admin | Role::Clerk, Some(team_id)) => ScopeFilter::ByTenant(team_id),
        (Role::Admin | Role::Clerk, None) => ScopeFilter::deny_all(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role, team_id: Option<i64>) -> Session {
        Session {
            user_id: UserId::from(10),
            identity: "tester".to_string(),
            role,
            team_id: team_id.map(TeamId::from),
        }
    }

    #[test]
    fn test_super_admin_is_unrestricted_everywhere() {
        let s = session(Role::SuperAdmin, None);
        assert_eq!(base_filter(Some(&s)), ScopeFilter::Unrestricted);
        assert_eq!(team_filter(Some(&s), None), ScopeFilter::Unrestricted);
        assert_eq!(master_filter(Some(&s)), ScopeFilter::Unrestricted);
    }

    #[test]
    fn test_super_admin_may_focus_a_team() {
        let s = session(Role::SuperAdmin, None);
        assert_eq!(
            team_filter(Some(&s), Some(TeamId::from(5))),
            ScopeFilter::ByTenant(TeamId::from(5))
        );
    }

    #[test]
    fn test_scoped_roles_locked_to_own_team() {
        for role in [Role::Admin, Role::Clerk] {
            let s = session(role, Some(3));
            let expected = ScopeFilter::ByTenant(TeamId::from(3));
            assert_eq!(base_filter(Some(&s)), expected);
            assert_eq!(team_filter(Some(&s), None), expected);
            assert_eq!(master_filter(Some(&s)), expected);
        }
    }

    #[test]
    fn test_requested_team_ignored_for_scoped_roles() {
        let s = session(Role::Admin, Some(3));
        assert_eq!(
            team_filter(Some(&s), Some(TeamId::from(5))),
            ScopeFilter::ByTenant(TeamId::from(3))
        );

        // Even a team-less clerk cannot redirect scope via the parameter.
        let s = session(Role::Clerk, None);
        assert_eq!(
            team_filter(Some(&s), Some(TeamId::from(5))),
            ScopeFilter::ByOwner(UserId::from(10))
        );
    }

    #[test]
    fn test_team_less_base_falls_back_to_owner() {
        for role in [Role::Admin, Role::Clerk] {
            let s = session(role, None);
            assert_eq!(base_filter(Some(&s)), ScopeFilter::ByOwner(UserId::from(10)));
        }
    }

    #[test]
    fn test_team_less_master_matches_nothing() {
        for role in [Role::Admin, Role::Clerk] {
            let s = session(role, None);
            let filter = master_filter(Some(&s));
            assert!(filter.is_deny_all());
            // Specifically not the caller's own rows.
            assert_ne!(filter, ScopeFilter::ByOwner(UserId::from(10)));
        }
    }

    #[test]
    fn test_absent_session_denies_everything() {
        assert!(base_filter(None).is_deny_all());
        assert!(team_filter(None, None).is_deny_all());
        assert!(team_filter(None, Some(TeamId::from(1))).is_deny_all());
        assert!(master_filter(None).is_deny_all());
    }

    #[test]
    fn test_deny_all_is_never_unrestricted() {
        assert_ne!(ScopeFilter::deny_all(), ScopeFilter::Unrestricted);
        assert!(!ScopeFilter::Unrestricted.is_deny_all());
    }

    #[test]
    fn test_push_sql_appends_expected_predicates() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM mails WHERE 1=1");
        ScopeFilter::ByTenant(TeamId::from(4)).push_sql(&mut qb, "team_id", "created_by");
        assert!(qb.sql().contains("AND team_id = "));

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM mails WHERE 1=1");
        ScopeFilter::ByOwner(UserId::from(9)).push_sql(&mut qb, "team_id", "created_by");
        assert!(qb.sql().contains("AND created_by = "));

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM mails WHERE 1=1");
        ScopeFilter::Unrestricted.push_sql(&mut qb, "team_id", "created_by");
        assert_eq!(qb.sql(), "SELECT * FROM mails WHERE 1=1");
    }
}
