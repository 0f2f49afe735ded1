//! Session resolution: raw claims to a canonical per-request identity.
//!
//! A [`Session`] is derived fresh on every request from a verified credential
//! and discarded with it; nothing here is cached server-side.

use dakbook_models::ids::{TeamId, UserId};
use dakbook_models::roles::Role;

use crate::claims::{Claims, IDENTITY_KEYS, ROLE_KEYS, TEAM_ID_KEYS, USER_ID_KEYS};

/// The authenticated identity for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub identity: String,
    pub role: Role,
    pub team_id: Option<TeamId>,
}

/// Normalizes verified claims into a [`Session`].
///
/// Returns `None` when the claims cannot name a principal: no parseable user
/// id, or a role string outside the known hierarchy. Callers treat `None` as
/// unauthenticated.
///
/// A present but non-numeric tenant claim resolves to no tenant rather than
/// rejecting the session; the session then lands in owner scope (or deny-all
/// for master data), so the fallback narrows access. Tokens issued before
/// the identity claim existed resolve with an empty identity string.
pub fn resolve_session(claims: &Claims) -> Option<Session> {
    let user_id = claims.first_i64(USER_ID_KEYS)?;

    let role = Role::parse(claims.first_str(ROLE_KEYS)?)?;

    let identity = claims
        .first_str(IDENTITY_KEYS)
        .unwrap_or_default()
        .to_string();

    let team_id = claims.first_i64(TEAM_ID_KEYS).map(TeamId::from);

    Some(Session {
        user_id: UserId::from(user_id),
        identity,
        role,
        team_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(v: serde_json::Value) -> Claims {
        Claims(v.as_object().unwrap().clone())
    }

    #[test]
    fn test_resolves_canonical_claims() {
        let session = resolve_session(&claims(json!({
            "userId": 8,
            "username": "desk.clerk",
            "role": "clerk",
            "teamId": 2,
        })))
        .unwrap();

        assert_eq!(session.user_id, UserId::from(8));
        assert_eq!(session.identity, "desk.clerk");
        assert_eq!(session.role, Role::Clerk);
        assert_eq!(session.team_id, Some(TeamId::from(2)));
    }

    #[test]
    fn test_alias_keys_resolve_to_same_session() {
        let a = resolve_session(&claims(json!({
            "userId": 8, "username": "x", "role": "admin", "teamId": 7,
        })))
        .unwrap();
        let b = resolve_session(&claims(json!({
            "UserID": 8, "email": "x", "Role": "admin", "TeamID": 7,
        })))
        .unwrap();
        let c = resolve_session(&claims(json!({
            "sub": "8", "Name": "x", "role": "Admin", "team_id": "7",
        })))
        .unwrap();

        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_role_normalization_applies() {
        let session = resolve_session(&claims(json!({
            "userId": 1, "username": "root", "role": "Super Admin",
        })))
        .unwrap();
        assert_eq!(session.role, Role::SuperAdmin);
    }

    #[test]
    fn test_missing_user_id_means_no_session() {
        assert!(resolve_session(&claims(json!({
            "username": "ghost", "role": "admin",
        })))
        .is_none());
    }

    #[test]
    fn test_unknown_role_means_no_session() {
        assert!(resolve_session(&claims(json!({
            "userId": 1, "username": "x", "role": "superuser",
        })))
        .is_none());
    }

    #[test]
    fn test_malformed_team_id_drops_to_no_tenant() {
        let session = resolve_session(&claims(json!({
            "userId": 5, "username": "x", "role": "clerk", "teamId": "???",
        })))
        .unwrap();
        assert_eq!(session.team_id, None);
    }

    #[test]
    fn test_empty_team_id_is_no_tenant() {
        let session = resolve_session(&claims(json!({
            "userId": 5, "username": "x", "role": "clerk", "teamId": "",
        })))
        .unwrap();
        assert_eq!(session.team_id, None);
    }

    #[test]
    fn test_missing_identity_falls_back_to_empty() {
        let session = resolve_session(&claims(json!({
            "userId": 5, "role": "clerk",
        })))
        .unwrap();
        assert_eq!(session.identity, "");
    }
}
