//! Role-based authorization over the normalized role tag.
//!
//! Two approaches, matching how routes are wired:
//!
//! 1. Layer-based middleware (`require_admin`, `require_super_admin`) for
//!    whole route groups
//! 2. `check_min_role` for handler-level checks (e.g. "clerks may not
//!    create master records")
//!
//! All comparisons go through [`Role`]; raw role strings never reach this
//! module.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use dakbook_core::AppError;
use dakbook_models::roles::Role;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Middleware that requires the authenticated user to meet `minimum` in the
/// role hierarchy.
pub async fn require_min_role(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    minimum: Role,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !auth_user.has_min_role(minimum) {
        return Err(AppError::forbidden(format!(
            "Access denied. Minimum required role: {}, but user has role: {}",
            minimum,
            auth_user.role()
        )));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Layer for super-admin-only route groups (team management).
pub async fn require_super_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_min_role(State(state), req, next, Role::SuperAdmin).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Layer for admin-level route groups (user management).
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_min_role(State(state), req, next, Role::Admin).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Handler-level check against the role hierarchy.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn create_master(auth_user: AuthUser, ...) -> Result<_, AppError> {
///     check_min_role(&auth_user, Role::Admin)?;
///     // Clerks never reach this point.
/// }
/// ```
pub fn check_min_role(auth_user: &AuthUser, minimum: Role) -> Result<(), AppError> {
    if !auth_user.has_min_role(minimum) {
        return Err(AppError::forbidden(format!(
            "Access denied. Minimum required role: {}, but user has role: {}",
            minimum,
            auth_user.role()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dakbook_auth::session::Session;
    use dakbook_models::ids::UserId;

    fn auth_user(role: Role) -> AuthUser {
        AuthUser(Session {
            user_id: UserId::from(1),
            identity: "tester".to_string(),
            role,
            team_id: None,
        })
    }

    #[test]
    fn test_check_min_role_hierarchy() {
        assert!(check_min_role(&auth_user(Role::SuperAdmin), Role::SuperAdmin).is_ok());
        assert!(check_min_role(&auth_user(Role::SuperAdmin), Role::Clerk).is_ok());
        assert!(check_min_role(&auth_user(Role::Admin), Role::Admin).is_ok());
        assert!(check_min_role(&auth_user(Role::Admin), Role::SuperAdmin).is_err());
        assert!(check_min_role(&auth_user(Role::Clerk), Role::Admin).is_err());
        assert!(check_min_role(&auth_user(Role::Clerk), Role::Clerk).is_ok());
    }

    #[test]
    fn test_forbidden_is_403() {
        let err = check_min_role(&auth_user(Role::Clerk), Role::Admin).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}
