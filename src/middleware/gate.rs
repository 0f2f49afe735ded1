//! The route gate: browser-facing page protection.
//!
//! Runs before any page handler. Unauthenticated requests to protected
//! paths are redirected to the login entry point; the login page with an
//! already-valid credential bounces to the landing page (a convenience, not
//! a security boundary); the root path is a zero-logic dispatcher.
//!
//! The gate only decides pass/redirect. It does not inject session state:
//! handlers behind it re-resolve their own session and scope filter. API
//! routes under `/api` are not gated here; the `AuthUser` extractor answers
//! 401 for those instead.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::middleware::auth::session_from_headers;
use crate::state::AppState;

/// Path prefixes that require a valid credential.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard"];

const LOGIN_PATH: &str = "/login";
const LANDING_PATH: &str = "/dashboard";

/// Whether `path` falls under a protected prefix.
pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

/// Pure gate decision: `Some(target)` to redirect, `None` to pass through.
pub fn gate_decision(path: &str, authenticated: bool) -> Option<&'static str> {
    if path == "/" {
        return Some(if authenticated { LANDING_PATH } else { LOGIN_PATH });
    }

    if path == LOGIN_PATH && authenticated {
        return Some(LANDING_PATH);
    }

    if is_protected(path) && !authenticated {
        return Some(LOGIN_PATH);
    }

    None
}

pub async fn route_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let authenticated = session_from_headers(req.headers(), &state.jwt_config).is_some();

    match gate_decision(req.uri().path(), authenticated) {
        Some(target) => Redirect::to(target).into_response(),
        None => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_prefix_matching() {
        assert!(is_protected("/dashboard"));
        assert!(is_protected("/dashboard/mails"));
        assert!(!is_protected("/dashboards"));
        assert!(!is_protected("/login"));
        assert!(!is_protected("/api/mails"));
    }

    #[test]
    fn test_root_dispatch() {
        assert_eq!(gate_decision("/", false), Some("/login"));
        assert_eq!(gate_decision("/", true), Some("/dashboard"));
    }

    #[test]
    fn test_login_convenience_redirect() {
        assert_eq!(gate_decision("/login", true), Some("/dashboard"));
        assert_eq!(gate_decision("/login", false), None);
    }

    #[test]
    fn test_protected_requires_credential() {
        assert_eq!(gate_decision("/dashboard", false), Some("/login"));
        assert_eq!(gate_decision("/dashboard", true), None);
        assert_eq!(gate_decision("/dashboard/anything", false), Some("/login"));
    }

    #[test]
    fn test_api_paths_pass_through() {
        // API routes answer 401 themselves; the gate never redirects them.
        assert_eq!(gate_decision("/api/mails", false), None);
        assert_eq!(gate_decision("/api/auth/login", false), None);
    }
}
