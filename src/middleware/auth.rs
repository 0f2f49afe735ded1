use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use dakbook_auth::{resolve_session, verify_token};
use dakbook_auth::session::Session;
use dakbook_config::JwtConfig;
use dakbook_core::AppError;
use dakbook_models::ids::{TeamId, UserId};
use dakbook_models::roles::Role;

use crate::state::AppState;

/// Pulls the raw credential out of the request headers: the bearer header
/// wins, then the auth cookie.
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Some(token) = value.to_str().ok().and_then(|v| v.strip_prefix("Bearer ")) {
            return Some(token.to_string());
        }
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
}

/// Verifies the credential in `headers` and resolves it into a session.
/// Used by the route gate, which needs validity without a rejection.
pub fn session_from_headers(headers: &HeaderMap, jwt_config: &JwtConfig) -> Option<Session> {
    let token = token_from_headers(headers, &jwt_config.cookie_name)?;
    let claims = verify_token(&token, jwt_config).ok()?;
    resolve_session(&claims)
}

/// Extractor that validates the credential and provides the authenticated
/// session. Rejects with 401 when the credential is missing, invalid,
/// expired, or resolves to no principal.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Session);

impl AuthUser {
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.0.team_id
    }

    pub fn identity(&self) -> &str {
        &self.0.identity
    }

    /// Normalized-role comparison for handler-level gating.
    pub fn has_min_role(&self, minimum: Role) -> bool {
        self.0.role.at_least(minimum)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers, &state.jwt_config.cookie_name)
            .ok_or_else(|| AppError::unauthorized("Missing credentials"))?;

        let claims = verify_token(&token, &state.jwt_config)?;

        let session = resolve_session(&claims)
            .ok_or_else(|| AppError::unauthorized("Invalid session claims"))?;

        Ok(AuthUser(session))
    }
}

/// Extractor that never rejects: `None` when the request carries no valid
/// credential. Used where unauthenticated requests are still processed
/// (login auditing, the route gate's page handlers).
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(session_from_headers(
            &parts.headers,
            &state.jwt_config,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use dakbook_auth::create_token;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            token_expiry: 3600,
            cookie_name: "dakbook_token".to_string(),
            cookie_secure: false,
        }
    }

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("dakbook_token=from-cookie"),
        );

        assert_eq!(
            token_from_headers(&headers, "dakbook_token").as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("other=x; dakbook_token=from-cookie"),
        );

        assert_eq!(
            token_from_headers(&headers, "dakbook_token").as_deref(),
            Some("from-cookie")
        );
    }

    #[test]
    fn test_no_credential() {
        let headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers, "dakbook_token"), None);
    }

    #[test]
    fn test_session_from_headers_round_trip() {
        let config = test_config();
        let token = create_token(9, "clerk01", "clerk", Some(2), &config).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let session = session_from_headers(&headers, &config).unwrap();
        assert_eq!(session.user_id, UserId::from(9));
        assert_eq!(session.role, Role::Clerk);
        assert_eq!(session.team_id, Some(TeamId::from(2)));
    }

    #[test]
    fn test_session_from_headers_rejects_bad_token() {
        let config = test_config();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer garbage"),
        );
        assert!(session_from_headers(&headers, &config).is_none());
    }
}
