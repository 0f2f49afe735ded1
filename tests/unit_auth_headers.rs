use axum::http::{HeaderMap, HeaderValue, header};

use dakbook::middleware::auth::{session_from_headers, token_from_headers};
use dakbook_auth::create_token;
use dakbook_config::JwtConfig;
use dakbook_models::roles::Role;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        token_expiry: 3600,
        cookie_name: "dakbook_token".to_string(),
        cookie_secure: false,
    }
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

fn cookie(name: &str, token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("{name}={token}")).unwrap()
}

#[test]
fn test_token_from_bearer_header() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, bearer("abc123"));

    assert_eq!(
        token_from_headers(&headers, "dakbook_token"),
        Some("abc123".to_string())
    );
}

#[test]
fn test_token_from_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, cookie("dakbook_token", "xyz789"));

    assert_eq!(
        token_from_headers(&headers, "dakbook_token"),
        Some("xyz789".to_string())
    );
}

#[test]
fn test_bearer_wins_over_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, bearer("from-header"));
    headers.insert(header::COOKIE, cookie("dakbook_token", "from-cookie"));

    assert_eq!(
        token_from_headers(&headers, "dakbook_token"),
        Some("from-header".to_string())
    );
}

#[test]
fn test_no_credential_yields_none() {
    assert_eq!(token_from_headers(&HeaderMap::new(), "dakbook_token"), None);

    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, cookie("other_cookie", "value"));
    assert_eq!(token_from_headers(&headers, "dakbook_token"), None);
}

#[test]
fn test_session_from_valid_token() {
    let jwt_config = get_test_jwt_config();
    let token = create_token(42, "clerk1", "clerk", Some(7), &jwt_config).unwrap();

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, bearer(&token));

    let session = session_from_headers(&headers, &jwt_config).unwrap();
    assert_eq!(session.user_id.into_inner(), 42);
    assert_eq!(session.identity, "clerk1");
    assert_eq!(session.role, Role::Clerk);
    assert_eq!(session.team_id.map(|t| t.into_inner()), Some(7));
}

#[test]
fn test_session_from_cookie_token() {
    let jwt_config = get_test_jwt_config();
    let token = create_token(3, "admin1", "admin", None, &jwt_config).unwrap();

    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, cookie("dakbook_token", &token));

    let session = session_from_headers(&headers, &jwt_config).unwrap();
    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.team_id, None);
}

#[test]
fn test_session_rejects_garbage_token() {
    let jwt_config = get_test_jwt_config();

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, bearer("not.a.token"));

    assert!(session_from_headers(&headers, &jwt_config).is_none());
}

#[test]
fn test_session_rejects_foreign_signature() {
    let issuing_config = get_test_jwt_config();
    let token = create_token(1, "admin1", "admin", Some(1), &issuing_config).unwrap();

    let verifying_config = JwtConfig {
        secret: "a_completely_different_secret".to_string(),
        ..get_test_jwt_config()
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, bearer(&token));

    assert!(session_from_headers(&headers, &verifying_config).is_none());
}
