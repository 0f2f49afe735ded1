use axum::{Json, extract::State};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use tracing::instrument;
use validator::Validate;

use dakbook_config::JwtConfig;
use dakbook_core::AppError;
use dakbook_models::audit::AuditEvent;
use dakbook_models::users::User;

use crate::audit::{self, RequestMeta};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

use super::model::{LoginOutcome, LoginRequest, LoginResponse};
use super::service::AuthService;

fn auth_cookie(jwt_config: &JwtConfig, token: String) -> Cookie<'static> {
    // Non-HttpOnly so the frontend can mirror the token into its API
    // client; SameSite=Strict limits the exposure. The cookie expires
    // together with the token it carries.
    Cookie::build((jwt_config.cookie_name.clone(), token))
        .path("/")
        .same_site(SameSite::Strict)
        .secure(jwt_config.cookie_secure)
        .http_only(false)
        .max_age(time::Duration::seconds(jwt_config.token_expiry))
        .build()
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials or inactive account")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    meta: RequestMeta,
    jar: CookieJar,
    Json(dto): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    dto.validate()?;

    // Every attempt is audited before any session exists, so the actor is
    // the target account (when known), not a verified session.
    match AuthService::login(&state.db, &dto, &state.jwt_config).await? {
        LoginOutcome::Success { token, user } => {
            audit::record(
                &state.db,
                None,
                &meta,
                AuditEvent::login("login success")
                    .with_record_id(user.id)
                    .with_actor(Some(user.id), user.team_id),
            )
            .await;

            let jar = jar.add(auth_cookie(&state.jwt_config, token.clone()));
            Ok((jar, Json(LoginResponse { token, user })))
        }
        LoginOutcome::BadCredentials { user } => {
            let event = match &user {
                Some(user) => AuditEvent::login("bad credentials")
                    .with_record_id(user.id)
                    .with_actor(Some(user.id), user.team_id),
                None => AuditEvent::login("bad credentials: unknown account")
                    .with_actor(None, None),
            };
            audit::record(&state.db, None, &meta, event).await;

            Err(AppError::unauthorized("Invalid username or password"))
        }
        LoginOutcome::Inactive { user } => {
            audit::record(
                &state.db,
                None,
                &meta,
                AuditEvent::login("inactive account")
                    .with_record_id(user.id)
                    .with_actor(Some(user.id), user.team_id),
            )
            .await;

            Err(AppError::unauthorized("Account is inactive"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = AuthService::get_user(&state.db, auth_user.user_id()).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), AppError> {
    audit::record(
        &state.db,
        Some(&auth_user.0),
        &meta,
        AuditEvent::access("users", "logout").with_record_id(auth_user.user_id()),
    )
    .await;

    // Removal must carry the same path the login cookie was set with.
    let jar = jar.remove(
        Cookie::build(state.jwt_config.cookie_name.clone())
            .path("/")
            .build(),
    );
    Ok((jar, Json(json!({ "message": "Logged out" }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_for_testing_purposes".to_string(),
            token_expiry: 28800,
            cookie_name: "dakbook_token".to_string(),
            cookie_secure: false,
        }
    }

    #[test]
    fn test_auth_cookie_expires_with_the_token() {
        let cookie = auth_cookie(&test_jwt_config(), "tok".to_string());
        assert_eq!(cookie.name(), "dakbook_token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(28800)));
    }

    #[test]
    fn test_auth_cookie_secure_flag_follows_config() {
        let config = JwtConfig {
            cookie_secure: true,
            ..test_jwt_config()
        };
        assert_eq!(auth_cookie(&config, "tok".to_string()).secure(), Some(true));
    }
}
