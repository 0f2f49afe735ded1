use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use validator::Validate;

use dakbook_auth::scope;
use dakbook_core::AppError;
use dakbook_models::audit::AuditEvent;
use dakbook_models::ids::UserId;
use dakbook_models::users::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams,
};

use crate::audit::{self, RequestMeta, snapshot};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

use super::service::UserService;

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Page of users", body = PaginatedUsersResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let filter = scope::team_filter(Some(&auth_user.0), params.team_id);

    let page = UserService::list(&state.db, &filter, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found or out of scope")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    let filter = scope::team_filter(Some(&auth_user.0), None);
    let user = UserService::get(&state.db, id, &filter).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input or duplicate username/email"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Json(dto): Json<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    dto.validate()?;

    let result = UserService::create(&state.db, &auth_user.0, dto).await;

    match &result {
        Ok(user) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::create("users", user.id, snapshot(user)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash("users", e.to_string()),
            )
            .await;
        }
    }

    result.map(|user| (StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found or out of scope")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Path(id): Path<UserId>,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    dto.validate()?;

    let filter = scope::team_filter(Some(&auth_user.0), None);
    let before = UserService::get(&state.db, id, &filter).await?;

    let result = UserService::update(&state.db, &auth_user.0, id, &filter, &before, dto).await;

    match &result {
        Ok(after) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::update("users", id, snapshot(&before), snapshot(after)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash("users", e.to_string()).with_record_id(id),
            )
            .await;
        }
    }

    result.map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = User),
        (status = 400, description = "Cannot delete yourself or a referenced user"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found or out of scope")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    if id == auth_user.user_id() {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Cannot delete your own account"
        )));
    }

    let filter = scope::team_filter(Some(&auth_user.0), None);

    let result = UserService::delete(&state.db, id, &filter).await;

    match &result {
        Ok(before) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::delete("users", id, snapshot(before)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash("users", e.to_string()).with_record_id(id),
            )
            .await;
        }
    }

    result.map(Json)
}
