use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use validator::Validate;

use dakbook_core::AppError;
use dakbook_models::audit::AuditEvent;
use dakbook_models::ids::TeamId;
use dakbook_models::teams::{
    CreateTeamDto, PaginatedTeamsResponse, Team, TeamFilterParams, UpdateTeamDto,
};

use crate::audit::{self, RequestMeta, snapshot};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

use super::service::TeamService;

#[utoipa::path(
    get,
    path = "/api/teams",
    params(TeamFilterParams),
    responses(
        (status = 200, description = "Page of teams", body = PaginatedTeamsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Super admin only")
    ),
    tag = "Teams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(params): Query<TeamFilterParams>,
) -> Result<Json<PaginatedTeamsResponse>, AppError> {
    let page = TeamService::list(&state.db, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    params(("id" = i64, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team", body = Team),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Super admin only"),
        (status = 404, description = "Not found")
    ),
    tag = "Teams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<TeamId>,
) -> Result<Json<Team>, AppError> {
    let team = TeamService::get(&state.db, id).await?;
    Ok(Json(team))
}

#[utoipa::path(
    post,
    path = "/api/teams",
    request_body = CreateTeamDto,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 400, description = "Invalid input or duplicate name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Super admin only")
    ),
    tag = "Teams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_team(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Json(dto): Json<CreateTeamDto>,
) -> Result<(StatusCode, Json<Team>), AppError> {
    dto.validate()?;

    let result = TeamService::create(&state.db, dto).await;

    match &result {
        Ok(team) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::create("teams", team.id, snapshot(team)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash("teams", e.to_string()),
            )
            .await;
        }
    }

    result.map(|team| (StatusCode::CREATED, Json(team)))
}

#[utoipa::path(
    put,
    path = "/api/teams/{id}",
    params(("id" = i64, Path, description = "Team ID")),
    request_body = UpdateTeamDto,
    responses(
        (status = 200, description = "Team updated", body = Team),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Super admin only"),
        (status = 404, description = "Not found")
    ),
    tag = "Teams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_team(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Path(id): Path<TeamId>,
    Json(dto): Json<UpdateTeamDto>,
) -> Result<Json<Team>, AppError> {
    dto.validate()?;

    let before = TeamService::get(&state.db, id).await?;

    let result = TeamService::update(&state.db, id, &before, dto).await;

    match &result {
        Ok(after) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::update("teams", id, snapshot(&before), snapshot(after)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash("teams", e.to_string()).with_record_id(id),
            )
            .await;
        }
    }

    result.map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    params(("id" = i64, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team deleted", body = Team),
        (status = 400, description = "Team still has users or records"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Super admin only"),
        (status = 404, description = "Not found")
    ),
    tag = "Teams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_team(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Path(id): Path<TeamId>,
) -> Result<Json<Team>, AppError> {
    let result = TeamService::delete(&state.db, id).await;

    match &result {
        Ok(before) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::delete("teams", id, snapshot(before)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash("teams", e.to_string()).with_record_id(id),
            )
            .await;
        }
    }

    result.map(Json)
}
