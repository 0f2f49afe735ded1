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
use dakbook_models::ids::MasterId;
use dakbook_models::masters::{
    CreateMasterDto, MasterFilterParams, MasterKind, MasterRecord, PaginatedMastersResponse,
    UpdateMasterDto,
};
use dakbook_models::roles::Role;

use crate::audit::{self, RequestMeta, snapshot};
use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_min_role;
use crate::state::AppState;

use super::service::MasterService;

/// Unknown kinds read as 404, the same as an unknown route.
fn parse_kind(raw: &str) -> Result<MasterKind, AppError> {
    MasterKind::parse(raw)
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Unknown master type '{raw}'")))
}

#[utoipa::path(
    get,
    path = "/api/masters/{kind}",
    params(
        ("kind" = String, Path, description = "offices | modes | couriers | correspondents"),
        MasterFilterParams
    ),
    responses(
        (status = 200, description = "Page of master records", body = PaginatedMastersResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown master type")
    ),
    tag = "Masters",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn list_masters(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(kind): Path<String>,
    Query(params): Query<MasterFilterParams>,
) -> Result<Json<PaginatedMastersResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    let filter = scope::master_filter(Some(&auth_user.0));

    let page = MasterService::list(&state.db, kind, &filter, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/masters/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "offices | modes | couriers | correspondents"),
        ("id" = i64, Path, description = "Master record ID")
    ),
    responses(
        (status = 200, description = "Master record", body = MasterRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or out of scope")
    ),
    tag = "Masters",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_master(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((kind, id)): Path<(String, MasterId)>,
) -> Result<Json<MasterRecord>, AppError> {
    let kind = parse_kind(&kind)?;
    let filter = scope::master_filter(Some(&auth_user.0));

    let record = MasterService::get(&state.db, kind, id, &filter).await?;
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/api/masters/{kind}",
    params(("kind" = String, Path, description = "offices | modes | couriers | correspondents")),
    request_body = CreateMasterDto,
    responses(
        (status = 201, description = "Master record created", body = MasterRecord),
        (status = 400, description = "Invalid input or duplicate name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Clerks may not manage master data"),
        (status = 404, description = "Unknown master type")
    ),
    tag = "Masters",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_master(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Path(kind): Path<String>,
    Json(dto): Json<CreateMasterDto>,
) -> Result<(StatusCode, Json<MasterRecord>), AppError> {
    let kind = parse_kind(&kind)?;
    check_min_role(&auth_user, Role::Admin)?;
    dto.validate()?;

    let result = MasterService::create(&state.db, kind, &auth_user.0, dto).await;

    match &result {
        Ok(record) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::create(kind.table(), record.id, snapshot(record)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash(kind.table(), e.to_string()),
            )
            .await;
        }
    }

    result.map(|record| (StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    put,
    path = "/api/masters/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "offices | modes | couriers | correspondents"),
        ("id" = i64, Path, description = "Master record ID")
    ),
    request_body = UpdateMasterDto,
    responses(
        (status = 200, description = "Master record updated", body = MasterRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Clerks may not manage master data"),
        (status = 404, description = "Not found or out of scope")
    ),
    tag = "Masters",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_master(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Path((kind, id)): Path<(String, MasterId)>,
    Json(dto): Json<UpdateMasterDto>,
) -> Result<Json<MasterRecord>, AppError> {
    let kind = parse_kind(&kind)?;
    check_min_role(&auth_user, Role::Admin)?;
    dto.validate()?;

    let filter = scope::master_filter(Some(&auth_user.0));
    let before = MasterService::get(&state.db, kind, id, &filter).await?;

    let result = MasterService::update(&state.db, kind, id, &filter, dto).await;

    match &result {
        Ok(after) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::update(kind.table(), id, snapshot(&before), snapshot(after)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash(kind.table(), e.to_string()).with_record_id(id),
            )
            .await;
        }
    }

    result.map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/masters/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "offices | modes | couriers | correspondents"),
        ("id" = i64, Path, description = "Master record ID")
    ),
    responses(
        (status = 200, description = "Master record deleted", body = MasterRecord),
        (status = 400, description = "Record still referenced by mail records"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Clerks may not manage master data"),
        (status = 404, description = "Not found or out of scope")
    ),
    tag = "Masters",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_master(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Path((kind, id)): Path<(String, MasterId)>,
) -> Result<Json<MasterRecord>, AppError> {
    let kind = parse_kind(&kind)?;
    check_min_role(&auth_user, Role::Admin)?;

    let filter = scope::master_filter(Some(&auth_user.0));

    let result = MasterService::delete(&state.db, kind, id, &filter).await;

    match &result {
        Ok(before) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::delete(kind.table(), id, snapshot(before)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash(kind.table(), e.to_string()).with_record_id(id),
            )
            .await;
        }
    }

    result.map(Json)
}
