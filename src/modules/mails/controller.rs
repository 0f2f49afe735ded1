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
use dakbook_models::ids::MailId;
use dakbook_models::mails::{
    BulkDeleteMailsDto, CreateMailDto, Mail, MailFilterParams, PaginatedMailsResponse,
    UpdateMailDto,
};

use crate::audit::{self, RequestMeta, snapshot};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

use super::service::MailService;

#[utoipa::path(
    get,
    path = "/api/mails",
    params(MailFilterParams),
    responses(
        (status = 200, description = "Page of mail records", body = PaginatedMailsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Mails",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn list_mails(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<MailFilterParams>,
) -> Result<Json<PaginatedMailsResponse>, AppError> {
    // team_id is honored for super admins only; everyone else is pinned to
    // their own scope inside team_filter.
    let filter = scope::team_filter(Some(&auth_user.0), params.team_id);

    let page = MailService::list(&state.db, &filter, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/mails/{id}",
    params(("id" = i64, Path, description = "Mail record ID")),
    responses(
        (status = 200, description = "Mail record", body = Mail),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or out of scope")
    ),
    tag = "Mails",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_mail(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<MailId>,
) -> Result<Json<Mail>, AppError> {
    let filter = scope::team_filter(Some(&auth_user.0), None);
    let mail = MailService::get(&state.db, id, &filter).await?;
    Ok(Json(mail))
}

#[utoipa::path(
    post,
    path = "/api/mails",
    request_body = CreateMailDto,
    responses(
        (status = 201, description = "Mail record registered", body = Mail),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Mails",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_mail(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Json(dto): Json<CreateMailDto>,
) -> Result<(StatusCode, Json<Mail>), AppError> {
    dto.validate()?;

    let result = MailService::create(&state.db, &auth_user.0, dto).await;

    match &result {
        Ok(mail) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::create("mails", mail.id, snapshot(mail)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash("mails", e.to_string()),
            )
            .await;
        }
    }

    result.map(|mail| (StatusCode::CREATED, Json(mail)))
}

#[utoipa::path(
    put,
    path = "/api/mails/{id}",
    params(("id" = i64, Path, description = "Mail record ID")),
    request_body = UpdateMailDto,
    responses(
        (status = 200, description = "Mail record updated", body = Mail),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or out of scope")
    ),
    tag = "Mails",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_mail(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Path(id): Path<MailId>,
    Json(dto): Json<UpdateMailDto>,
) -> Result<Json<Mail>, AppError> {
    dto.validate()?;

    let filter = scope::team_filter(Some(&auth_user.0), None);

    // Snapshot strictly before the mutation; re-reading afterwards is not
    // consistent under concurrent writers.
    let before = MailService::get(&state.db, id, &filter).await?;

    let result = MailService::update(&state.db, id, &filter, &before, dto).await;

    match &result {
        Ok(after) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::update("mails", id, snapshot(&before), snapshot(after)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash("mails", e.to_string()).with_record_id(id),
            )
            .await;
        }
    }

    result.map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/mails/{id}",
    params(("id" = i64, Path, description = "Mail record ID")),
    responses(
        (status = 200, description = "Mail record deleted", body = Mail),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or out of scope")
    ),
    tag = "Mails",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_mail(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Path(id): Path<MailId>,
) -> Result<Json<Mail>, AppError> {
    let filter = scope::team_filter(Some(&auth_user.0), None);

    let result = MailService::delete(&state.db, id, &filter).await;

    match &result {
        Ok(before) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::delete("mails", id, snapshot(before)),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash("mails", e.to_string()).with_record_id(id),
            )
            .await;
        }
    }

    result.map(Json)
}

#[utoipa::path(
    post,
    path = "/api/mails/delete-many",
    request_body = BulkDeleteMailsDto,
    responses(
        (status = 200, description = "Bulk delete completed"),
        (status = 400, description = "Empty id list"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Mails",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn delete_many_mails(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
    Json(dto): Json<BulkDeleteMailsDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    dto.validate()?;

    let filter = scope::team_filter(Some(&auth_user.0), None);

    let result = MailService::delete_many(&state.db, &dto.ids, &filter).await;

    // One aggregate audit row per bulk operation, never one per record.
    match &result {
        Ok(deleted) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::bulk_delete("mails", *deleted),
            )
            .await;
        }
        Err(e) => {
            audit::record(
                &state.db,
                Some(&auth_user.0),
                &meta,
                AuditEvent::crash("mails", e.to_string()),
            )
            .await;
        }
    }

    result.map(|deleted| Json(serde_json::json!({ "deleted": deleted })))
}
