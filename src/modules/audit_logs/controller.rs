use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use dakbook_auth::scope;
use dakbook_core::AppError;
use dakbook_models::audit::{AuditLogFilterParams, PaginatedAuditLogsResponse};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

use super::service::AuditLogService;

#[utoipa::path(
    get,
    path = "/api/audit-logs",
    params(AuditLogFilterParams),
    responses(
        (status = 200, description = "Page of audit log entries", body = PaginatedAuditLogsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "Audit Logs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<AuditLogFilterParams>,
) -> Result<Json<PaginatedAuditLogsResponse>, AppError> {
    let filter = scope::team_filter(Some(&auth_user.0), params.team_id);

    let page = AuditLogService::list(&state.db, &filter, &params).await?;
    Ok(Json(page))
}
