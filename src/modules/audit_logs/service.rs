use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use dakbook_auth::ScopeFilter;
use dakbook_core::{AppError, PaginationMeta};
use dakbook_models::audit::{AuditLog, AuditLogFilterParams, PaginatedAuditLogsResponse};

const AUDIT_COLUMNS: &str = "id, table_name, record_id, action, user_id, team_id, \
     before, after, ip_address, user_agent, details, created_at";

fn push_list_predicates(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &ScopeFilter,
    params: &AuditLogFilterParams,
) {
    if let Some(table) = params.table.as_deref().filter(|t| !t.is_empty()) {
        qb.push(" AND table_name = ");
        qb.push_bind(table.to_string());
    }

    if let Some(action) = params.action.as_deref().filter(|a| !a.is_empty()) {
        qb.push(" AND action = ");
        qb.push_bind(action.to_lowercase());
    }

    // For audit rows the owner is the acting user, not a creator column.
    filter.push_sql(qb, "team_id", "user_id");
}

/// Read-only access to the trail. Nothing in the application updates or
/// deletes audit rows.
pub struct AuditLogService;

impl AuditLogService {
    #[instrument(skip(db, filter, params))]
    pub async fn list(
        db: &PgPool,
        filter: &ScopeFilter,
        params: &AuditLogFilterParams,
    ) -> Result<PaginatedAuditLogsResponse, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM audit_logs WHERE 1=1");
        push_list_predicates(&mut qb, filter, params);
        let total: i64 = qb.build_query_scalar().fetch_one(db).await?;

        let mut qb =
            QueryBuilder::new(format!("SELECT {AUDIT_COLUMNS} FROM audit_logs WHERE 1=1"));
        push_list_predicates(&mut qb, filter, params);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(params.pagination.limit());
        qb.push(" OFFSET ");
        qb.push_bind(params.pagination.offset());

        let data = qb.build_query_as::<AuditLog>().fetch_all(db).await?;

        Ok(PaginatedAuditLogsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }
}
