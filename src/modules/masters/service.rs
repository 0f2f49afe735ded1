use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use dakbook_auth::ScopeFilter;
use dakbook_auth::session::Session;
use dakbook_core::{AppError, PaginationMeta};
use dakbook_models::ids::MasterId;
use dakbook_models::masters::{
    CreateMasterDto, MasterFilterParams, MasterKind, MasterRecord, PaginatedMastersResponse,
    UpdateMasterDto,
};

const MASTER_COLUMNS: &str = "id, name, team_id, created_by, created_at, updated_at";

fn push_list_predicates(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &ScopeFilter,
    params: &MasterFilterParams,
) {
    if let Some(q) = params.q.as_deref().filter(|q| !q.is_empty()) {
        qb.push(" AND name ILIKE ");
        qb.push_bind(format!("%{q}%"));
    }

    filter.push_sql(qb, "team_id", "created_by");
}

/// CRUD over the four structurally-identical master tables. The table name
/// comes from [`MasterKind::table`], never from request input directly.
pub struct MasterService;

impl MasterService {
    #[instrument(skip(db, filter, params))]
    pub async fn list(
        db: &PgPool,
        kind: MasterKind,
        filter: &ScopeFilter,
        params: &MasterFilterParams,
    ) -> Result<PaginatedMastersResponse, AppError> {
        let table = kind.table();

        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table} WHERE 1=1"));
        push_list_predicates(&mut qb, filter, params);
        let total: i64 = qb.build_query_scalar().fetch_one(db).await?;

        let mut qb =
            QueryBuilder::new(format!("SELECT {MASTER_COLUMNS} FROM {table} WHERE 1=1"));
        push_list_predicates(&mut qb, filter, params);
        qb.push(" ORDER BY name ASC LIMIT ");
        qb.push_bind(params.pagination.limit());
        qb.push(" OFFSET ");
        qb.push_bind(params.pagination.offset());

        let data = qb.build_query_as::<MasterRecord>().fetch_all(db).await?;

        Ok(PaginatedMastersResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    #[instrument(skip(db, filter))]
    pub async fn get(
        db: &PgPool,
        kind: MasterKind,
        id: MasterId,
        filter: &ScopeFilter,
    ) -> Result<MasterRecord, AppError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {MASTER_COLUMNS} FROM {} WHERE id = ",
            kind.table()
        ));
        qb.push_bind(id);
        filter.push_sql(&mut qb, "team_id", "created_by");

        qb.build_query_as::<MasterRecord>()
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("{kind} record not found")))
    }

    #[instrument(skip(db, session, dto))]
    pub async fn create(
        db: &PgPool,
        kind: MasterKind,
        session: &Session,
        dto: CreateMasterDto,
    ) -> Result<MasterRecord, AppError> {
        sqlx::query_as::<_, MasterRecord>(&format!(
            "INSERT INTO {} (name, team_id, created_by) VALUES ($1, $2, $3) \
             RETURNING {MASTER_COLUMNS}",
            kind.table()
        ))
        .bind(&dto.name)
        .bind(session.team_id)
        .bind(session.user_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A {kind} record with this name already exists"
                    ));
                }
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(db, filter, dto))]
    pub async fn update(
        db: &PgPool,
        kind: MasterKind,
        id: MasterId,
        filter: &ScopeFilter,
        dto: UpdateMasterDto,
    ) -> Result<MasterRecord, AppError> {
        let mut qb = QueryBuilder::new(format!("UPDATE {} SET name = ", kind.table()));
        qb.push_bind(&dto.name);
        qb.push(", updated_at = now() WHERE id = ");
        qb.push_bind(id);
        filter.push_sql(&mut qb, "team_id", "created_by");
        qb.push(format!(" RETURNING {MASTER_COLUMNS}"));

        qb.build_query_as::<MasterRecord>()
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("{kind} record not found")))
    }

    /// Deletes a scoped record, returning the deleted row for the audit
    /// snapshot. Rows still referenced from mails fail with 400.
    #[instrument(skip(db, filter))]
    pub async fn delete(
        db: &PgPool,
        kind: MasterKind,
        id: MasterId,
        filter: &ScopeFilter,
    ) -> Result<MasterRecord, AppError> {
        let mut qb = QueryBuilder::new(format!("DELETE FROM {} WHERE id = ", kind.table()));
        qb.push_bind(id);
        filter.push_sql(&mut qb, "team_id", "created_by");
        qb.push(format!(" RETURNING {MASTER_COLUMNS}"));

        qb.build_query_as::<MasterRecord>()
            .fetch_optional(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::bad_request(anyhow::anyhow!(
                            "This {kind} record is referenced by existing mail records"
                        ));
                    }
                }
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("{kind} record not found")))
    }
}
