use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use dakbook_auth::ScopeFilter;
use dakbook_auth::session::Session;
use dakbook_core::{AppError, PaginationMeta};
use dakbook_models::ids::MailId;
use dakbook_models::mails::{
    CreateMailDto, Mail, MailDirection, MailDirectionCount, MailFilterParams,
    PaginatedMailsResponse, UpdateMailDto,
};

const MAIL_COLUMNS: &str = "id, direction, reference_no, subject, correspondent, office_id, \
     mode_id, courier_id, mail_date, remarks, team_id, created_by, created_at, updated_at";

/// Appends the list filters and the scope predicate. Every list/count pair
/// goes through here so the two can never disagree.
fn push_list_predicates(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &ScopeFilter,
    params: &MailFilterParams,
) {
    if let Some(direction) = params.direction.as_deref().and_then(MailDirection::parse) {
        qb.push(" AND direction = ");
        qb.push_bind(direction.as_str());
    }

    if let Some(q) = params.q.as_deref().filter(|q| !q.is_empty()) {
        let pattern = format!("%{q}%");
        qb.push(" AND (subject ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR correspondent ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    filter.push_sql(qb, "team_id", "created_by");
}

pub struct MailService;

impl MailService {
    #[instrument(skip(db, filter, params))]
    pub async fn list(
        db: &PgPool,
        filter: &ScopeFilter,
        params: &MailFilterParams,
    ) -> Result<PaginatedMailsResponse, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM mails WHERE 1=1");
        push_list_predicates(&mut qb, filter, params);
        let total: i64 = qb.build_query_scalar().fetch_one(db).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {MAIL_COLUMNS} FROM mails WHERE 1=1"));
        push_list_predicates(&mut qb, filter, params);
        qb.push(" ORDER BY mail_date DESC, id DESC LIMIT ");
        qb.push_bind(params.pagination.limit());
        qb.push(" OFFSET ");
        qb.push_bind(params.pagination.offset());

        let data = qb.build_query_as::<Mail>().fetch_all(db).await?;

        Ok(PaginatedMailsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    /// Fetches one record inside the caller's scope. An id outside the
    /// scope reads as not-found; existence of out-of-scope records is never
    /// confirmed.
    #[instrument(skip(db, filter))]
    pub async fn get(db: &PgPool, id: MailId, filter: &ScopeFilter) -> Result<Mail, AppError> {
        let mut qb = QueryBuilder::new(format!("SELECT {MAIL_COLUMNS} FROM mails WHERE id = "));
        qb.push_bind(id);
        filter.push_sql(&mut qb, "team_id", "created_by");

        qb.build_query_as::<Mail>()
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Mail record not found")))
    }

    /// Registers a new record, tagged with the actor's team and identity.
    #[instrument(skip(db, session, dto))]
    pub async fn create(
        db: &PgPool,
        session: &Session,
        dto: CreateMailDto,
    ) -> Result<Mail, AppError> {
        sqlx::query_as::<_, Mail>(&format!(
            r#"
            INSERT INTO mails
                (direction, reference_no, subject, correspondent, office_id,
                 mode_id, courier_id, mail_date, remarks, team_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {MAIL_COLUMNS}
            "#
        ))
        .bind(dto.direction.as_str())
        .bind(&dto.reference_no)
        .bind(&dto.subject)
        .bind(&dto.correspondent)
        .bind(dto.office_id)
        .bind(dto.mode_id)
        .bind(dto.courier_id)
        .bind(dto.mail_date)
        .bind(&dto.remarks)
        .bind(session.team_id)
        .bind(session.user_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A mail record with this reference number already exists"
                    ));
                }
            }
            AppError::from(e)
        })
    }

    /// Updates a scoped record, using `before` for any field the DTO left
    /// unset. `before` must come from [`MailService::get`] with the same
    /// filter.
    #[instrument(skip(db, filter, before, dto))]
    pub async fn update(
        db: &PgPool,
        id: MailId,
        filter: &ScopeFilter,
        before: &Mail,
        dto: UpdateMailDto,
    ) -> Result<Mail, AppError> {
        let mut qb = QueryBuilder::new("UPDATE mails SET reference_no = ");
        qb.push_bind(dto.reference_no.unwrap_or_else(|| before.reference_no.clone()));
        qb.push(", subject = ");
        qb.push_bind(dto.subject.unwrap_or_else(|| before.subject.clone()));
        qb.push(", correspondent = ");
        qb.push_bind(
            dto.correspondent
                .unwrap_or_else(|| before.correspondent.clone()),
        );
        qb.push(", office_id = ");
        qb.push_bind(dto.office_id.or(before.office_id));
        qb.push(", mode_id = ");
        qb.push_bind(dto.mode_id.or(before.mode_id));
        qb.push(", courier_id = ");
        qb.push_bind(dto.courier_id.or(before.courier_id));
        qb.push(", mail_date = ");
        qb.push_bind(dto.mail_date.unwrap_or(before.mail_date));
        qb.push(", remarks = ");
        qb.push_bind(dto.remarks.or_else(|| before.remarks.clone()));
        qb.push(", updated_at = now() WHERE id = ");
        qb.push_bind(id);
        filter.push_sql(&mut qb, "team_id", "created_by");
        qb.push(format!(" RETURNING {MAIL_COLUMNS}"));

        qb.build_query_as::<Mail>()
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Mail record not found")))
    }

    /// Deletes a scoped record, returning the deleted row for the audit
    /// snapshot.
    #[instrument(skip(db, filter))]
    pub async fn delete(db: &PgPool, id: MailId, filter: &ScopeFilter) -> Result<Mail, AppError> {
        let mut qb = QueryBuilder::new("DELETE FROM mails WHERE id = ");
        qb.push_bind(id);
        filter.push_sql(&mut qb, "team_id", "created_by");
        qb.push(format!(" RETURNING {MAIL_COLUMNS}"));

        qb.build_query_as::<Mail>()
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Mail record not found")))
    }

    /// Deletes every requested id that falls inside the scope, returning
    /// the number of rows removed. Ids outside the scope are skipped
    /// silently.
    #[instrument(skip(db, filter), fields(requested = ids.len()))]
    pub async fn delete_many(
        db: &PgPool,
        ids: &[MailId],
        filter: &ScopeFilter,
    ) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::new("DELETE FROM mails WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        qb.push(")");
        filter.push_sql(&mut qb, "team_id", "created_by");

        let result = qb.build().execute(db).await?;
        Ok(result.rows_affected())
    }

    /// Per-direction counts for the dashboard, inside the caller's scope.
    #[instrument(skip(db, filter))]
    pub async fn direction_counts(
        db: &PgPool,
        filter: &ScopeFilter,
    ) -> Result<Vec<MailDirectionCount>, AppError> {
        let mut qb =
            QueryBuilder::new("SELECT direction, COUNT(*) AS count FROM mails WHERE 1=1");
        filter.push_sql(&mut qb, "team_id", "created_by");
        qb.push(" GROUP BY direction");

        Ok(qb.build_query_as::<MailDirectionCount>().fetch_all(db).await?)
    }
}
