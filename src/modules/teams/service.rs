use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use dakbook_core::{AppError, PaginationMeta};
use dakbook_models::ids::TeamId;
use dakbook_models::teams::{
    CreateTeamDto, PaginatedTeamsResponse, Team, TeamFilterParams, UpdateTeamDto,
};

const TEAM_COLUMNS: &str = "id, name, active, created_at, updated_at";

fn push_list_predicates(qb: &mut QueryBuilder<'_, Postgres>, params: &TeamFilterParams) {
    if let Some(q) = params.q.as_deref().filter(|q| !q.is_empty()) {
        qb.push(" AND name ILIKE ");
        qb.push_bind(format!("%{q}%"));
    }
}

/// Team management. Routes using this service sit behind the super-admin
/// layer, so no scope filter applies here.
pub struct TeamService;

impl TeamService {
    #[instrument(skip(db, params))]
    pub async fn list(
        db: &PgPool,
        params: &TeamFilterParams,
    ) -> Result<PaginatedTeamsResponse, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM teams WHERE 1=1");
        push_list_predicates(&mut qb, params);
        let total: i64 = qb.build_query_scalar().fetch_one(db).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {TEAM_COLUMNS} FROM teams WHERE 1=1"));
        push_list_predicates(&mut qb, params);
        qb.push(" ORDER BY name ASC LIMIT ");
        qb.push_bind(params.pagination.limit());
        qb.push(" OFFSET ");
        qb.push_bind(params.pagination.offset());

        let data = qb.build_query_as::<Team>().fetch_all(db).await?;

        Ok(PaginatedTeamsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: TeamId) -> Result<Team, AppError> {
        sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Team not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: CreateTeamDto) -> Result<Team, AppError> {
        sqlx::query_as::<_, Team>(&format!(
            "INSERT INTO teams (name) VALUES ($1) RETURNING {TEAM_COLUMNS}"
        ))
        .bind(&dto.name)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A team with this name already exists"
                    ));
                }
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: TeamId,
        before: &Team,
        dto: UpdateTeamDto,
    ) -> Result<Team, AppError> {
        sqlx::query_as::<_, Team>(&format!(
            "UPDATE teams SET name = $1, active = $2, updated_at = now() \
             WHERE id = $3 RETURNING {TEAM_COLUMNS}"
        ))
        .bind(dto.name.unwrap_or_else(|| before.name.clone()))
        .bind(dto.active.unwrap_or(before.active))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Team not found")))
    }

    /// Deletes a team, returning the deleted row for the audit snapshot.
    /// Teams with users or records still attached fail with 400.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: TeamId) -> Result<Team, AppError> {
        sqlx::query_as::<_, Team>(&format!(
            "DELETE FROM teams WHERE id = $1 RETURNING {TEAM_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "This team still has users or records attached"
                    ));
                }
            }
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Team not found")))
    }
}
