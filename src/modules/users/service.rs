use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use dakbook_auth::ScopeFilter;
use dakbook_auth::session::Session;
use dakbook_core::{AppError, PaginationMeta, hash_password};
use dakbook_models::ids::UserId;
use dakbook_models::roles::Role;
use dakbook_models::users::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams,
};

const USER_COLUMNS: &str = "id, username, email, role, team_id, active, created_at, updated_at";

fn push_list_predicates(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &ScopeFilter,
    params: &UserFilterParams,
) {
    if let Some(q) = params.q.as_deref().filter(|q| !q.is_empty()) {
        let pattern = format!("%{q}%");
        qb.push(" AND (username ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR email ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    // A team-less scoped actor's owner filter pins to their own row.
    filter.push_sql(qb, "team_id", "id");
}

fn normalize_role(raw: &str) -> Result<Role, AppError> {
    Role::parse(raw)
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Unknown role '{raw}'")))
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db, filter, params))]
    pub async fn list(
        db: &PgPool,
        filter: &ScopeFilter,
        params: &UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1=1");
        push_list_predicates(&mut qb, filter, params);
        let total: i64 = qb.build_query_scalar().fetch_one(db).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE 1=1"));
        push_list_predicates(&mut qb, filter, params);
        qb.push(" ORDER BY username ASC LIMIT ");
        qb.push_bind(params.pagination.limit());
        qb.push(" OFFSET ");
        qb.push_bind(params.pagination.offset());

        let data = qb.build_query_as::<User>().fetch_all(db).await?;

        Ok(PaginatedUsersResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    #[instrument(skip(db, filter))]
    pub async fn get(db: &PgPool, id: UserId, filter: &ScopeFilter) -> Result<User, AppError> {
        let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE id = "));
        qb.push_bind(id);
        filter.push_sql(&mut qb, "team_id", "id");

        qb.build_query_as::<User>()
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    /// Creates a user. The stored role is the normalized form; scoped actors
    /// have the team pinned to their own regardless of the DTO.
    #[instrument(skip(db, session, dto))]
    pub async fn create(
        db: &PgPool,
        session: &Session,
        dto: CreateUserDto,
    ) -> Result<User, AppError> {
        let role = normalize_role(&dto.role)?;
        if role.level() > session.role.level() {
            return Err(AppError::forbidden(
                "Cannot create a user with a higher role than your own",
            ));
        }

        let team_id = match session.role {
            Role::SuperAdmin => dto.team_id,
            _ => session.team_id,
        };

        let password_hash = hash_password(&dto.password)?;

        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password, role, team_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(role.as_str())
        .bind(team_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A user with this username or email already exists"
                    ));
                }
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(db, session, filter, before, dto))]
    pub async fn update(
        db: &PgPool,
        session: &Session,
        id: UserId,
        filter: &ScopeFilter,
        before: &User,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let role = match dto.role.as_deref() {
            Some(raw) => {
                let role = normalize_role(raw)?;
                if role.level() > session.role.level() {
                    return Err(AppError::forbidden(
                        "Cannot assign a higher role than your own",
                    ));
                }
                role.as_str().to_string()
            }
            None => before.role.clone(),
        };

        let team_id = match session.role {
            Role::SuperAdmin => dto.team_id.or(before.team_id),
            _ => before.team_id,
        };

        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let mut qb = QueryBuilder::new("UPDATE users SET email = ");
        qb.push_bind(dto.email.unwrap_or_else(|| before.email.clone()));
        qb.push(", role = ");
        qb.push_bind(role);
        qb.push(", team_id = ");
        qb.push_bind(team_id);
        qb.push(", active = ");
        qb.push_bind(dto.active.unwrap_or(before.active));
        if let Some(hash) = password_hash {
            qb.push(", password = ");
            qb.push_bind(hash);
        }
        qb.push(", updated_at = now() WHERE id = ");
        qb.push_bind(id);
        filter.push_sql(&mut qb, "team_id", "id");
        qb.push(format!(" RETURNING {USER_COLUMNS}"));

        qb.build_query_as::<User>()
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    /// Deletes a scoped user, returning the deleted row for the audit
    /// snapshot. Deleting yourself is rejected upstream in the controller.
    #[instrument(skip(db, filter))]
    pub async fn delete(db: &PgPool, id: UserId, filter: &ScopeFilter) -> Result<User, AppError> {
        let mut qb = QueryBuilder::new("DELETE FROM users WHERE id = ");
        qb.push_bind(id);
        filter.push_sql(&mut qb, "team_id", "id");
        qb.push(format!(" RETURNING {USER_COLUMNS}"));

        qb.build_query_as::<User>()
            .fetch_optional(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::bad_request(anyhow::anyhow!(
                            "This user still has mail records attached"
                        ));
                    }
                }
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }
}
