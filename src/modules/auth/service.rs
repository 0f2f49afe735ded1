use sqlx::PgPool;
use tracing::instrument;

use dakbook_auth::create_token;
use dakbook_config::JwtConfig;
use dakbook_core::{AppError, verify_password};
use dakbook_models::ids::{TeamId, UserId};
use dakbook_models::users::User;

use super::model::{LoginOutcome, LoginRequest};

pub struct AuthService;

impl AuthService {
    /// Resolves a login attempt without deciding the HTTP response: the
    /// controller audits every outcome, so failures are data here, not
    /// errors. `Err` means the lookup itself failed.
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login(
        db: &PgPool,
        dto: &LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginOutcome, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: UserId,
            username: String,
            email: String,
            role: String,
            team_id: Option<TeamId>,
            active: bool,
            password: String,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let row = sqlx::query_as::<_, UserWithPassword>(
            r#"
            SELECT id, username, email, role, team_id, active, password,
                   created_at, updated_at
            FROM users
            WHERE username = $1 OR email = $1
            "#,
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await?;

        let Some(row) = row else {
            return Ok(LoginOutcome::BadCredentials { user: None });
        };

        let user = User {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role,
            team_id: row.team_id,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        if !verify_password(&dto.password, &row.password)? {
            return Ok(LoginOutcome::BadCredentials { user: Some(user) });
        }

        if !user.active {
            return Ok(LoginOutcome::Inactive { user });
        }

        let token = create_token(
            user.id.into_inner(),
            &user.username,
            &user.role,
            user.team_id.map(TeamId::into_inner),
            jwt_config,
        )?;

        Ok(LoginOutcome::Success { token, user })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, role, team_id, active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }
}
