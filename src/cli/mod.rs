use sqlx::PgPool;

use dakbook_core::hash_password;
use dakbook_models::roles::Role;

/// Bootstraps the first super admin account. Super admins carry no team;
/// their scope is unrestricted by role, not by membership.
pub async fn create_super_admin(
    db: &PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (username, email, password, role, team_id)
         VALUES ($1, $2, $3, $4, NULL)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .bind(Role::SuperAdmin.as_str())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this email already exists".into());
    }

    Ok(())
}
