//! JWT creation and verification.
//!
//! The credential is an HMAC-signed, time-bound token carrying the claim set
//! in [`crate::claims`]. The signing secret comes from [`JwtConfig`], which
//! is read once at startup and injected everywhere it is needed; there is no
//! ambient global key and no runtime rotation.
//!
//! Verification is a pure function of token and key. Every structural or
//! cryptographic failure (bad signature, expired, malformed payload)
//! collapses into a single unauthorized error; no partial claims escape.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use dakbook_config::JwtConfig;
use dakbook_core::AppError;

use crate::claims::Claims;

/// Issues a token for an authenticated user with the configured expiry.
pub fn create_token(
    user_id: i64,
    username: &str,
    role: &str,
    team_id: Option<i64>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims::issue(
        user_id,
        username,
        role,
        team_id,
        now,
        now + jwt_config.token_expiry,
    );

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry, returning the raw claims.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{ROLE_KEYS, TEAM_ID_KEYS, USER_ID_KEYS};

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            token_expiry: 28800,
            cookie_name: "dakbook_token".to_string(),
            cookie_secure: false,
        }
    }

    #[test]
    fn test_create_and_verify_round_trip() {
        let config = get_test_jwt_config();

        let token = create_token(17, "clerk01", "clerk", Some(3), &config).unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.first_i64(USER_ID_KEYS), Some(17));
        assert_eq!(claims.first_str(ROLE_KEYS), Some("clerk"));
        assert_eq!(claims.first_i64(TEAM_ID_KEYS), Some(3));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let config = get_test_jwt_config();
        assert!(verify_token("not-a-token", &config).is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let config = get_test_jwt_config();
        let token = create_token(1, "admin01", "admin", None, &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-chars".to_string(),
            ..get_test_jwt_config()
        };
        assert!(verify_token(&token, &wrong_config).is_err());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let config = JwtConfig {
            token_expiry: -3600,
            ..get_test_jwt_config()
        };
        let token = create_token(1, "admin01", "admin", None, &config).unwrap();
        assert!(verify_token(&token, &get_test_jwt_config()).is_err());
    }

    #[test]
    fn test_token_without_team() {
        let config = get_test_jwt_config();
        let token = create_token(2, "root", "super_admin", None, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.first_i64(TEAM_ID_KEYS), None);
    }
}
