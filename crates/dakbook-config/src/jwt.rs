use std::env;

/// JWT signing and auth-cookie configuration.
///
/// The secret is read once at startup and held in application state for the
/// lifetime of the process; there is no runtime key rotation in this design.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds. Defaults to 8 hours, matching the auth
    /// cookie max-age.
    pub token_expiry: i64,
    /// Name of the cookie carrying the token for browser sessions.
    pub cookie_name: String,
    /// Whether the auth cookie is marked `Secure`. Off by default for local
    /// development over plain HTTP.
    pub cookie_secure: bool,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            token_expiry: env::var("JWT_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(28800), // 8 hours
            cookie_name: env::var("AUTH_COOKIE_NAME").unwrap_or_else(|_| "dakbook_token".to_string()),
            cookie_secure: env::var("AUTH_COOKIE_SECURE")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
        }
    }
}
