use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use dakbook_models::users::User;

/// Login request. `username` also accepts the account's email address.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// What a login attempt resolved to. Every variant is audited; only
/// `Success` turns into a credential.
#[derive(Debug)]
pub enum LoginOutcome {
    Success { token: String, user: User },
    /// Unknown account or wrong password. The target user is carried when
    /// the account exists so the audit row can reference it.
    BadCredentials { user: Option<User> },
    Inactive { user: User },
}
