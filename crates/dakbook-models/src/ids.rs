//! Strongly-typed ID newtypes for domain entities.
//!
//! Wrappers around `i64` (BIGSERIAL primary keys) so that a `TeamId` cannot
//! be passed where a `UserId` is expected.
//!
//! # Example
//!
//! ```ignore
//! use dakbook_models::ids::{UserId, TeamId};
//!
//! fn get_user(id: UserId) { /* ... */ }
//!
//! let user_id = UserId::from(42);
//! get_user(user_id);           // OK
//! // get_user(TeamId::from(1)); // Compile error: type mismatch
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Deserializes an optional ID from query-string input, where values arrive
/// as strings and an empty string means "not provided".
pub fn deserialize_optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<i64>,
{
    Ok(dakbook_core::pagination::deserialize_optional_i64(deserializer)?.map(T::from))
}

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize, sqlx::Type, ToSchema,
        )]
        #[sqlx(transparent)]
        #[schema(value_type = i64)]
        pub struct $name(pub i64);

        impl $name {
            #[inline]
            pub const fn from_i64(v: i64) -> Self {
                Self(v)
            }

            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                Self(v)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Primary key of a user account.
    UserId
);

define_id!(
    /// Primary key of a team (tenant).
    TeamId
);

define_id!(
    /// Primary key of a mail record.
    MailId
);

define_id!(
    /// Primary key of a master-data record.
    MasterId
);

define_id!(
    /// Primary key of an audit log entry.
    AuditLogId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let id = UserId::from(7);
        assert_eq!(id.into_inner(), 7);
        assert_eq!(i64::from(id), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = TeamId::from(12);
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
        let back: TeamId = serde_json::from_str("12").unwrap();
        assert_eq!(back, id);
    }
}
