//! Raw token claims and alias-tolerant extraction.
//!
//! The credential issuer and this consumer evolved independently, so
//! already-issued tokens carry the same facts under different key names
//! (`teamId` vs `TeamID` vs `team_id`). Each fact therefore has an ordered
//! alias table; extraction tries the keys in sequence and the first non-null
//! value wins. Reordering an alias table silently changes how old tokens
//! resolve, so the tables are consts with tests pinning them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Alias keys for the numeric user id, in resolution order.
pub const USER_ID_KEYS: &[&str] = &["userId", "UserID", "sub"];

/// Alias keys for the identity string (username or email).
pub const IDENTITY_KEYS: &[&str] = &["username", "email", "Name"];

/// Alias keys for the role string.
pub const ROLE_KEYS: &[&str] = &["role", "Role"];

/// Alias keys for the tenant id.
pub const TEAM_ID_KEYS: &[&str] = &["teamId", "TeamID", "team_id"];

/// Decoded JWT payload, kept as the raw JSON object so alias resolution can
/// inspect whichever keys the issuing side used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims(pub Map<String, Value>);

impl Claims {
    /// Builds the canonical claim set this service issues for new tokens.
    pub fn issue(
        user_id: i64,
        username: &str,
        role: &str,
        team_id: Option<i64>,
        iat: i64,
        exp: i64,
    ) -> Self {
        let mut map = Map::new();
        map.insert("userId".into(), Value::from(user_id));
        map.insert("username".into(), Value::from(username));
        map.insert("role".into(), Value::from(role));
        map.insert(
            "teamId".into(),
            team_id.map(Value::from).unwrap_or(Value::Null),
        );
        map.insert("iat".into(), Value::from(iat));
        map.insert("exp".into(), Value::from(exp));
        Claims(map)
    }

    /// First non-null value among `keys`, in order.
    pub fn first(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !v.is_null())
    }

    /// First non-null value among `keys`, read as an i64. Accepts both JSON
    /// numbers and numeric strings; a present but unparseable value yields
    /// `None`, the same as an absent one.
    pub fn first_i64(&self, keys: &[&str]) -> Option<i64> {
        match self.first(keys)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) if !s.is_empty() => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// First non-null value among `keys`, read as a non-empty string.
    pub fn first_str(&self, keys: &[&str]) -> Option<&str> {
        match self.first(keys)? {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(v: Value) -> Claims {
        Claims(v.as_object().unwrap().clone())
    }

    #[test]
    fn test_first_prefers_earlier_alias() {
        let c = claims(json!({"userId": 3, "sub": "999"}));
        assert_eq!(c.first_i64(USER_ID_KEYS), Some(3));
    }

    #[test]
    fn test_first_skips_null_values() {
        let c = claims(json!({"userId": null, "sub": "42"}));
        assert_eq!(c.first_i64(USER_ID_KEYS), Some(42));
    }

    #[test]
    fn test_numeric_string_accepted() {
        let c = claims(json!({"teamId": "7"}));
        assert_eq!(c.first_i64(TEAM_ID_KEYS), Some(7));
    }

    #[test]
    fn test_every_team_alias_resolves_identically() {
        for key in TEAM_ID_KEYS {
            let c = claims(json!({ (*key): 7 }));
            assert_eq!(c.first_i64(TEAM_ID_KEYS), Some(7), "alias {key}");
        }
    }

    #[test]
    fn test_empty_string_is_absent() {
        let c = claims(json!({"teamId": ""}));
        assert_eq!(c.first_i64(TEAM_ID_KEYS), None);
        let c = claims(json!({"username": ""}));
        assert_eq!(c.first_str(IDENTITY_KEYS), None);
    }

    #[test]
    fn test_garbage_number_is_absent() {
        let c = claims(json!({"teamId": "not-a-number"}));
        assert_eq!(c.first_i64(TEAM_ID_KEYS), None);
    }

    #[test]
    fn test_issue_uses_canonical_keys() {
        let c = Claims::issue(5, "ravi", "admin", Some(2), 100, 200);
        assert_eq!(c.first_i64(USER_ID_KEYS), Some(5));
        assert_eq!(c.first_str(IDENTITY_KEYS), Some("ravi"));
        assert_eq!(c.first_str(ROLE_KEYS), Some("admin"));
        assert_eq!(c.first_i64(TEAM_ID_KEYS), Some(2));
    }
}
